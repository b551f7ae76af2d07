use macroquad::prelude::*;

/// Transient presentation events emitted by the simulation. The render layer
/// drains these each frame, animates them, and discards them; the core never
/// holds on to them.
#[derive(Clone, Debug)]
pub enum Effect {
    FloatText { text: String, pos: Vec2, color: Color },
    Burst { pos: Vec2, color: Color },
}

pub struct FxQueue {
    events: Vec<Effect>,
}

impl FxQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn float_text(&mut self, text: impl Into<String>, pos: Vec2, color: Color) {
        self.events.push(Effect::FloatText {
            text: text.into(),
            pos,
            color,
        });
    }

    pub fn burst(&mut self, pos: Vec2, color: Color) {
        self.events.push(Effect::Burst { pos, color });
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Effect> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue() {
        let mut fx = FxQueue::new();
        fx.float_text("+1", vec2(1.0, 2.0), WHITE);
        fx.burst(vec2(3.0, 4.0), WHITE);
        assert_eq!(fx.len(), 2);

        let drained: Vec<Effect> = fx.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(fx.is_empty());
    }
}
