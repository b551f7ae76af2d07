use std::collections::VecDeque;

/// Fixed-capacity sample history for the dev graphs. Oldest samples fall off
/// the front.
pub struct History {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Per-tick metrics the graphs panel plots.
pub struct SimStats {
    pub player_mass: History,
    pub score: History,
    pub bots: History,
    pub threats: History,
}

impl SimStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            player_mass: History::new(capacity),
            score: History::new(capacity),
            bots: History::new(capacity),
            threats: History::new(capacity),
        }
    }

    pub fn record(&mut self, player_mass: f32, score: i64, bots: usize, threats: usize) {
        self.player_mass.push(player_mass);
        self.score.push(score as f32);
        self.bots.push(bots as f32);
        self.threats.push(threats as f32);
    }

    pub fn clear(&mut self) {
        self.player_mass.clear();
        self.score.clear();
        self.bots.clear();
        self.threats.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_drops_oldest_at_capacity() {
        let mut h = History::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            h.push(v);
        }
        assert_eq!(h.len(), 3);
        let all: Vec<f32> = h.iter().collect();
        assert_eq!(all, vec![2.0, 3.0, 4.0]);
        assert_eq!(h.last(), Some(4.0));
    }

    #[test]
    fn record_feeds_every_series() {
        let mut stats = SimStats::new(10);
        stats.record(24.0, 7, 18, 3);
        assert_eq!(stats.player_mass.last(), Some(24.0));
        assert_eq!(stats.score.last(), Some(7.0));
        assert_eq!(stats.bots.last(), Some(18.0));
        assert_eq!(stats.threats.last(), Some(3.0));
    }
}
