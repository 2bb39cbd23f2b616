use rand::{rngs::ThreadRng, Rng};

/// Picks which object receives the next selection.
pub trait IndexSource {
    /// Returns an index in `0..bound`. A zero bound yields 0.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Uniform selection backed by the thread-local generator.
#[derive(Debug, Default)]
pub struct RandIndexSource {
    rng: ThreadRng,
}

impl IndexSource for RandIndexSource {
    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}

/// Replays a fixed list of indices, wrapping around at the end.
#[derive(Debug, Clone, Default)]
pub struct SequenceIndexSource {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceIndexSource {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl IndexSource for SequenceIndexSource {
    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 || self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value % bound
    }
}

#[cfg(test)]
mod test {
    use super::{IndexSource, RandIndexSource, SequenceIndexSource};

    #[test]
    fn test_rand_source_stays_in_bound() {
        let mut source = RandIndexSource::default();
        for _ in 0..256 {
            assert!(source.next_index(4) < 4);
        }
        assert_eq!(source.next_index(0), 0);
    }

    #[test]
    fn test_sequence_source_wraps() {
        let mut source = SequenceIndexSource::new([2, 5, 1]);
        let picked: Vec<usize> = (0..6).map(|_| source.next_index(4)).collect();
        assert_eq!(picked, vec![2, 1, 1, 2, 1, 1]);
    }

    #[test]
    fn test_empty_sequence_returns_zero() {
        let mut source = SequenceIndexSource::default();
        assert_eq!(source.next_index(4), 0);
    }
}
