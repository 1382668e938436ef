use serde::Serialize;

/// One unit of work: an owned, contiguous subrange of the input sequence.
///
/// `index` is the chunk's position in the order the partitioner produced it.
/// It feeds chunk-size reporting and the exactly-once accounting in tests;
/// the final result never depends on it.
#[derive(Debug, Clone)]
pub struct Chunk<T> {
    pub index: usize,
    pub items: Vec<T>,
}

impl<T> Chunk<T> {
    pub fn new(index: usize, items: Vec<T>) -> Self {
        Self { index, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Size statistics over a chunk set, reported with every run's metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkStats {
    pub count: usize,
    pub avg_len: f64,
    pub min_len: usize,
    pub max_len: usize,
}

impl ChunkStats {
    pub fn from_chunks<T>(chunks: &[Chunk<T>]) -> Self {
        if chunks.is_empty() {
            return Self {
                count: 0,
                avg_len: 0.0,
                min_len: 0,
                max_len: 0,
            };
        }
        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        let total: usize = lens.iter().sum();
        Self {
            count: lens.len(),
            avg_len: total as f64 / lens.len() as f64,
            min_len: *lens.iter().min().unwrap(),
            max_len: *lens.iter().max().unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_over_uneven_chunks() {
        let chunks = vec![
            Chunk::new(0, vec![1, 2, 3]),
            Chunk::new(1, vec![4]),
            Chunk::new(2, vec![5, 6]),
        ];
        let stats = ChunkStats::from_chunks(&chunks);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min_len, 1);
        assert_eq!(stats.max_len, 3);
        assert!((stats.avg_len - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_over_no_chunks() {
        let stats = ChunkStats::from_chunks::<u8>(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_len, 0.0);
    }
}
