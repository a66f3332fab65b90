//! Weighted random selection.

use rand::Rng;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedEntry<T> {
    pub item: T,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedTable<T> {
    entries: Vec<WeightedEntry<T>>,
}

impl<T> Default for WeightedTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> WeightedTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: T, weight: u32) -> Self {
        self.push(item, weight);
        self
    }

    pub fn push(&mut self, item: T, weight: u32) {
        self.entries.push(WeightedEntry { item, weight });
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.weight)).sum()
    }

    /// Picks an entry with probability proportional to its weight.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let total = self.total_weight();
        if total == 0 {
            error!("Could not pick a weighted entry: table has no weight");
            return None;
        }

        let mut roll = rng.gen_range(1..=total);
        for entry in &self.entries {
            let weight = u64::from(entry.weight);
            if roll > weight {
                roll -= weight;
            } else {
                return Some(&entry.item);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_table_picks_nothing() {
        let table: WeightedTable<&str> = WeightedTable::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(table.pick(&mut rng), None);

        let zero = WeightedTable::new().with("crate", 0);
        assert_eq!(zero.pick(&mut rng), None);
    }

    #[test]
    fn test_zero_weight_entries_never_picked() {
        let table = WeightedTable::new().with("never", 0).with("always", 5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(table.pick(&mut rng), Some(&"always"));
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        let table = WeightedTable::new().with("common", 9).with("rare", 1);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let rare = (0..10_000)
            .filter(|_| table.pick(&mut rng) == Some(&"rare"))
            .count();
        assert!((700..1300).contains(&rare), "rare picked {} times", rare);
    }
}
