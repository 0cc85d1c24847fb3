use uuid::Uuid;

/// Length of the random seed prefix taken from a v4 UUID
const SEED_LEN: usize = 12;

/// Generate a fresh random seed
pub fn random_seed() -> String {
    let mut seed = Uuid::new_v4().simple().to_string();
    seed.truncate(SEED_LEN);
    seed
}

/// Sequential ID generator for document nodes.
///
/// Every editing session gets its own random seed, so identifiers produced by
/// different sessions never collide while identifiers within one session stay
/// short and ordered.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_seed(random_seed())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of identifiers handed out so far
    pub fn issued(&self) -> u64 {
        self.count
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_seeds_differ() {
        let a = IdGenerator::new();
        let b = IdGenerator::new();
        assert_ne!(a.seed(), b.seed());
        assert_eq!(a.seed().len(), SEED_LEN);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("abc");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert_eq!(id1, "abc-1");
        assert_eq!(id2, "abc-2");
        assert_eq!(id3, "abc-3");
        assert_eq!(gen.issued(), 3);
    }
}
