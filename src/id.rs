use rand::Rng;

/// The 62-character alphanumeric alphabet record IDs are drawn from.
pub const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates candidate record IDs. Uniqueness is the store's job: the
/// allocator only produces uniformly random candidates, and `Roster` checks
/// them against the collection (and guards the final insert) before one is
/// handed out.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    length: usize,
    max_attempts: usize,
}

impl IdAllocator {
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self {
            length,
            max_attempts,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Upper bound on candidates tried per allocation before giving up.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// One uniformly random candidate of the configured length.
    pub fn candidate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    /// Whether `id` has the exact shape this allocator produces.
    pub fn is_valid(&self, id: &str) -> bool {
        id.len() == self.length && id.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(8, 32)
    }
}
