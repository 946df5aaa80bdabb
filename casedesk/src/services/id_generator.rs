//! Backend-style id generation

use casedesk_core::environment::{Clock, IdGenerator};
use rand::Rng;
use std::sync::Arc;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 9;

/// Generates `{prefix}-{unix millis}-{9 random base-36 chars}`
#[derive(Clone)]
pub struct TimestampIdGenerator {
    clock: Arc<dyn Clock>,
}

impl TimestampIdGenerator {
    /// Create a generator reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let millis = self.clock.now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
            .collect();
        format!("{prefix}-{millis}-{suffix}")
    }
}

impl std::fmt::Debug for TimestampIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampIdGenerator").finish_non_exhaustive()
    }
}
