//! Fresh-name generation for derived tensor computations.

use std::collections::HashMap;

/// Mints unique names of the form `base_N`.
///
/// Counters only move forward: every draw takes the next suffix for its
/// base, and nothing ever hands a suffix back. Re-registering a
/// deserialized computation therefore yields a new name rather than the
/// one it was serialized under.
#[derive(Clone, Debug, Default)]
pub struct NameRegistry {
    counters: HashMap<String, u64>,
}

impl NameRegistry {
    /// Creates a registry with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unique name for `base`.
    pub fn fresh(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_owned()).or_insert(0);
        let name = format!("{base}_{counter}");
        *counter += 1;
        name
    }

    /// Clears all counters, for deterministic reuse between independent
    /// compilations or tests.
    pub fn reset(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_names_increment_per_base() {
        let mut names = NameRegistry::new();
        assert_eq!(names.fresh("chunk"), "chunk_0");
        assert_eq!(names.fresh("chunk"), "chunk_1");
        assert_eq!(names.fresh("producer"), "producer_0");
        assert_eq!(names.fresh("chunk"), "chunk_2");
    }

    #[test]
    fn reset_restarts_counters() {
        let mut names = NameRegistry::new();
        names.fresh("chunk");
        names.fresh("chunk");
        names.reset();
        assert_eq!(names.fresh("chunk"), "chunk_0");
    }
}
