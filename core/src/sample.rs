//! Samples drawn from data sources
//!
//! A [`Sample`] is a group label plus an opaque payload. Equality and hashing
//! look only at the payload, so drawing the same physical data point twice
//! yields two equal samples and the engine can deduplicate them.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One observation: a group identifier and an opaque payload
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    group: usize,
    payload: u64,
}

impl Sample {
    /// Create a sample with an explicit payload
    pub fn new(group: usize, payload: u64) -> Self {
        Self { group, payload }
    }

    /// Create a sample whose payload is derived from any hashable key
    /// (row id, primary key, file path, ...)
    pub fn from_key<K: Hash + ?Sized>(group: usize, key: &K) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Self::new(group, hasher.finish())
    }

    /// Group this sample belongs to
    pub fn group(&self) -> usize {
        self.group
    }

    /// Identity used for deduplication
    pub fn payload(&self) -> u64 {
        self.payload
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl Eq for Sample {}

impl Hash for Sample {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.payload.hash(state);
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(G{}, {})", self.group, self.payload)
    }
}
