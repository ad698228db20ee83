use std::sync::atomic::{AtomicU32, Ordering};

/// Source of the numeric disambiguator embedded in generated file names
pub trait SuffixSource: Send + Sync {
    fn next_suffix(&self) -> u32;
}

/// Random four-digit suffix (1000..=9999)
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&self) -> u32 {
        let entropy = uuid::Uuid::new_v4().as_u128();
        1000 + (entropy % 9000) as u32
    }
}

/// Deterministic counter, for reproducible file names
pub struct SequentialSuffix {
    next: AtomicU32,
}

impl SequentialSuffix {
    pub fn starting_at(start: u32) -> Self {
        Self {
            next: AtomicU32::new(start),
        }
    }
}

impl SuffixSource for SequentialSuffix {
    fn next_suffix(&self) -> u32 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}
