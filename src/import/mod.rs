pub mod block;
pub mod generator;
pub mod resolver;
pub mod suffix;

pub use generator::{GenerationReport, ImportScriptGenerator};
pub use resolver::{DuplicateRenameMap, DuplicateResolver};
pub use suffix::{RandomSuffix, SequentialSuffix, SuffixSource};
