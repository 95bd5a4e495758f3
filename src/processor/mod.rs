pub mod canonicalizer;
pub mod domain_filter;
pub mod field_consolidator;
pub mod frame_ops;
pub mod structural_cleaner;
pub mod unifier;

pub use canonicalizer::*;
pub use domain_filter::*;
pub use field_consolidator::*;
pub use structural_cleaner::*;
pub use unifier::*;
