pub mod columns;
pub mod region;

pub use region::*;
