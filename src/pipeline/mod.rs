pub mod runner;
pub mod stage;

pub use runner::*;
pub use stage::Stage;
