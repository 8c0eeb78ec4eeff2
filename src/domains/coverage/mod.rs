pub mod grid;
pub mod planner;
pub mod ports;
pub mod types;
pub mod validation;

pub use grid::*;
pub use planner::*;
pub use ports::*;
pub use types::*;
pub use validation::*;
