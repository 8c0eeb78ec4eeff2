pub mod coverage;

pub use coverage::*;
