//! Crop diagnosis: state machine, canned analysis service and session driver.

mod analyzer;
mod flow;
mod machine;

pub use analyzer::*;
pub use flow::*;
pub use machine::*;
