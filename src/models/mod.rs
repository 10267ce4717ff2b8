//! Data models for the Kisan+ farmer assistant.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod diagnosis;
mod history;
mod market;
mod profile;
mod scheme;

pub use diagnosis::*;
pub use history::*;
pub use market::*;
pub use profile::*;
pub use scheme::*;
