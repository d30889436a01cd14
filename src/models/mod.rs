//! Core data models for the ranking backend.

mod credentials;
mod match_record;
mod profile;
mod stats;
mod tier;

pub use credentials::*;
pub use match_record::*;
pub use profile::*;
pub use stats::*;
pub use tier::*;
