//! Self-assessment engine for construction health-and-safety courses.
//!
//! Question banks are validated once when bound; quiz instances then run a
//! select/submit cycle against them and produce an immutable result.

pub mod assessment;
pub mod config;
pub mod content;
pub mod error;
pub mod telemetry;
