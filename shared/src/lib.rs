//! Shared types and estimation engine for the WEFE living-lab dashboard
//!
//! This crate contains the typed data records, the quantitative estimation
//! engine and the scenario session shared between the backend, the browser
//! frontend (via WASM) and the test suites. Nothing in here performs I/O.

pub mod error;
pub mod estimate;
pub mod geo;
pub mod models;
pub mod session;
pub mod types;
pub mod validation;

pub use error::*;
pub use estimate::*;
pub use models::*;
pub use session::*;
pub use types::*;
pub use validation::*;
