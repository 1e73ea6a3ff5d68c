//! Domain records for the WEFE dashboard

pub mod de;

mod consumption;
mod crop;
mod impact;
mod site;
mod sources;
mod strategy;

pub use consumption::*;
pub use crop::*;
pub use impact::*;
pub use site::*;
pub use sources::*;
pub use strategy::*;
