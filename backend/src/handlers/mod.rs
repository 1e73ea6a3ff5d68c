//! HTTP handlers

pub mod catalog;
pub mod health;
pub mod labs;
pub mod sessions;

pub use catalog::*;
pub use health::*;
pub use labs::*;
pub use sessions::*;
