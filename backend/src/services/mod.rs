//! Services behind the HTTP handlers

pub mod catalog;
pub mod data;
pub mod scenario;

pub use catalog::CatalogService;
pub use data::{DataStore, LabData};
pub use scenario::{ScenarioService, SessionStore};
