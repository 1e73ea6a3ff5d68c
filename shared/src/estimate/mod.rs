//! Quantitative estimation engine
//!
//! Pure functions turning site land cover, crop agronomy and strategy
//! assumptions into self-sufficiency and impact figures:
//! - [`agronomy`]: annual yield per unit area of a crop
//! - [`land`]: crop-area allocation and strategy-affected area of sites
//! - [`sufficiency`]: production over consumption, as a percentage
//! - [`impact`]: cost and savings of one strategy application
//! - [`aggregate`]: totals and compounded productivity across applications

pub mod aggregate;
pub mod agronomy;
pub mod impact;
pub mod land;
pub mod sufficiency;

pub use aggregate::*;
pub use agronomy::*;
pub use impact::*;
pub use land::*;
pub use sufficiency::*;
