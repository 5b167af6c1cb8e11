// src/api/mod.rs
pub mod csv;
pub mod scrape;

pub use csv::*;
pub use scrape::*;
