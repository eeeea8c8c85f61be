//! Card data loaders
//!
//! Reads card definitions from JSON card data files

pub mod card;
pub mod database;

pub use card::CardLoader;
pub use database::CardDatabase;
