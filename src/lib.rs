//! Core library surface for the bookshelf catalog.
//!
//! The binary only wires these pieces together: resolve the [`Config`], open
//! the [`Catalog`] and hand it to the [`Menu`]. Keeping the pieces in a library
//! lets the tests drive the menu with in-memory input instead of a terminal.
pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod store;

/// Startup settings, resolved once in `main.rs`.
pub use config::Config;

/// The error every store operation returns, plus its `Result` alias.
pub use error::{CatalogError, Result};

/// The interactive front-end and the actions it offers.
pub use menu::{Menu, MenuChoice};

/// The single domain type the other layers pass around.
pub use models::Book;

/// The in-memory catalog and its file persistence.
pub use store::Catalog;
