//! Record store: the in-memory catalog and the flat file that mirrors it.

mod catalog;
mod file;

pub use catalog::Catalog;
