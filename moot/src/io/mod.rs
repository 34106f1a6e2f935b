//! I/O helpers: configuration, catalog files, local uploads and transport.

pub mod catalog_store;
pub mod config;
pub mod files;
pub mod transport;
