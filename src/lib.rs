//! Bookstore API application library
//!
//! Resource modules (Authors, Books) and the bootstrap that wires them into
//! the kernel registry, the SQLite store and the HTTP surface.

pub mod app;
pub mod modules;
