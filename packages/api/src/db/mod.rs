//! # Database module
//!
//! The Postgres pool and the embedded schema migrations.
//!
//! Unlike a process-wide singleton, the pool is created once at startup by
//! [`connect`] and handed to handlers through [`AppState`](crate::AppState),
//! which lets tests build a router around a lazily-connected pool.

mod pool;

pub use pool::{connect, connect_lazy, migrate};
