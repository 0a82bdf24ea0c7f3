//! Permadmin Store — in-memory repository implementations.
//!
//! This crate provides:
//! - The shared store handle ([`MemoryStore`])
//! - Seed data, built in or loaded from JSON ([`SeedData`])
//! - Repository implementations for the `permadmin-core` traits
//! - Error types ([`StoreError`])
//!
//! Nothing is persisted; all state lives for the life of the process.

mod error;
mod memory;
pub mod repository;
mod seed;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use seed::{SeedAssignment, SeedData, default_catalog};
