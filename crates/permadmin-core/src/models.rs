//! Domain models for the permissions admin service.
//!
//! Ids are plain strings everywhere; any numeric id a client sends is
//! compared in its string form.

pub mod assignment;
pub mod permission;
pub mod user;
