//! Permadmin Core — domain models, error taxonomy, validation rules and
//! repository traits shared by every other crate.
//!
//! Nothing in here performs I/O; storage lives behind the traits in
//! [`repository`].

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

pub use error::{AdminError, AdminResult};
