//! # Domain Module
//!
//! Error and path types of the record store.

pub mod errors;
pub mod path;

pub use errors::*;
pub use path::*;
