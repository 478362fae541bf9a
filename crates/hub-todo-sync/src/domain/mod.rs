//! # Domain Module
//!
//! Core domain types for Identity Hub sync.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod messages;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use messages::*;
pub use value_objects::*;
