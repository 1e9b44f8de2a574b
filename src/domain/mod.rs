//! # Domain Layer
//!
//! Entities, value objects and the rules that keep truck counts and
//! lifecycle states consistent. Nothing here performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;
