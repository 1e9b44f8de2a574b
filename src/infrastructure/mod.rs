//! # Infrastructure Layer
//!
//! Adapters behind the application layer's ports.

pub mod persistence;
