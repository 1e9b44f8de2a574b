//! # Application Layer
//!
//! Use cases over the domain model. Every externally triggered mutation runs
//! in one [`UnitOfWork`](unit_of_work::UnitOfWork) and reports failures as an
//! [`ApplicationError`](error::ApplicationError).

pub mod error;
pub mod services;
pub mod unit_of_work;
