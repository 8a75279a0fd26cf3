//! Row models and request DTOs, one module per table.

pub mod cancellation;
pub mod child;
pub mod payment;
