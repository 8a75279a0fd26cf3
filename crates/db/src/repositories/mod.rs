//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod cancellation_repo;
pub mod child_repo;
pub mod group_repo;
pub mod meal_price_repo;
pub mod refund_batch_repo;

pub use cancellation_repo::CancellationRepo;
pub use child_repo::ChildRepo;
pub use group_repo::GroupRepo;
pub use meal_price_repo::{MealPriceRepo, PgMealPrices};
pub use refund_batch_repo::RefundBatchRepo;
