pub mod cancellation;
pub mod refund_batch;
pub mod settlement;
