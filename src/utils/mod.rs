pub mod identification;
pub mod money;
