pub mod envelope;
pub mod tuning;
