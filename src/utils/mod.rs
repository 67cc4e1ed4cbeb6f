pub mod padding;
pub mod parallelism;
pub mod truncation;
