pub mod allocation;
pub mod prediction;
