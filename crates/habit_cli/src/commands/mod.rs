pub mod habit;
pub mod stats;
