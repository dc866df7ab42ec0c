pub mod config;
pub mod stats;
pub mod top;
pub mod workload;
