pub mod config;
pub mod deps;
pub mod paths;
