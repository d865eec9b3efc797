pub mod analysis;
pub mod assistant;
pub mod commands;
pub mod config;
pub mod ground_truth;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod process;
pub mod retry;
pub mod sink;
