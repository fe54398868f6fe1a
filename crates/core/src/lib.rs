pub mod common;
pub mod config;
pub mod feed;
pub mod refresh;
pub mod report;
