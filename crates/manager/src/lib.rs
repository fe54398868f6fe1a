pub mod board;
pub mod dashboard;
pub mod detector;
pub mod scheduler;
