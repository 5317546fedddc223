pub mod board;
pub mod label;
pub mod task;
