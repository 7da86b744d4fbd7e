pub mod log;
pub mod task;
