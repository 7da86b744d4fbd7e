pub mod backoff;
pub mod config;
pub mod controller;
pub mod error;
pub mod fade;
pub mod state;
pub mod traits;
