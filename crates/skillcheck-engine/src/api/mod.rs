pub mod config;
pub mod emitter;
pub mod error;
pub mod types;
