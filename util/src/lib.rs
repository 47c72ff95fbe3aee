pub mod config;
pub mod cpu_stat;
pub mod state;
pub mod stream;
