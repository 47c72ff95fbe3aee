
pub use app::{CountingSampler, make_test_app, spawn_server, stat_file};
