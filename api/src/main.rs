use api::routes::routes;
use api::server::Server;
use std::net::SocketAddr;
use tracing_appender::rolling;
use util::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() {
    let config = AppConfig::global().clone();

    // Load configuration and initialize logging
    let _log_guard = init_logging(&config);
    config.report_warnings();

    let app_state = AppState::from_config(&config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    let server = Server::bind(addr, routes(app_state))
        .await
        .expect("Failed to bind");

    tracing::info!(
        project = %config.project_name,
        env = %config.env,
        cpu_stat_path = %config.cpu_stat_path,
        interval_ms = config.stream_interval_ms,
        "Starting {} on http://{}/events",
        config.project_name,
        addr
    );

    server.run().await.expect("Server crashed");
}

fn init_logging(config: &AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", &config.log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config.log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(true)
    });

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("api=info,util=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
