//! HTTP server lifecycle.
//!
//! The server owns the route table it is given; there is no process-wide
//! router to register into.

use std::io;
use std::net::SocketAddr;

use axum::{Router, middleware::from_fn};
use tokio::net::TcpListener;

use crate::middleware::log_request;

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Binds `addr` and takes ownership of `router`.
    ///
    /// Binding to port `0` picks a free port; see [`Server::local_addr`].
    pub async fn bind(addr: SocketAddr, router: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: router.layer(from_fn(log_request)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the listener fails.
    pub async fn run(self) -> io::Result<()> {
        tracing::info!(addr = %self.local_addr()?, "Server listening");
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
