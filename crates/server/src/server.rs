use std::net::SocketAddr;
use std::sync::Arc;

use micro_ingest_http::connection::HttpConnection;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::app::App;
use crate::error::ServeError;

pub struct ServerBuilder {
    app: Option<App>,
    address: Option<SocketAddr>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { app: None, address: None }
    }

    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address);
        self
    }

    pub fn app(mut self, app: App) -> Self {
        self.app = Some(app);
        self
    }

    pub fn build(self) -> Result<Server, ServeError> {
        let app = self.app.ok_or(ServeError::MissingApp)?;
        let address = self.address.ok_or(ServeError::MissingAddress)?;
        Ok(Server { app: Arc::new(app), address })
    }
}

/// Accepts connections and serves each on its own task until ctrl-c.
pub struct Server {
    app: Arc<App>,
    address: SocketAddr,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub async fn start(self) -> Result<(), ServeError> {
        let tcp_listener = TcpListener::bind(self.address)
            .await
            .map_err(|source| ServeError::Bind { address: self.address.to_string(), source })?;
        info!(address = %self.address, "start listening");

        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                accepted = tcp_listener.accept() => accepted,
                _ = &mut shutdown => {
                    info!("received ctrl-c, stop accepting connections");
                    return Ok(());
                }
            };

            let (tcp_stream, remote_addr) = match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let app = Arc::clone(&self.app);
            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                match HttpConnection::new(reader, writer).process(app).await {
                    Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                    Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
                }
            });
        }
    }
}
