use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use micro_ingest::{IngestConfig, RecoveryPolicy};
use micro_ingest_server::{App, ComplaintRoutes, MemoryStore, ServeError, Server};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
struct Opts {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    address: SocketAddr,

    /// What to do with a body that fails to decode:
    /// `substitute-empty` or `surface-error`.
    #[arg(long, default_value = "substitute-empty")]
    policy: RecoveryPolicy,

    /// Largest accepted request body in bytes.
    #[arg(long, default_value = "102400")]
    max_body_size: usize,

    /// Give up on a request body after this many milliseconds. No limit when unset.
    #[arg(long)]
    body_timeout_ms: Option<u64>,

    /// Complaint service to mount: `by-user` or `by-id`.
    #[arg(long, default_value = "by-user")]
    complaint_routes: ComplaintRoutes,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

impl Opts {
    fn ingest_config(&self) -> IngestConfig {
        let builder = IngestConfig::builder().policy(self.policy).max_body_size(self.max_body_size);
        match self.body_timeout_ms {
            Some(ms) => builder.timeout(Duration::from_millis(ms)).build(),
            None => builder.build(),
        }
    }
}

async fn run(opts: Opts) -> Result<(), ServeError> {
    let subscriber = FmtSubscriber::builder().with_max_level(opts.log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = opts.ingest_config();
    info!(policy = config.policy().as_str(), max_body_size = opts.max_body_size, timeout = ?config.timeout(), "ingest config");

    info!(complaint_routes = %opts.complaint_routes, "mount services");

    let app = App::builder()
        .ingest_config(config)
        .complaint_routes(opts.complaint_routes)
        .store(Arc::new(MemoryStore::new()))
        .build()?;
    Server::builder().address(opts.address).app(app).build()?.start().await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Opts::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "server stopped");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = Opts::parse_from(["micro-ingest-server"]);
        let config = opts.ingest_config();

        assert_eq!(opts.address, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.policy(), RecoveryPolicy::SubstituteEmpty);
        assert_eq!(config.max_body_size(), Some(100 * 1024));
        assert_eq!(config.timeout(), None);
        assert_eq!(opts.complaint_routes, ComplaintRoutes::ByUser);
    }

    #[test]
    fn all_options() {
        let opts = Opts::parse_from([
            "micro-ingest-server",
            "--address",
            "0.0.0.0:8080",
            "--policy",
            "surface-error",
            "--max-body-size",
            "512",
            "--body-timeout-ms",
            "1500",
            "--log-level",
            "debug",
            "--complaint-routes",
            "by-id",
        ]);
        let config = opts.ingest_config();

        assert_eq!(config.policy(), RecoveryPolicy::SurfaceError);
        assert_eq!(config.max_body_size(), Some(512));
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(opts.log_level, Level::DEBUG);
        assert_eq!(opts.complaint_routes, ComplaintRoutes::ById);
    }

    #[test]
    fn unknown_policy_is_refused() {
        assert!(Opts::try_parse_from(["micro-ingest-server", "--policy", "ignore"]).is_err());
    }
}
