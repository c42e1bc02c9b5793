use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use mock_service::MockConfig;
use std::{net::SocketAddr, num::NonZeroU32};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(version, about = "In-memory car/user API for load testing")]
struct Args {
    /// Address to serve the API on
    #[arg(long, env = "MOCK_ADDR", default_value = "0.0.0.0:3002")]
    addr: SocketAddr,

    /// Reject requests above this rate with a 500
    #[arg(long, env = "MOCK_MAX_TPS")]
    max_tps: Option<NonZeroU32>,

    /// Expose Prometheus metrics on this address
    #[arg(long, env = "MOCK_METRICS_ADDR")]
    metrics_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=info,tower_http=warn")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if let Some(metrics_addr) = args.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
    }

    tokio::spawn(mock_service::tps_measure_task());

    mock_service::run(
        args.addr,
        MockConfig {
            max_tps: args.max_tps,
        },
    )
    .await?;
    Ok(())
}
