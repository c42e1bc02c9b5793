use drover::http::HttpClient;
use mock_service::MockConfig;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::new(
                "drover=debug,fleet_load=debug,mock_service=debug,axum::rejection=trace",
            ))
            .with_test_writer()
            .try_init();
    });
}

/// A fresh mock API on an ephemeral port, served by the current runtime.
#[allow(unused)]
pub async fn mock_host(config: MockConfig) -> String {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let addr = mock_service::spawn(addr, config).await.unwrap();
    format!("http://{addr}")
}

#[allow(unused)]
pub async fn mock_client() -> HttpClient {
    HttpClient::new(&mock_host(MockConfig::default()).await).unwrap()
}
