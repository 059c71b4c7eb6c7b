use csms_server::{ServerConfig, ServerContext};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    info!(
        "starting CSMS on port {} ({})",
        config.listen_port,
        if config.tls.is_some() { "mutual TLS" } else { "plain" }
    );

    let context = ServerContext::new(config);
    let shutdown = CancellationToken::new();

    let ctrl_c = {
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("couldn't listen for shutdown signal: {}", e);
                return;
            }
            info!("shutdown requested");
            shutdown.cancel();
        }
    };
    tokio::spawn(ctrl_c);

    let result = context.run(shutdown).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    info!("stopped CSMS");
    result
}
