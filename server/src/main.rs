use clap::Parser;
use metrics_exporter_statsd::StatsdBuilder;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(about = "obs-ndi update ping and download stats service")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ndi_update_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ndi_update_server::config::load_from_file(&cli.config)?;

    if let Some(statsd) = &config.statsd {
        let recorder = StatsdBuilder::from(&statsd.host, statsd.port).build(Some(&statsd.prefix))?;
        metrics::set_global_recorder(recorder)?;
        tracing::info!(host = %statsd.host, port = statsd.port, "statsd exporter installed");
    }

    ndi_update_server::run(config).await?;
    Ok(())
}
