use admission_webhook::config::{Config, Options};
use admission_webhook::server::WebhookServer;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_logging();

    let options = Options::parse();
    let config = match Config::resolve(options) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "config error");
            std::process::exit(1);
        }
    };

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            error!(%problem, "invalid configuration");
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        reserved_namespace = %config.reserved_namespace,
        cloud_provider = %config.cloud_provider,
        "starting admission webhook server"
    );

    if let Err(err) = WebhookServer::new(config).run().await {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
