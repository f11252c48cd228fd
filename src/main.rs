use std::sync::Arc;

use clap::Parser;

use dci_site::config::{self, AppState, Config};
use dci_site::contact::ResendMailer;
use dci_site::logger;
use dci_site::server::{self, ShutdownSignal};

/// DC Infrastructures landing page server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file path without extension (config.toml is used by default)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Override the directory the site is served from
    #[arg(long)]
    site_root: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // .env is optional; real deployments set the key in the environment
    let _ = dotenvy::dotenv();

    let mut cfg = Config::load_from(&args.config)?;
    if let Some(root) = args.site_root {
        cfg.site.root = root;
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let mailer = ResendMailer::from_config(&cfg.contact)?;
    if !mailer.has_api_key() {
        logger::log_warning(&format!(
            "{} is not set; contact submissions will be rejected by the provider",
            cfg.contact.api_key_env
        ));
    }

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, Arc::new(mailer)));
    let shutdown = Arc::new(ShutdownSignal::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    // Connections are spawned with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state, shutdown))
        .await?;
    Ok(())
}
