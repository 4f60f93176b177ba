//! galleryd - random image gallery server daemon

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use galleryd::{ConfigOverrides, GalleryConfig, Layout, Server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Random image gallery server
#[derive(Parser, Debug)]
#[command(name = "galleryd", version, about = "Serve a random image gallery")]
struct Args {
    /// Image root directory
    #[arg(long = "dir", visible_alias = "image-dir", value_name = "PATH")]
    image_dir: Option<PathBuf>,

    /// Theme subfolder to always use (label only with --flat)
    #[arg(long)]
    theme: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Read images directly from the image directory instead of theme folders
    #[arg(long)]
    flat: bool,

    /// Identity label shown on the page
    #[arg(long)]
    host_name: Option<String>,

    /// Template file (can be specified multiple times)
    #[arg(long = "template", value_name = "PATH")]
    templates: Vec<PathBuf>,

    /// Directory served under /static
    #[arg(long, value_name = "PATH")]
    static_dir: Option<PathBuf>,

    /// Images shown per page
    #[arg(long = "count")]
    images_per_page: Option<usize>,

    /// Seed for reproducible image selection
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file (defaults to galleryd.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: self.bind,
            port: self.port,
            image_dir: self.image_dir.clone(),
            theme: self.theme.clone(),
            layout: self.flat.then_some(Layout::Flat),
            host_name: self.host_name.clone(),
            templates: (!self.templates.is_empty()).then(|| self.templates.clone()),
            static_dir: self.static_dir.clone(),
            images_per_page: self.images_per_page,
            seed: self.seed,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "galleryd=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = match GalleryConfig::load(args.config.as_deref(), &args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    // Create and run server
    let server = Arc::new(Server::new(config));

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal_server.shutdown();
        }
    });

    server.run().await?;

    Ok(())
}
