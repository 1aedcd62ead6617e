use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{debug, info, warn};

use ytsum::config::{Config, config_path};
use ytsum::metadata::YouTubeDataApi;
use ytsum::pipeline::Pipeline;
use ytsum::summarize::AnthropicSummarizer;
use ytsum::youtube::InnerTubeTranscripts;

mod cli;

use cli::Cli;

fn setup_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_module("ytsum", log::LevelFilter::Info).parse_default_env();

    if let Some(path) = log_file {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(path)?);
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();

    if let Some(path) = log_file {
        info!("Logging initialized: {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the keys may come from the real environment
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    setup_logging(cli.log_file.as_deref())?;

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Ignoring unreadable .env file: {e}"),
    }

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file {}: {e}", config_path().display());
        Config::default()
    });

    let host = cli.host.as_deref().unwrap_or(config.host());
    let port = cli.port.unwrap_or(config.port());
    let lang = cli.lang.as_deref().unwrap_or(config.lang());

    let ip: IpAddr = host.parse().wrap_err_with(|| format!("invalid bind address: {host}"))?;
    let addr = SocketAddr::new(ip, port);

    let client = reqwest::Client::new();
    let pipeline = Pipeline::new(
        Arc::new(YouTubeDataApi::new(client.clone(), cli.youtube_api_key.clone())),
        Arc::new(InnerTubeTranscripts::new(client.clone(), lang)),
        Arc::new(AnthropicSummarizer::new(client, cli.anthropic_api_key.clone())),
    );

    info!("Caption language: {lang}");
    ytsum::server::serve(addr, Arc::new(pipeline)).await
}
