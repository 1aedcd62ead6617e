use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytsum", about = "Summarize YouTube videos over HTTP", version)]
pub struct Cli {
    /// Address to bind [default: 127.0.0.1, or `host` from the config file]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on [default: 3001, or `port` from the config file]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Preferred caption language [default: en, or `lang` from the config file]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: String,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: String,

    /// Also append logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
