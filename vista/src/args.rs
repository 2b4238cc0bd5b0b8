use std::path::PathBuf;

use clap::Parser;

/// Vista screen-guidance gateway
#[derive(Debug, Parser)]
#[command(name = "vista", about = "Streaming gateway for vision-language screen guidance")]
pub struct Args {
    /// Path to configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "vista.toml", env = "VISTA_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "VISTA_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Send one test completion to the selected provider and exit
    #[arg(long)]
    pub probe: bool,
}
