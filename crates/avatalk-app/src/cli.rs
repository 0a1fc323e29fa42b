use std::path::PathBuf;

use avatalk_common::SpeakMode;
use clap::Parser;

/// avatalk: talk to a streaming avatar from the terminal.
#[derive(Parser, Debug)]
#[command(name = "avatalk", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (e.g. debug, avatalk=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// How submitted text reaches the avatar (direct or assistant).
    #[arg(long)]
    pub mode: Option<SpeakMode>,

    /// Avatar to stream, overriding `[avatar].avatar_name`.
    #[arg(long)]
    pub avatar: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
