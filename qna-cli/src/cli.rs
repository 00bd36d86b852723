use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "qna",
    version,
    about = "Intent-routing QnA assistant on top of an MCP server"
)]
pub struct Cli {
    /// Path to client.toml (defaults to config/client.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Only log warnings and errors
    #[arg(long, short)]
    pub quiet: bool,
}
