//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// What font can we serve for you today?
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct Args {
    /// A JSON array of font records.
    #[arg(short, long)]
    #[clap(default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// Directory holding the font files, one subdirectory per font id.
    #[arg(short, long)]
    #[clap(default_value = "fonts")]
    pub font_dir: PathBuf,

    /// Address to listen on.
    #[arg(long)]
    #[clap(default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long)]
    #[clap(default_value = "8080")]
    pub port: u16,

    /// Base URL used in the file locators handed out by the API.
    /// Defaults to http://{host}:{port}.
    #[arg(short, long)]
    #[clap(default_value = None)]
    pub base_url: Option<String>,

    /// How many connections to serve concurrently.
    #[arg(short, long)]
    #[clap(default_value = "8")]
    pub workers: usize,
}

impl Args {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
