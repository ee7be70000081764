use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{Args, Parser, Subcommand};

use crate::loader::DEFAULT_CACHE_PATH;
use crate::tab::TabId;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Options {
    /// Document read when the cached data source is selected
    #[arg(long, default_value = DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,
    /// Tab opened when the query string names none
    #[arg(long, value_enum, default_value_t = TabId::DataConfig)]
    pub default_tab: TabId,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(about = "collect fork synchronization data from git")]
    Collect(CollectOptions),
    #[command(about = "render the dashboard as a static html page")]
    Render {
        #[command(flatten)]
        view: ViewOptions,
        #[arg(long, short, default_value = "index.html")]
        output: PathBuf,
    },
    #[command(about = "print synchronization statistics as json")]
    Stats {
        /// Read this file instead of the cached data
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    #[command(about = "explore the dashboard interactively")]
    Shell {
        #[command(flatten)]
        view: ViewOptions,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ViewOptions {
    /// Read this file instead of the cached data
    #[arg(long, short)]
    pub file: Option<PathBuf>,
    /// Query string to restore, e.g. 'tab=commits_fromlist&f0=.*fix.*'
    #[arg(long, short, default_value = "")]
    pub query: String,
    #[arg(long)]
    pub show_reverted: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CollectOptions {
    /// Write the document here instead of stdout
    #[arg(long, short)]
    pub output_file: Option<PathBuf>,
    #[arg(long, default_value = "https://github.com/zephyrproject-rtos/zephyr")]
    pub upstream_url: String,
    #[arg(long, default_value = "main")]
    pub upstream_rev: String,
    #[arg(long, default_value = "origin")]
    pub upstream_remote: String,
    #[arg(long, default_value = "https://github.com/nrfconnect/sdk-zephyr")]
    pub downstream_url: String,
    #[arg(long, default_value = "main")]
    pub downstream_rev: String,
    #[arg(long, default_value = "downstream")]
    pub downstream_remote: String,
    #[arg(long, default_value = "repo")]
    pub clone_dir: PathBuf,
    /// Fetch both remotes before collecting
    #[arg(long)]
    pub refetch_remote: bool,
    /// Check which upstream-only commits cherry-pick cleanly downstream
    #[arg(long)]
    pub check_cherry_pick: bool,
}

pub static OPTIONS: OnceLock<Options> = OnceLock::new();

pub fn initialize() -> &'static Options {
    OPTIONS.get_or_init(Options::parse)
}

pub fn get() -> &'static Options {
    OPTIONS.get().expect("options not initialized")
}
