use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the postdeck binary.
#[derive(Debug, Parser)]
#[command(name = "postdeck", version, about = "Single-page manager for a hosted posts table")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "POSTDECK_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the posts page.
    Serve(Box<ServeArgs>),
    /// List and edit posts from the terminal.
    Posts(PostsArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub store: StoreOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    Rest,
    Memory,
}

impl StoreBackendArg {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackendArg::Rest => "rest",
            StoreBackendArg::Memory => "memory",
        }
    }
}

/// The api key itself is only read from config, env or a file so it stays out of shell history.
#[derive(Debug, Args, Default, Clone)]
pub struct StoreOverrides {
    /// Override the store backend.
    #[arg(long = "store-backend", value_enum, value_name = "BACKEND")]
    pub store_backend: Option<StoreBackendArg>,

    /// Override the store base URL, e.g. <https://project.supabase.co>.
    #[arg(long = "store-url", value_name = "URL")]
    pub store_url: Option<String>,

    /// Override the table holding the posts.
    #[arg(long = "store-table", value_name = "TABLE")]
    pub store_table: Option<String>,

    /// Read the store api key from this file.
    #[arg(long = "store-api-key-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub store_api_key_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PostsArgs {
    #[command(flatten)]
    pub store: StoreOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(subcommand)]
    pub action: PostsAction,
}

#[derive(Debug, Subcommand, Clone)]
pub enum PostsAction {
    /// Print every post as JSON.
    List,
    /// Create a post.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Edit a post; omitted fields keep their stored value.
    Edit {
        /// Post id as the store reports it.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a post.
    Delete {
        /// Post id as the store reports it.
        id: String,
    },
}
