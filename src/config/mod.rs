//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{fmt, fs, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

mod cli;

pub use cli::{
    CliArgs, Command, LoggingOverrides, PostsAction, PostsArgs, ServeArgs, ServeOverrides,
    StoreBackendArg, StoreOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postdeck";
const ENV_PREFIX: &str = "POSTDECK";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TABLE: &str = "posts";
const DEFAULT_REST_PATH: &str = "/rest/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub table: String,
    pub rest_path: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub enum StoreBackend {
    /// Process-local table; contents vanish on exit.
    Memory,
    /// PostgREST-compatible hosted table.
    Rest { url: Url, api_key: String },
}

impl fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("Memory"),
            StoreBackend::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", &url.as_str())
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Posts(args)) => {
            raw.apply_store_overrides(&args.store);
            raw.apply_logging_overrides(&args.logging);
        }
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    store: RawStoreSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        self.apply_logging_overrides(&overrides.logging);
        self.apply_store_overrides(&overrides.store);
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_store_overrides(&mut self, overrides: &StoreOverrides) {
        if let Some(backend) = overrides.store_backend {
            self.store.backend = Some(backend.as_str().to_string());
        }
        if let Some(url) = overrides.store_url.as_ref() {
            self.store.url = Some(url.clone());
        }
        if let Some(table) = overrides.store_table.as_ref() {
            self.store.table = Some(table.clone());
        }
        if let Some(path) = overrides.store_api_key_file.as_ref() {
            self.store.api_key_file = Some(path.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            store,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let store = build_store_settings(store)?;

        Ok(Self {
            server,
            logging,
            store,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let table = store
        .table
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TABLE.to_string());
    if table.is_empty() {
        return Err(LoadError::invalid("store.table", "must not be empty"));
    }

    let rest_path = store
        .rest_path
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_REST_PATH.to_string());

    let timeout_secs = store.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "store.timeout_seconds",
            "must be greater than zero",
        ));
    }

    let backend = match non_blank(store.backend).as_deref() {
        None => build_rest_backend(store.url, store.api_key, store.api_key_file)?,
        Some(name) if name.eq_ignore_ascii_case("rest") => {
            build_rest_backend(store.url, store.api_key, store.api_key_file)?
        }
        Some(name) if name.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
        Some(other) => {
            return Err(LoadError::invalid(
                "store.backend",
                format!("unknown backend `{other}`, expected `rest` or `memory`"),
            ));
        }
    };

    Ok(StoreSettings {
        backend,
        table,
        rest_path,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_rest_backend(
    url: Option<String>,
    api_key: Option<String>,
    api_key_file: Option<PathBuf>,
) -> Result<StoreBackend, LoadError> {
    let raw_url = non_blank(url)
        .ok_or_else(|| LoadError::invalid("store.url", "required for the rest backend"))?;
    let url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("store.url", format!("invalid url: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "store.url",
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }

    let api_key = match api_key_file {
        Some(path) => {
            let contents = fs::read_to_string(&path).map_err(|err| {
                LoadError::invalid(
                    "store.api_key_file",
                    format!("failed to read {}: {err}", path.display()),
                )
            })?;
            non_blank(Some(contents))
                .ok_or_else(|| LoadError::invalid("store.api_key_file", "file is empty"))?
        }
        None => non_blank(api_key)
            .ok_or_else(|| LoadError::invalid("store.api_key", "required for the rest backend"))?,
    };

    Ok(StoreBackend::Rest { url, api_key })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    backend: Option<String>,
    url: Option<String>,
    api_key: Option<String>,
    api_key_file: Option<PathBuf>,
    table: Option<String>,
    rest_path: Option<String>,
    timeout_seconds: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
