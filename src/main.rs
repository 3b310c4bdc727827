//! CLI entry point: issues a single request through a [`RestAdapter`] and
//! prints the response.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rest_adapter::fetch::auth::{ApiKey, UrlParam};
use rest_adapter::fetch::{HttpClient, Session};
use rest_adapter::{AdapterConfig, LogConfig, LogLevel, RequestOptions, RestAdapter, Verb};
use tracing::info;

#[derive(Parser)]
#[command(name = "rest_adapter")]
#[command(about = "Send a logged HTTPS request to a REST API", long_about = None)]
struct Cli {
    /// Base URL (starting with http) or bare hostname
    #[arg(value_name = "TARGET")]
    target: String,

    /// Path segment appended to the base URL, e.g. an API version
    #[arg(long)]
    path_suffix: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, default_value_t = false)]
    insecure: bool,

    /// Default header sent with the request, as NAME:VALUE (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// JSON file with default headers
    #[arg(long)]
    headers_file: Option<String>,

    /// Environment variable holding the API key
    #[arg(long)]
    api_key_env: Option<String>,

    /// Send the API key in this header instead of `Authorization: Bearer`
    #[arg(long, requires = "api_key_env", conflicts_with = "api_key_param")]
    api_key_header: Option<String>,

    /// Send the API key as this query parameter
    #[arg(long, requires = "api_key_env")]
    api_key_param: Option<String>,

    /// Total request timeout in seconds (none by default)
    #[arg(long)]
    timeout: Option<u64>,

    /// Log file path (overrides LOG_FILE_PATH)
    #[arg(long)]
    log_file: Option<String>,

    /// Level of the adapter's request log lines
    #[arg(long, default_value = "debug")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a GET request
    Get(CallArgs),
    /// Send a POST request
    Post(BodyArgs),
    /// Send a PUT request
    Put(BodyArgs),
    /// Send a DELETE request
    Delete(CallArgs),
}

#[derive(Args)]
struct CallArgs {
    /// Endpoint appended to the base URL
    endpoint: String,

    /// Query parameter as KEY=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,
}

#[derive(Args)]
struct BodyArgs {
    #[command(flatten)]
    call: CallArgs,

    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if let Some(path) = &cli.log_file {
        log_config = log_config.with_log_file(path);
    }
    let _log_guard = rest_adapter::logging::init(&log_config)?;

    let adapter = build_adapter(&cli)?;

    let (verb, call, data) = match &cli.command {
        Commands::Get(call) => (Verb::Get, call, None),
        Commands::Delete(call) => (Verb::Delete, call, None),
        Commands::Post(args) => (Verb::Post, &args.call, args.data.as_deref()),
        Commands::Put(args) => (Verb::Put, &args.call, args.data.as_deref()),
    };

    let mut options = RequestOptions::new();
    for param in &call.params {
        let (key, value) = param
            .split_once('=')
            .with_context(|| format!("query parameter '{param}' is not KEY=VALUE"))?;
        options = options.param(key, value);
    }
    if let Some(data) = data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data is not valid JSON")?;
        options = options.json(body);
    }

    let response = adapter.dispatch(verb, &call.endpoint, options).await?;
    info!(
        status_code = response.status().as_u16(),
        bytes = response.body().len(),
        "Response received"
    );

    println!("{} {}", response.status().as_u16(), response.reason());
    println!("{}", response.text());

    if !response.is_success() {
        bail!("{verb} {} returned {}", call.endpoint, response.status());
    }
    Ok(())
}

/// Builds the adapter, wrapping the session in an API-key decorator when
/// `--api-key-env` is given.
fn build_adapter(cli: &Cli) -> Result<RestAdapter<Box<dyn HttpClient>>> {
    let mut config = if cli.target.starts_with("http") {
        AdapterConfig::new(&cli.target)
    } else {
        AdapterConfig::for_host(&cli.target)
    };
    config = config
        .with_ssl_verify(!cli.insecure)
        .with_timeout(cli.timeout.map(Duration::from_secs))
        .with_log_level(cli.log_level.parse::<LogLevel>()?);
    if let Some(suffix) = &cli.path_suffix {
        config = config.with_path_suffix(suffix);
    }
    if let Some(path) = &cli.headers_file {
        config = config.with_headers_file(path)?;
    }
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("header '{header}' is not NAME:VALUE"))?;
        config = config.try_with_header(name.trim(), value.trim())?;
    }

    let session = Session::from_options(&config.session_options())?;
    let client: Box<dyn HttpClient> = match (&cli.api_key_env, &cli.api_key_param) {
        (None, _) => Box::new(session),
        (Some(var), Some(param)) => Box::new(UrlParam::from_env(session, param.as_str(), var)?),
        (Some(var), None) => match &cli.api_key_header {
            Some(header) => Box::new(ApiKey::from_env(session, header, var)?),
            None => Box::new(ApiKey::bearer_from_env(session, var)?),
        },
    };

    Ok(RestAdapter::with_client(config, client)?)
}
