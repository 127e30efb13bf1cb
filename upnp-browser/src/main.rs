use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use content_directory::{Browser, ContentDirectory, Expand, Node};
use soap_client::{SoapClient, SoapClientConfig};
use upnp_discovery::{DescriptionFetcher, DiscoveryConfig, RootDevice};

pub mod render;
pub mod tree_walk;

/// UPnP media browser
///
/// Discovers media servers on the local network, prints their device
/// descriptions and walks their content directories.
#[derive(Parser, Debug)]
#[command(name = "upnp-browser")]
#[command(about = "Discover, describe and browse UPnP media servers")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Timeout in seconds for description and Browse requests (none by default)
    #[arg(long, global = true)]
    pub http_timeout: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Listen for device announcements and list the devices seen
    Discover {
        /// How long to listen, in seconds
        #[arg(short, long, default_value = "5")]
        window: u64,

        /// Also count unicast search replies as sightings
        #[arg(long)]
        search_responses: bool,

        /// Listen on an ephemeral port instead of 1900
        #[arg(long)]
        ephemeral_port: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch and print the device description at LOCATION
    Describe {
        location: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Walk the content directory of the device described at LOCATION
    Browse {
        location: String,

        /// Object to start from; "0" is the content root
        #[arg(short, long, default_value = "0")]
        object_id: String,

        /// Number of levels to expand
        #[arg(short, long, default_value = "1")]
        depth: u32,

        /// Print JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout == Some(0) {
            return Err(anyhow::anyhow!("HTTP timeout must be positive"));
        }

        match &self.command {
            Command::Discover { window, .. } if *window == 0 => {
                return Err(anyhow::anyhow!("Discovery window must be positive"));
            }
            Command::Browse { depth, .. } if *depth == 0 => {
                return Err(anyhow::anyhow!("Browse depth must be at least 1"));
            }
            Command::Browse { object_id, .. } if object_id.is_empty() => {
                return Err(anyhow::anyhow!("Object id must not be empty"));
            }
            _ => {}
        }

        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                    self.log_level
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments and environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub http_timeout: Option<Duration>,
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            command: args.command,
            http_timeout: args.http_timeout.map(Duration::from_secs),
            log_level: args.log_level,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments and environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_args(Args::parse(), |name| std::env::var(name).ok())
    }

    /// Apply `UPNP_*` overrides from `env` to `args`, then validate
    pub fn from_args(mut args: Args, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(timeout) = env("UPNP_HTTP_TIMEOUT") {
            args.http_timeout = Some(
                timeout
                    .parse()
                    .context("Invalid UPNP_HTTP_TIMEOUT environment variable")?,
            );
        }

        if let Some(log_level) = env("UPNP_LOG_LEVEL") {
            args.log_level = log_level;
        }

        if let Command::Discover {
            window,
            search_responses,
            ..
        } = &mut args.command
        {
            if let Some(value) = env("UPNP_DISCOVERY_WINDOW") {
                *window = value
                    .parse()
                    .context("Invalid UPNP_DISCOVERY_WINDOW environment variable")?;
            }

            if env("UPNP_SEARCH_RESPONSES").is_some() {
                *search_responses = true;
            }
        }

        args.validate()?;

        Ok(Config::from(args))
    }

    fn soap_client(&self) -> SoapClient {
        let mut config = SoapClientConfig::default();
        if let Some(timeout) = self.http_timeout {
            config = config.with_connect_timeout(timeout).with_read_timeout(timeout);
        }
        SoapClient::with_config(&config)
    }

    fn description_fetcher(&self) -> Result<DescriptionFetcher> {
        let fetcher = match self.http_timeout {
            Some(timeout) => DescriptionFetcher::with_timeout(timeout),
            None => DescriptionFetcher::new(),
        };
        fetcher.context("Failed to create HTTP client")
    }

    fn browser(&self) -> Result<Browser> {
        Ok(Browser::new(
            self.description_fetcher()?,
            ContentDirectory::with_client(self.soap_client()),
        ))
    }
}

/// Initialize tracing/logging with the specified log level
fn init_tracing(log_level: &str) {
    let filter = match log_level.to_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

async fn run_discover(
    window: Duration,
    search_responses: bool,
    ephemeral_port: bool,
    json: bool,
) -> Result<()> {
    let config = if ephemeral_port {
        DiscoveryConfig::ephemeral_port()
    } else {
        DiscoveryConfig::default()
    };
    let config = config.with_search_responses(search_responses || ephemeral_port);

    info!("Listening for devices for {}s...", window.as_secs());

    let devices = upnp_discovery::discover_with_config(config, window)
        .await
        .context("Failed during device discovery")?;

    info!("Discovered {} device(s)", devices.len());
    if devices.is_empty() {
        warn!("No devices answered; check that multicast traffic is allowed on this network");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
    } else {
        print!("{}", render::root_devices(&devices));
    }

    Ok(())
}

fn run_describe(config: &Config, location: &str, json: bool) -> Result<()> {
    let root = Arc::new(root_device_at(location)?);
    let device = config
        .description_fetcher()?
        .fetch(&root)
        .with_context(|| format!("Failed to describe device at {}", location))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*device)?);
    } else {
        print!("{}", render::device(&device));
    }

    Ok(())
}

fn run_browse(config: &Config, location: &str, object_id: &str, depth: u32, json: bool) -> Result<()> {
    let browser = config.browser()?;
    let root = Arc::new(root_device_at(location)?);

    let device = browser
        .fetcher()
        .fetch(&root)
        .with_context(|| format!("Failed to describe device at {}", location))?;

    let service = device
        .content_directory()
        .cloned()
        .with_context(|| format!("'{}' has no content directory service", device.friendly_name))?;

    debug!(control_url = %service.control_url, object_id, depth, "Browsing");

    let listing = browser
        .directory()
        .list_children(&service, object_id)
        .with_context(|| format!("Failed to browse object '{}'", object_id))?;

    let nodes: Vec<Node> = listing
        .containers
        .into_iter()
        .map(Node::from)
        .chain(listing.items.into_iter().map(Node::from))
        .collect();

    let tree = tree_walk::walk(&browser, nodes, depth).context("Failed to expand the content tree")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", render::tree(&tree));
    }

    Ok(())
}

/// A root device record for a description URL given on the command line
fn root_device_at(location: &str) -> Result<RootDevice> {
    let url = soap_client::Url::parse(location)
        .with_context(|| format!("'{}' is not an absolute URL", location))?;
    let origin = url
        .socket_addrs(|| Some(80))
        .with_context(|| format!("Cannot resolve host of {}", location))?
        .into_iter()
        .next()
        .with_context(|| format!("No address for host of {}", location))?;

    Ok(RootDevice::new(origin, location))
}

/// Run a blocking phase off the async runtime
async fn blocking<T, F>(phase: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(phase)
        .await
        .context("Worker task failed")?
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    debug!(?config, "Starting");

    match config.command.clone() {
        Command::Discover {
            window,
            search_responses,
            ephemeral_port,
            json,
        } => run_discover(Duration::from_secs(window), search_responses, ephemeral_port, json).await,
        Command::Describe { location, json } => {
            blocking(move || run_describe(&config, &location, json)).await
        }
        Command::Browse {
            location,
            object_id,
            depth,
            json,
        } => blocking(move || run_browse(&config, &location, &object_id, depth, json)).await,
    }
}
