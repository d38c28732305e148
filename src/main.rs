// Command-line front end: resolve shared text and print the result as JSON

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use media_resolver::{MediaResolver, ResolverConfig};

/// Resolve a shared link into a normalized media description
#[derive(Parser)]
#[command(name = "media-resolver", version)]
#[command(about = "Resolve shared links into video and image-gallery descriptions", long_about = None)]
struct Cli {
    /// Shared text containing the link (words are joined with spaces)
    #[arg(required = true)]
    text: Vec<String>,

    /// Per-endpoint timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Provider base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Provider bearer token
    #[arg(long)]
    token: Option<String>,

    /// HTTP or SOCKS5 proxy URL
    #[arg(long)]
    proxy: Option<String>,

    /// Do not follow shortlink redirects
    #[arg(long)]
    no_expand: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, mut config: ResolverConfig) -> ResolverConfig {
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(base) = &self.api_base {
            config = config.with_api_base_url(base.clone());
        }
        if self.token.is_some() {
            config = config.with_api_token(self.token.clone());
        }
        if self.proxy.is_some() {
            config = config.with_proxy(self.proxy.clone());
        }
        if self.no_expand {
            config = config.with_expand_short_links(false);
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("media_resolver=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();

    let config = cli.apply(ResolverConfig::load());
    let resolver = match MediaResolver::new(config) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to create resolver: {}", e);
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    match resolver.resolve(&cli.text.join(" ")).await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
