use crate::api;
use crate::config::Settings;
use crate::error::{Result, ShopError};
use crate::types::{ApiResponse, Platform};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shopcmp", version, about = "momo / PChome product extraction (JSON only)")]
pub struct Cli {
    /// Settings file (JSON); defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// WebDriver server URL, e.g. a running chromedriver
    #[arg(long, global = true)]
    webdriver: Option<String>,
    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    headed: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract products for a keyword and write them to JSON
    Extract(ExtractArgs),
    /// Check whether both platforms have enough results for a keyword
    Check(CheckArgs),
    /// Print the effective settings
    Config,
    /// Show the activity log, most recent first
    Log(LogArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Momo,
    Pchome,
    Both,
}

impl Target {
    fn platforms(self) -> Vec<Platform> {
        match self {
            Target::Momo => vec![Platform::Momo],
            Target::Pchome => vec![Platform::Pchome],
            Target::Both => Platform::ALL.to_vec(),
        }
    }
}

#[derive(Args)]
struct ExtractArgs {
    platform: Target,
    keyword: String,
    /// Products to collect per platform
    #[arg(long, short = 'n', default_value_t = 50)]
    count: usize,
    /// Label stored with every product; defaults to the keyword
    #[arg(long)]
    query: Option<String>,
    /// Output file (single platform only); defaults to <platform>_products.json
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    keyword: String,
    #[arg(long, default_value_t = 100)]
    target: u64,
}

#[derive(Args)]
struct LogArgs {
    #[arg(long)]
    errors: bool,
    #[arg(long)]
    platform: Option<Platform>,
}

#[derive(Debug, Serialize)]
struct ExtractSummary {
    platform: Platform,
    keyword: String,
    requested: usize,
    extracted: usize,
    output: String,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.webdriver {
        settings.browser.webdriver_url = url;
    }
    if cli.headed {
        settings.browser.headless = false;
    }
    settings.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.cmd {
        Command::Extract(args) => finish(runtime.block_on(extract_cmd(&settings, args))),
        Command::Check(CheckArgs { keyword, target }) => {
            let check = runtime.block_on(api::check_both(&keyword, target, &settings));
            print_json(ApiResponse::ok(check));
        }
        Command::Config => print_json(ApiResponse::ok(&settings)),
        Command::Log(LogArgs { errors, platform }) => finish(api::read_activity(platform, errors)),
    }
    Ok(())
}

async fn extract_cmd(settings: &Settings, args: ExtractArgs) -> Result<Vec<ExtractSummary>> {
    let platforms = args.platform.platforms();
    if args.out.is_some() && platforms.len() > 1 {
        return Err(ShopError::InvalidConfig("--out needs a single platform".into()));
    }
    let query = args.query.as_deref().unwrap_or(&args.keyword);

    let mut summaries = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let products = api::extract(platform, &args.keyword, args.count, settings).await?;
        let out = args
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(platform.default_output()));
        api::export_products(&out, &products, Some(query))?;
        summaries.push(ExtractSummary {
            platform,
            keyword: args.keyword.clone(),
            requested: args.count,
            extracted: products.len(),
            output: out.display().to_string(),
        });
    }
    Ok(summaries)
}

/// Diagnostics go to stderr so stdout stays pure JSON. `RUST_LOG` overrides
/// the default level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shopcmp=info,warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn finish<T: Serialize>(res: Result<T>) {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}

fn print_json<T: Serialize>(val: T) {
    // pretty JSON output
    match serde_json::to_string_pretty(&val) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize output: {e}"),
    }
}
