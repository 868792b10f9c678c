//! kaggle-client: download, extract, parse and cache Kaggle datasets.
//!
//! A dataset request flows through four stages: resolve the request against
//! the API, check local state, fetch the archive over HTTPS, then extract it
//! and optionally parse the CSV files inside into records.
//!
//! # Modules
//!
//! - [`client`]: [`KaggleClient`], the pipeline tying the stages together
//! - [`config`]: construction options and credential resolution
//! - [`api`]: dataset references, request building and the HTTP transport seam
//! - [`cache`]: parsed-result files and extraction-directory lookups
//! - [`archive`]: saving and unpacking downloaded zip archives
//! - [`records`]: CSV parsing into records and the cache JSON format
//! - [`error`]: error types for kaggle-client operations
//!
//! # Example
//!
//! ```no_run
//! use kaggle_client::{ClientOptions, DownloadOptions, KaggleClient};
//!
//! let client = KaggleClient::new(ClientOptions::new().username("me").api_key("secret"))?;
//! let options = DownloadOptions::new().use_cache(true).parse_csv(true);
//! let output = client.download_dataset("owner", "dataset", &options)?;
//! # Ok::<(), kaggle_client::KaggleError>(())
//! ```

pub mod api;
pub mod archive;
pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod records;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use api::transport::{HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use api::DatasetRef;
pub use cache::DownloadOptions;
pub use client::{DatasetOutput, KaggleClient};
pub use config::{ClientConfig, ClientOptions};
pub use error::{ErrorKind, KaggleError};
pub use records::{ParsedResult, Record};

/// The kaggle CLI application.
#[derive(Parser)]
#[command(name = "kaggle")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Kaggle username (falls back to kaggle.json or KAGGLE_USERNAME).
    #[arg(long, global = true)]
    username: Option<String>,

    /// Kaggle API key (falls back to kaggle.json or KAGGLE_KEY).
    #[arg(long, global = true)]
    key: Option<String>,

    /// Path to a kaggle.json credentials file.
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Directory for archives and extracted datasets.
    #[arg(long, global = true, env = "KAGGLE_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Directory for parsed-result cache files.
    #[arg(long, global = true, env = "KAGGLE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Serve requests from local state only; never touch the network.
    #[arg(long, global = true)]
    cache_only: bool,

    /// Increase log output (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Download a dataset, optionally parsing and caching its CSV files.
    Download(DownloadArgs),
    /// List the files of a dataset.
    Files(DatasetArgs),
    /// Show dataset metadata.
    Metadata(DatasetArgs),
    /// Parse a local CSV file and print its records as JSON.
    Parse(ParseArgs),
}

#[derive(clap::Args)]
struct DownloadArgs {
    /// Dataset as 'owner/name' or a kaggle.com dataset URL.
    dataset: String,

    /// Parse contained CSV files into records.
    #[arg(long)]
    parse_csv: bool,

    /// Reuse and populate local state.
    #[arg(long)]
    use_cache: bool,

    /// With --cache-only, fail when the dataset is not cached.
    #[arg(long)]
    force_cache: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(clap::Args)]
struct DatasetArgs {
    /// Dataset as 'owner/name' or a kaggle.com dataset URL.
    dataset: String,
}

#[derive(clap::Args)]
struct ParseArgs {
    /// CSV file to parse.
    input: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Machine-readable result of the download subcommand.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum DownloadReport<'a> {
    Directory { path: String },
    Parsed { data: &'a ParsedResult },
    NotCached,
}

/// Run the kaggle CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), KaggleError> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match &cli.command {
        Commands::Download(args) => run_download(&cli, args),
        Commands::Files(args) => {
            let dataset = api::resolve::parse_dataset_input(&args.dataset)?;
            let listing = build_client(&cli)?.list_dataset_files(dataset.owner(), dataset.name())?;
            print_json(&listing)
        }
        Commands::Metadata(args) => {
            let dataset = api::resolve::parse_dataset_input(&args.dataset)?;
            let metadata = build_client(&cli)?.dataset_metadata(dataset.owner(), dataset.name())?;
            print_json(&metadata)
        }
        Commands::Parse(args) => {
            let records = records::io_csv::parse_csv_file(&args.input)?;
            print_json(&records)
        }
    }
}

fn build_client(cli: &Cli) -> Result<KaggleClient, KaggleError> {
    let mut options = ClientOptions::new().cache_only(cli.cache_only);
    if let Some(username) = &cli.username {
        options = options.username(username.as_str());
    }
    if let Some(key) = &cli.key {
        options = options.api_key(key.as_str());
    }
    if let Some(path) = &cli.credentials {
        options = options.credentials_file(path);
    }
    if let Some(dir) = &cli.download_dir {
        options = options.download_dir(dir);
    }
    if let Some(dir) = &cli.cache_dir {
        options = options.cache_dir(dir);
    }
    if let Some(secs) = cli.timeout {
        options = options.timeout_secs(secs);
    }
    KaggleClient::new(options)
}

fn run_download(cli: &Cli, args: &DownloadArgs) -> Result<(), KaggleError> {
    let dataset = api::resolve::parse_dataset_input(&args.dataset)?;
    let client = build_client(cli)?;
    let options = DownloadOptions::new()
        .use_cache(args.use_cache)
        .parse_csv(args.parse_csv)
        .force_cache(args.force_cache);

    let output = client.download(&dataset, &options)?;

    match args.output {
        OutputFormat::Json => {
            let report = match &output {
                Some(DatasetOutput::Directory(path)) => DownloadReport::Directory {
                    path: path.display().to_string(),
                },
                Some(DatasetOutput::Parsed(data)) => DownloadReport::Parsed { data },
                None => DownloadReport::NotCached,
            };
            print_json(&report)
        }
        OutputFormat::Text => match &output {
            Some(DatasetOutput::Directory(path)) => {
                println!("{}", path.display());
                Ok(())
            }
            Some(DatasetOutput::Parsed(data)) => print_json(data),
            None => {
                println!("not cached");
                Ok(())
            }
        },
    }
}

fn print_json<S: Serialize + ?Sized>(value: &S) -> Result<(), KaggleError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| KaggleError::Io(io::Error::from(e)))?;
    println!("{text}");
    Ok(())
}
