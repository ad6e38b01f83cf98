mod config;
mod render;

use anyhow::{Context, Result, bail};
use argvs::{ArgStore, ParseReport};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "argvs")]
#[command(
    version,
    about = "Inspect how an argument vector splits into script, entries and flags",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the script, entries and flags parsed from TOKENS
    Inspect(InspectArgs),

    /// Print the value(s) stored for a key, one per line
    Get(GetArgs),

    /// Print whether a flag is present
    Has(HasArgs),

    /// Write a default argvs.json
    Init(InitArgs),
}

#[derive(Args)]
struct StoreArgs {
    /// Keep leading dashes on keys and flags
    #[arg(long)]
    keep_dashes: bool,

    /// Declared token count (default: number of TOKENS)
    #[arg(long, value_name = "N")]
    expected_count: Option<usize>,

    /// Path to an argvs.json options file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tokens to parse, script name first (after `--`)
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct InspectArgs {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Parser)]
struct GetArgs {
    /// Key to look up (leading dashes are stripped unless --keep-dashes)
    #[arg(value_name = "KEY")]
    key: String,

    /// Collapse repeated values to their first occurrence
    #[arg(short, long)]
    unique: bool,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Parser)]
struct HasArgs {
    /// Flag to test
    #[arg(value_name = "FLAG")]
    flag: String,

    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Parser)]
struct InitArgs {
    /// Directory to write argvs.json into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing argvs.json
    #[arg(long)]
    force: bool,
}

impl StoreArgs {
    fn parse_store(&self) -> Result<(ArgStore, ParseReport)> {
        let mut options = config::load_config(self.config.as_deref())?
            .map(|loaded| {
                tracing::debug!(path = %loaded.path.display(), "applying config");
                loaded.config.store
            })
            .unwrap_or_default();
        if self.keep_dashes {
            options.strip_leading_dashes = false;
        }

        let expected = self.expected_count.unwrap_or(self.tokens.len());
        tracing::debug!(tokens = self.tokens.len(), expected, "parsing tokens");

        let mut store = ArgStore::default();
        let report = store.reset_with(&self.tokens, Some(expected), options);
        if !report.is_parsed() {
            tracing::warn!(
                expected,
                actual = self.tokens.len(),
                "token count mismatch, store left empty"
            );
        }
        Ok((store, report))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => inspect(args),
        Commands::Get(args) => get(args),
        Commands::Has(args) => has(args),
        Commands::Init(args) => init(args),
    }
}

fn inspect(args: InspectArgs) -> Result<()> {
    tracing::debug!("executing inspect command");
    let (store, report) = args.store.parse_store()?;

    if args.json {
        let json = render::inspect_json(&store, &report).context("failed to serialize store")?;
        println!("{json}");
    } else {
        print!("{}", render::inspect_text(&store, &report));
    }
    Ok(())
}

fn get(args: GetArgs) -> Result<()> {
    tracing::debug!("executing get command");
    let (store, _) = args.store.parse_store()?;

    let Some(value) = store.get_arg(&args.key, args.unique) else {
        bail!("no value for key '{}'", args.key);
    };
    for v in value.into_vec() {
        println!("{v}");
    }
    Ok(())
}

fn has(args: HasArgs) -> Result<()> {
    tracing::debug!("executing has command");
    let (store, _) = args.store.parse_store()?;
    println!("{}", store.has_flag(&args.flag));
    Ok(())
}

fn init(args: InitArgs) -> Result<()> {
    tracing::debug!("executing init command");
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    let dest = config::write_default_config(&dir, args.force)?;
    eprintln!("Created: {}", dest.display());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
