use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use colored::Colorize;
use library_circulation::{Catalog, LibraryApplication, LibraryConfig, SystemClock};
use rand::{SeedableRng, rngs::StdRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the library circulation console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with library settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First id handed out to library assets
    #[arg(long)]
    first_asset_id: Option<u32>,

    /// Number of copies stocked for each demo book, 0 skips the demo books
    #[arg(long)]
    demo_copies: Option<u32>,

    /// Start with an empty catalog instead of the demo books
    #[arg(long)]
    no_demo: bool,

    /// Seed for the license terms of digital books, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Show book inventories as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output with detailed circulation logs
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Settings from the config file, overridden by command-line flags
    fn library_config(&self) -> Result<LibraryConfig, library_circulation::ConfigError> {
        let mut config = match &self.config {
            Some(path) => LibraryConfig::from_json_file(path)?,
            None => LibraryConfig::default(),
        };
        if let Some(first_asset_id) = self.first_asset_id {
            config.first_asset_id = first_asset_id;
        }
        if let Some(demo_copies) = self.demo_copies {
            config.demo_copies = demo_copies;
        }
        if self.no_demo {
            config.seed_demo_books = false;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter =
        if args.verbose { "library_circulation=debug" } else { "library_circulation=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "An error occurred with the following message:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Build the session catalog and hand the console to the librarian
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.library_config()?;
    let mut rng = args.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let catalog = Catalog::new(&config, &mut rng)?;
    tracing::info!(
        books = catalog.books().len(),
        next_asset_id = ?catalog.next_asset_id(),
        "library open"
    );

    println!("{}", "Library Circulation".green().bold());
    println!("===================");

    let mut app =
        LibraryApplication::new(catalog, io::stdin().lock(), io::stdout().lock(), SystemClock, rng)
            .with_json_inventory(args.json);
    app.run()?;

    println!("\n{}", "Goodbye!".green().bold());
    Ok(())
}
