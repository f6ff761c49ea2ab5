//! Artsync CLI — one-way sheet → knowledge-base reconciliation.
//!
//! Usage:
//!   artsync run [--sheet url] [--api url] [--language fi] [--site fiwiki] ...
//!   artsync preview [--sheet url]
//!
//! `run` reads `ARTSYNC_USER` / `ARTSYNC_PASSWORD` for bot credentials;
//! without them edits are attempted anonymously.

use artsync::{
    fetch_sheet, ApiRepository, Credentials, ItemId, Reconciler, RunStats, SheetRow, SyncConfig,
};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;

/// Published CSV export of the Pori public-art sheet
const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1XYeO5BNS71y2XjLfCHwDExDewKInDOCbqFW6-1gVIBU/pub?output=csv";

const DEFAULT_API_URL: &str = "https://www.wikidata.org/w/api.php";

#[derive(Parser)]
#[command(
    name = "artsync",
    version,
    about = "One-way sync of public-art spreadsheet rows into a Wikibase knowledge base"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full synchronization pass
    Run {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Fetch and parse the sheet without contacting the knowledge base
    Preview {
        #[command(flatten)]
        sheet: SheetArgs,
    },
}

#[derive(Args)]
struct SheetArgs {
    /// Source spreadsheet URL (CSV export)
    #[arg(long, default_value = DEFAULT_SHEET_URL)]
    sheet: String,
}

#[derive(Args)]
struct TargetArgs {
    /// Knowledge-base action-API endpoint
    #[arg(long, default_value = DEFAULT_API_URL)]
    api: String,
    /// Language of the sheet's labels (also scopes creator search)
    #[arg(long, default_value = "fi")]
    language: String,
    /// Site key of the wiki edition the sheet links to
    #[arg(long, default_value = "fiwiki")]
    site: String,
    /// Coordinate-location property
    #[arg(long, default_value = "P625")]
    coordinate_property: String,
    /// Country property
    #[arg(long, default_value = "P17")]
    country_property: String,
    /// Item the country claim targets
    #[arg(long, default_value = "Q33")]
    country_item: String,
    /// Creator property
    #[arg(long, default_value = "P170")]
    creator_property: String,
}

impl TargetArgs {
    fn into_config(self, sheet_url: String) -> SyncConfig {
        SyncConfig::wikidata(sheet_url)
            .with_endpoint(self.api)
            .with_label_language(self.language)
            .with_sitelink_site(self.site)
            .with_coordinate_property(self.coordinate_property)
            .with_country(self.country_property, ItemId::new(self.country_item))
            .with_creator_property(self.creator_property)
    }
}

fn sheet_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::new()
}

fn credentials_from_env() -> Option<Credentials> {
    let username = std::env::var("ARTSYNC_USER").ok()?;
    let password = std::env::var("ARTSYNC_PASSWORD").ok()?;
    Some(Credentials { username, password })
}

fn cmd_run(sheet: SheetArgs, target: TargetArgs) -> i32 {
    let config = target.into_config(sheet.sheet);

    let rows = match fetch_sheet(&sheet_client(), &config.sheet_url) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: failed to fetch sheet: {}", e);
            return 1;
        }
    };

    let repo = match ApiRepository::new(&config.endpoint) {
        Ok(repo) => match credentials_from_env() {
            Some(credentials) => repo.with_credentials(credentials),
            None => repo,
        },
        Err(e) => {
            eprintln!("Error: failed to build API client: {}", e);
            return 1;
        }
    };

    match Reconciler::new(Arc::new(repo), config).run(&rows) {
        Ok(stats) => {
            print_summary(&stats);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_summary(stats: &RunStats) {
    println!(
        "{} rows ({} without reference, {} missing items)",
        stats.rows_seen, stats.rows_skipped, stats.items_missing
    );
    println!(
        "{} facts added: {} coordinates, {} countries, {} sitelinks, {} labels, {} creators",
        stats.facts_added(),
        stats.coordinates_added,
        stats.countries_added,
        stats.sitelinks_added,
        stats.labels_added,
        stats.creators_added
    );
    if stats.rejections > 0 {
        println!("{} submissions rejected (see log)", stats.rejections);
    }
}

fn cmd_preview(sheet: SheetArgs) -> i32 {
    let rows = match fetch_sheet(&sheet_client(), &sheet.sheet) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: failed to fetch sheet: {}", e);
            return 1;
        }
    };
    if rows.is_empty() {
        println!("No data rows.");
        return 0;
    }
    for row in &rows {
        print_row(row);
    }
    0
}

fn print_row(row: &SheetRow) {
    let reference = match &row.item {
        Some(id) => id.to_string(),
        None => "(no reference — skipped)".to_string(),
    };
    let coordinates = match row.coordinates {
        Some((longitude, latitude)) => format!("{},{}", longitude, latitude),
        None => "-".to_string(),
    };
    println!(
        "{:<12} coord={:<20} label={:<28} creator={:<24} wiki={}",
        reference, coordinates, row.label, row.creator, row.wiki_url
    );
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Run { sheet, target } => cmd_run(sheet, target),
        Commands::Preview { sheet } => cmd_preview(sheet),
    };
    std::process::exit(code);
}
