mod render;
mod search;

use clap::{Parser, Subcommand};
use foodmap_core::PermitStatus;
use foodmap_gateway::FoodProviderClient;
use foodmap_search::{drive_surface, ControllerOptions, SearchController, SearchOutcome};
use tracing_subscriber::EnvFilter;

use crate::render::TerminalSurface;

#[derive(Debug, Parser)]
#[command(name = "foodmap")]
#[command(about = "Search San Francisco food providers by name, street or location")]
struct Cli {
    /// Print the final map snapshot as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Override the data source base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search providers by applicant name
    Name {
        query: String,
        /// Permit status to filter on (APPROVED, REQUESTED, SUSPEND, EXPIRED);
        /// repeat for several
        #[arg(long = "status", value_parser = parse_status)]
        statuses: Vec<PermitStatus>,
    },
    /// Search providers by street
    Street { query: String },
    /// Find the providers closest to a point, as if a pin were dropped there
    Closest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Number of providers to return (1-20); defaults to the configured pin limit
        #[arg(long)]
        limit: Option<u32>,
        /// Permit status to filter on; APPROVED when omitted
        #[arg(long = "status", value_parser = parse_status)]
        statuses: Vec<PermitStatus>,
    },
    /// List providers by permit status alone
    Status {
        #[arg(long = "status", value_parser = parse_status)]
        statuses: Vec<PermitStatus>,
    },
}

fn parse_status(raw: &str) -> Result<PermitStatus, String> {
    PermitStatus::parse(raw).ok_or_else(|| "status must not be blank".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut config = foodmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("foodmap: pass a subcommand (name, street, closest, status); see --help");
        return Ok(());
    };
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }

    let client = FoodProviderClient::from_config(&config)?;
    let controller = SearchController::new(client, ControllerOptions::from_config(&config));
    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "foodmap starting");

    let snapshots = controller.subscribe();
    let renderer = tokio::spawn(async move {
        let mut surface = TerminalSurface::new(std::io::stderr());
        drive_surface(snapshots, &mut surface).await;
        surface.into_last()
    });

    let outcome = search::run_command(&controller, command).await?;
    drop(controller);
    let last = renderer.await?;

    match outcome {
        SearchOutcome::Completed { .. } => {
            let snapshot =
                last.ok_or_else(|| anyhow::anyhow!("no map snapshot was published"))?;
            let mut stdout = std::io::stdout().lock();
            if cli.json {
                render::write_json(&mut stdout, &snapshot)?;
            } else {
                render::write_table(&mut stdout, &snapshot)?;
            }
            Ok(())
        }
        SearchOutcome::Failed { message } => Err(anyhow::anyhow!(message)),
        SearchOutcome::Skipped => Err(anyhow::anyhow!("query is blank; nothing to search")),
        SearchOutcome::Ignored | SearchOutcome::Superseded => {
            Err(anyhow::anyhow!("search did not complete"))
        }
    }
}

#[cfg(test)]
mod tests;
