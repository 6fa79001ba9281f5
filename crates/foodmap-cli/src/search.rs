//! Maps a parsed subcommand onto controller actions.

use foodmap_core::{Coordinate, PermitStatus, SearchMode};
use foodmap_gateway::QueryGateway;
use foodmap_search::{SearchController, SearchOutcome};

use crate::Commands;

/// Drives one search through the controller exactly as the map UI would:
/// pick the mode, adjust filters, then trigger the query.
///
/// # Errors
///
/// Returns an error when `closest` is given an out-of-range coordinate.
pub(crate) async fn run_command<G>(
    controller: &SearchController<G>,
    command: Commands,
) -> anyhow::Result<SearchOutcome>
where
    G: QueryGateway + 'static,
{
    let outcome = match command {
        Commands::Name { query, statuses } => {
            warn_unrecognized(&statuses);
            controller.set_mode(SearchMode::Name);
            controller.set_statuses(statuses);
            controller.set_name_query(query);
            controller.run_name_search().await
        }
        Commands::Street { query } => {
            controller.set_mode(SearchMode::Street);
            controller.set_street_query(query);
            controller.run_street_search().await
        }
        Commands::Closest {
            lat,
            lng,
            limit,
            statuses,
        } => {
            let origin = Coordinate::new(lat, lng)?;
            warn_unrecognized(&statuses);
            controller.set_mode(SearchMode::Pin);
            if let Some(limit) = limit {
                let applied = controller.set_pin_limit(limit);
                if applied != limit {
                    tracing::warn!(requested = limit, applied, "pin limit clamped");
                }
            }
            if !statuses.is_empty() {
                controller.set_statuses(statuses);
            }
            controller.click_handler().call(origin).await
        }
        Commands::Status { statuses } => {
            warn_unrecognized(&statuses);
            controller.set_statuses(statuses);
            controller.run_status_search().await
        }
    };
    Ok(outcome)
}

/// Logs each status outside [`PermitStatus::KNOWN`]; they are still sent.
/// Returns how many were logged.
fn warn_unrecognized(statuses: &[PermitStatus]) -> usize {
    let mut count = 0;
    for status in statuses
        .iter()
        .filter(|s| !PermitStatus::KNOWN.contains(s))
    {
        tracing::warn!(%status, "status is not one the data source is known to report");
        count += 1;
    }
    count
}
