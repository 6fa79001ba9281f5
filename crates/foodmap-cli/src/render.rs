//! Terminal rendering of map snapshots.

use std::io::Write;

use foodmap_search::{MapSnapshot, MapSurface};

/// A [`MapSurface`] for a terminal. Progress goes to the wrapped writer as
/// it happens; the settled snapshot is kept for the final report.
pub(crate) struct TerminalSurface<W> {
    progress: W,
    was_loading: bool,
    last: Option<MapSnapshot>,
}

impl<W: Write> TerminalSurface<W> {
    pub(crate) fn new(progress: W) -> Self {
        Self {
            progress,
            was_loading: false,
            last: None,
        }
    }

    /// The last snapshot rendered while no request was in flight.
    pub(crate) fn into_last(self) -> Option<MapSnapshot> {
        self.last
    }
}

impl<W: Write> MapSurface for TerminalSurface<W> {
    fn render(&mut self, snapshot: &MapSnapshot) {
        if snapshot.loading {
            if !self.was_loading {
                let line = match snapshot.drop_pin {
                    Some(pin) => format!("pin dropped at {pin}, searching..."),
                    None => "searching...".to_string(),
                };
                // A closed progress stream is not worth failing the search over.
                let _ = writeln!(self.progress, "{line}");
            }
            self.was_loading = true;
            return;
        }
        self.was_loading = false;
        self.last = Some(snapshot.clone());
    }
}

/// Writes the snapshot as pretty-printed JSON.
pub(crate) fn write_json<W: Write>(out: &mut W, snapshot: &MapSnapshot) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, snapshot)?;
    writeln!(out)?;
    Ok(())
}

/// Writes results as a table. Highlighted rows are starred; distances are
/// shown when a pin was dropped.
pub(crate) fn write_table<W: Write>(out: &mut W, snapshot: &MapSnapshot) -> anyhow::Result<()> {
    if let Some(error) = &snapshot.error {
        writeln!(out, "error: {error}")?;
    }
    if snapshot.results.is_empty() {
        writeln!(out, "no providers found")?;
        return Ok(());
    }

    writeln!(
        out,
        "  {:<36}{:<11}{:>9}  ADDRESS",
        "NAME", "STATUS", "KM"
    )?;
    for record in &snapshot.results {
        let star = if snapshot.highlighted.contains(&record.id) {
            '*'
        } else {
            ' '
        };
        let status = record
            .permit_status
            .as_ref()
            .map_or("\u{2014}", |s| s.as_str());
        let distance = snapshot
            .markers
            .iter()
            .find(|m| m.id == record.id)
            .and_then(|m| m.distance_km)
            .map_or_else(|| "\u{2014}".to_string(), |km| format!("{km:.2}"));
        let address = record.address.as_deref().unwrap_or("\u{2014}");
        writeln!(
            out,
            "{star} {:<36}{:<11}{:>9}  {address}",
            truncate(&record.name, 34),
            status,
            distance
        )?;
    }

    writeln!(
        out,
        "{} result(s), {} on map, centered at {} zoom {}",
        snapshot.results.len(),
        snapshot.markers.len(),
        snapshot.center,
        snapshot.zoom
    )?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
