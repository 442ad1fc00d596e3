//! Hexboard layout generator.
//!
//! Reads a grid (a JSON array of `{"q", "r"}` objects on stdin, or a radius from
//! `HEXBOARD_RADIUS`) and prints its geometry as JSON on stdout.

use anyhow::Context;
use hexboard_core::{GridGeometry, HexCoord, HexLayout};
use std::collections::HashSet;
use std::io::Read;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::Settings;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout carries the JSON, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_env()?;

    let cells = match settings.radius {
        Some(radius) => HexCoord::default().spiral(radius),
        None => read_cells(std::io::stdin().lock())?,
    };

    let duplicates = duplicate_cells(&cells);
    if !duplicates.is_empty() {
        warn!(?duplicates, "Grid lists some cells more than once");
    }

    info!(
        cells = cells.len(),
        orientation = ?settings.layout.orientation,
        size = settings.layout.size,
        "Generating layout"
    );

    let grid = HexLayout::new(settings.layout).generate(&cells);
    println!("{}", render(&grid, settings.pretty)?);
    Ok(())
}

fn read_cells(reader: impl Read) -> anyhow::Result<Vec<HexCoord>> {
    serde_json::from_reader(reader)
        .context("Expected a JSON array of {\"q\": int, \"r\": int} cells")
}

/// Coordinates that appear more than once, in first-repeat order
fn duplicate_cells(cells: &[HexCoord]) -> Vec<HexCoord> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    cells
        .iter()
        .filter(|&&c| !seen.insert(c) && reported.insert(c))
        .copied()
        .collect()
}

fn render(grid: &GridGeometry, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(grid)
    } else {
        serde_json::to_string(grid)
    };
    json.context("Failed to serialize layout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexboard_core::{LayoutConfig, Orientation};

    #[test]
    fn test_read_cells() {
        let input = br#"[{"q":0,"r":0},{"q":1,"r":-1}]"#;
        let cells = read_cells(&input[..]).unwrap();
        assert_eq!(cells, vec![HexCoord::new(0, 0), HexCoord::new(1, -1)]);
    }

    #[test]
    fn test_read_cells_rejects_fractional_coordinates() {
        assert!(read_cells(&br#"[{"q":0.5,"r":0}]"#[..]).is_err());
        assert!(read_cells(&b"not json"[..]).is_err());
    }

    #[test]
    fn test_duplicate_cells() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(1, 0);
        assert!(duplicate_cells(&[a, b]).is_empty());
        assert_eq!(duplicate_cells(&[a, b, a, a, b]), vec![a, b]);
    }

    #[test]
    fn test_render_round_trips() {
        let layout = HexLayout::new(LayoutConfig::new(5.0, Orientation::FlatTop));
        let grid = layout.generate(&HexCoord::default().spiral(1));

        for pretty in [false, true] {
            let text = render(&grid, pretty).unwrap();
            let back: GridGeometry = serde_json::from_str(&text).unwrap();
            assert_eq!(back.cells.len(), 7);
            assert!((back.viewport.width - grid.viewport.width).abs() < 1e-9);
        }
    }
}
