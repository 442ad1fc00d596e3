//! Hex grid geometry.
//!
//! Turns axial coordinates into drawable polygons: six corners and a center per
//! hexagon, plus a padded viewport that encloses the whole grid. Everything here is
//! pure. The same config and cells always produce bit-identical geometry.

use crate::hex::{CellKey, HexCoord, Orientation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Margin added around the grid's bounding box, in layout units
pub const DEFAULT_VIEWPORT_PADDING: f64 = 2.0;

/// Hex radius used when no size is configured
pub const DEFAULT_HEX_SIZE: f64 = 10.0;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Errors from validating a layout configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Hex size must be a positive finite number, got {0}")]
    InvalidSize(f64),

    #[error("Viewport padding must be a non-negative finite number, got {0}")]
    InvalidPadding(f64),

    #[error("Spacing must be a finite number of at least 1.0, got {0}")]
    InvalidSpacing(f64),
}

/// A point in layout space (y grows downward, as in SVG)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle, laid out like an SVG `viewBox`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Fallback viewport for a grid with no cells
    pub const UNIT: Rect = Rect {
        min_x: 0.0,
        min_y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x()
            && point.y >= self.min_y
            && point.y <= self.max_y()
    }

    /// The `viewBox` attribute string
    pub fn to_view_box(&self) -> String {
        format!("{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// Drawable geometry of one hexagon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexCell {
    pub coord: HexCoord,
    pub key: CellKey,
    /// Corner `i` sits at `60° * i` (plus 30° for pointy-top) from the center
    pub corners: [Point; 6],
    /// Arithmetic mean of the corners
    pub center: Point,
}

impl HexCell {
    /// SVG `points` attribute for the polygon
    pub fn svg_points(&self) -> String {
        self.corners
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of [`HexLayout::generate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// One entry per input coordinate, in input order
    pub cells: Vec<HexCell>,
    pub viewport: Rect,
}

impl GridGeometry {
    /// The grid cell containing `point`, if the point falls on this grid
    pub fn cell_at(&self, layout: &HexLayout, point: Point) -> Option<&HexCell> {
        let coord = layout.hex_at(point)?;
        self.cells.iter().find(|cell| cell.coord == coord)
    }

    pub fn cell(&self, key: &CellKey) -> Option<&HexCell> {
        self.cells.iter().find(|cell| cell.key == *key)
    }

    pub fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells.iter().map(|cell| cell.key)
    }
}

/// Layout parameters, fixed per grid instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Hexagon radius (center to corner)
    pub size: f64,
    pub orientation: Orientation,
    /// Margin around the bounding box of all corners
    pub padding: f64,
    /// Where hex (0, 0) is centered
    pub origin: Point,
    /// Multiplier on center distances; above 1.0 it leaves gutters between hexes
    pub spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_HEX_SIZE,
            orientation: Orientation::PointyTop,
            padding: DEFAULT_VIEWPORT_PADDING,
            origin: Point::default(),
            spacing: 1.0,
        }
    }
}

impl LayoutConfig {
    pub fn new(size: f64, orientation: Orientation) -> Self {
        Self {
            size,
            orientation,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(LayoutError::InvalidSize(self.size));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(LayoutError::InvalidPadding(self.padding));
        }
        if !(self.spacing.is_finite() && self.spacing >= 1.0) {
            return Err(LayoutError::InvalidSpacing(self.spacing));
        }
        Ok(())
    }
}

/// Converts axial coordinates to polygons under one fixed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HexLayout {
    config: LayoutConfig,
}

impl HexLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Center of a hex, before corners are placed
    pub fn to_pixel(&self, coord: HexCoord) -> Point {
        let LayoutConfig {
            size,
            orientation,
            origin,
            spacing,
            ..
        } = self.config;
        let (q, r) = (coord.q as f64, coord.r as f64);

        let (x, y) = match orientation {
            Orientation::PointyTop => (
                size * (SQRT_3 * q + SQRT_3 / 2.0 * r),
                size * (3.0 / 2.0 * r),
            ),
            Orientation::FlatTop => (
                size * (3.0 / 2.0 * q),
                size * (SQRT_3 / 2.0 * q + SQRT_3 * r),
            ),
        };

        Point::new(origin.x + x * spacing, origin.y + y * spacing)
    }

    /// The hex whose area contains `point` (inverse of [`HexLayout::to_pixel`]).
    ///
    /// `None` for a non-finite point or one beyond the `i32` coordinate range.
    pub fn hex_at(&self, point: Point) -> Option<HexCoord> {
        let LayoutConfig {
            size,
            orientation,
            origin,
            spacing,
            ..
        } = self.config;
        let x = (point.x - origin.x) / spacing;
        let y = (point.y - origin.y) / spacing;

        let (q, r) = match orientation {
            Orientation::PointyTop => (
                (SQRT_3 / 3.0 * x - 1.0 / 3.0 * y) / size,
                (2.0 / 3.0 * y) / size,
            ),
            Orientation::FlatTop => (
                (2.0 / 3.0 * x) / size,
                (-1.0 / 3.0 * x + SQRT_3 / 3.0 * y) / size,
            ),
        };

        // Rounding saturates NaN and out-of-range values onto real cells
        let axial_range = (i32::MIN as f64 + 1.0)..(i32::MAX as f64 - 1.0);
        if !(axial_range.contains(&q) && axial_range.contains(&r)) {
            return None;
        }
        Some(HexCoord::from_fractional(q, r))
    }

    /// Six corners and the center of one hexagon
    pub fn cell(&self, coord: HexCoord) -> HexCell {
        let anchor = self.to_pixel(coord);
        let start_deg = match self.config.orientation {
            Orientation::FlatTop => 0.0,
            Orientation::PointyTop => 30.0,
        };

        let corners: [Point; 6] = std::array::from_fn(|i| {
            let angle = (start_deg + 60.0 * i as f64).to_radians();
            Point::new(
                anchor.x + self.config.size * angle.cos(),
                anchor.y + self.config.size * angle.sin(),
            )
        });

        let (sum_x, sum_y) = corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

        HexCell {
            coord,
            key: CellKey::from(coord),
            corners,
            center: Point::new(sum_x / 6.0, sum_y / 6.0),
        }
    }

    /// Geometry for every coordinate plus the enclosing viewport.
    ///
    /// Coordinates should be distinct; duplicates simply produce duplicate cells.
    pub fn generate(&self, cells: &[HexCoord]) -> GridGeometry {
        let cells: Vec<HexCell> = cells.iter().map(|&coord| self.cell(coord)).collect();
        let viewport = self.viewport(&cells);
        GridGeometry { cells, viewport }
    }

    fn viewport(&self, cells: &[HexCell]) -> Rect {
        let mut corners = cells.iter().flat_map(|cell| cell.corners.iter());
        let Some(first) = corners.next() else {
            return Rect::UNIT;
        };

        let (min_x, min_y, max_x, max_y) = corners.fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        );

        let pad = self.config.padding;
        Rect {
            min_x: min_x - pad,
            min_y: min_y - pad,
            width: max_x - min_x + 2.0 * pad,
            height: max_y - min_y + 2.0 * pad,
        }
    }
}

/// Generate geometry with the default padding and origin
pub fn generate(cells: &[HexCoord], size: f64, orientation: Orientation) -> GridGeometry {
    HexLayout::new(LayoutConfig::new(size, orientation)).generate(cells)
}
