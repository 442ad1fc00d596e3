//! Hexboard - hex board layout and card placement core
//!
//! This crate provides the logic behind a card-game board, including:
//! - Axial hex coordinates and `"q,r"` cell keys
//! - Hex grid geometry (corners, centers, viewport, hit testing)
//! - Board state: the hand, placed cards and change observers
//! - Drop handling between a drag layer and the board
//!
//! # Architecture
//!
//! Rendering and pointer handling live outside this crate. It can be compiled to:
//! - Native Rust, e.g. the `hexboard-layout` tool
//! - WebAssembly (`wasm` feature) for a browser front end
//!
//! # Modules
//!
//! - [`hex`]: Coordinates, cell keys and grid generation
//! - [`layout`]: Polygon geometry for a set of coordinates
//! - [`card`]: Card data
//! - [`board`]: Hand/board state container
//! - [`drag`]: Drag sessions and drop targets

pub mod board;
pub mod card;
pub mod drag;
pub mod hex;
pub mod layout;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{
    BoardError, BoardEvent, BoardSnapshot, BoardState, CardLocation, PlayOutcome, Subscription,
};
pub use card::{starter_hand, Card, Rarity};
pub use drag::{DragError, DragSession, DropOutcome, DropZone, OccupancyPolicy};
pub use hex::{CellKey, CoordError, HexCoord, Orientation};
pub use layout::{
    generate, GridGeometry, HexCell, HexLayout, LayoutConfig, LayoutError, Point, Rect,
    DEFAULT_HEX_SIZE, DEFAULT_VIEWPORT_PADDING,
};
