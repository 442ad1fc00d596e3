//! WebAssembly bindings for the board core.
//!
//! This module exposes the layout, the board state and drag handling to JavaScript
//! through wasm-bindgen. Values cross the boundary as JSON strings.

use std::collections::HashMap;

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::board::{BoardState, Subscription};
use crate::card::Card;
use crate::drag::{DragSession, DropOutcome, DropZone, OccupancyPolicy};
use crate::hex::{CellKey, HexCoord};
use crate::layout::{GridGeometry, HexLayout, LayoutConfig, Point};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json<T: serde::Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// Board configuration accepted by the constructor; every field is optional
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardConfig {
    layout: LayoutConfig,
    occupancy: OccupancyPolicy,
}

/// WASM-exposed board: one grid, one hand, at most one drag at a time
#[wasm_bindgen]
pub struct WasmBoard {
    state: BoardState,
    layout: HexLayout,
    grid: GridGeometry,
    zone: DropZone,
    drag: Option<DragSession>,
    subscriptions: HashMap<u32, Subscription>,
    next_subscription: u32,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Create a board.
    ///
    /// `hand_json` is an array of cards, `cells_json` an array of `{q, r}`, and
    /// `config_json` an object with optional `layout` and `occupancy` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(hand_json: &str, cells_json: &str, config_json: &str) -> Result<WasmBoard, JsValue> {
        let hand: Vec<Card> =
            serde_json::from_str(hand_json).map_err(|e| js_error("Invalid hand", e))?;
        let cells: Vec<HexCoord> =
            serde_json::from_str(cells_json).map_err(|e| js_error("Invalid cells", e))?;
        let config: BoardConfig = if config_json.trim().is_empty() {
            BoardConfig::default()
        } else {
            serde_json::from_str(config_json).map_err(|e| js_error("Invalid config", e))?
        };
        config
            .layout
            .validate()
            .map_err(|e| js_error("Invalid layout", e))?;

        let state = BoardState::new(hand).map_err(|e| js_error("Invalid hand", e))?;
        let layout = HexLayout::new(config.layout);
        let grid = layout.generate(&cells);
        let zone = DropZone::from_geometry(layout, &grid, config.occupancy);

        Ok(WasmBoard {
            state,
            layout,
            grid,
            zone,
            drag: None,
            subscriptions: HashMap::new(),
            next_subscription: 0,
        })
    }

    /// Grid geometry (cells with corners and centers, plus the viewport) as JSON
    #[wasm_bindgen(js_name = getLayout)]
    pub fn get_layout(&self) -> String {
        to_json(&self.grid, "{}")
    }

    /// Hand and board as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        to_json(&self.state.snapshot(), "{}")
    }

    #[wasm_bindgen(js_name = getHand)]
    pub fn get_hand(&self) -> String {
        to_json(&self.state.hand(), "[]")
    }

    /// The card on a cell as JSON, or `null`
    #[wasm_bindgen(js_name = cardAt)]
    pub fn card_at(&self, key: &str) -> Result<String, JsValue> {
        let key: CellKey = key.parse().map_err(|e| js_error("Invalid cell", e))?;
        Ok(to_json(&self.state.card_at(&key), "null"))
    }

    /// Key of the grid cell under a point, if any
    #[wasm_bindgen(js_name = cellAt)]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<String> {
        self.grid
            .cell_at(&self.layout, Point::new(x, y))
            .map(|cell| cell.key.to_string())
    }

    /// Place a card directly, bypassing drag handling. Returns the outcome JSON.
    #[wasm_bindgen(js_name = playCard)]
    pub fn play_card(&mut self, key: &str, card_json: &str) -> Result<String, JsValue> {
        let key: CellKey = key.parse().map_err(|e| js_error("Invalid cell", e))?;
        let card: Card =
            serde_json::from_str(card_json).map_err(|e| js_error("Invalid card", e))?;
        let outcome = self.state.play_card(key, card);
        Ok(to_json(&outcome, "{}"))
    }

    /// Start dragging a card from the hand; any drag in progress is cancelled
    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&mut self, card_id: &str) -> Result<(), JsValue> {
        if let Some(previous) = self.drag.take() {
            let _ = previous.cancel();
        }
        let session =
            DragSession::begin(&self.state, card_id).map_err(|e| js_error("Cannot drag", e))?;
        self.drag = Some(session);
        Ok(())
    }

    /// Update the hovered cell by key; pass `undefined` when over no cell
    #[wasm_bindgen(js_name = hoverCell)]
    pub fn hover_cell(&mut self, key: Option<String>) -> Result<(), JsValue> {
        let cell = key
            .map(|k| k.parse::<CellKey>())
            .transpose()
            .map_err(|e| js_error("Invalid cell", e))?;
        if let Some(drag) = self.drag.as_mut() {
            drag.hover(&self.zone, cell);
        }
        Ok(())
    }

    /// Update the hovered cell from a pointer position. Returns the hovered key.
    #[wasm_bindgen(js_name = hoverAt)]
    pub fn hover_at(&mut self, x: f64, y: f64) -> Option<String> {
        let drag = self.drag.as_mut()?;
        drag.hover_at(&self.zone, Point::new(x, y));
        drag.over().map(|cell| cell.to_string())
    }

    /// Finish the drag and return the drop outcome JSON
    #[wasm_bindgen(js_name = releaseDrag)]
    pub fn release_drag(&mut self) -> String {
        let outcome = match self.drag.take() {
            Some(drag) => drag.release(&self.zone, &mut self.state),
            None => DropOutcome::Missed,
        };
        to_json(&outcome, "{}")
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) -> String {
        let outcome = match self.drag.take() {
            Some(drag) => drag.cancel(),
            None => DropOutcome::Cancelled,
        };
        to_json(&outcome, "{}")
    }

    /// Call `callback(eventJson, stateJson)` after every change. Returns an id for `unsubscribe`.
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let subscription = self.state.subscribe(move |event, state| {
            let event = JsValue::from_str(&to_json(event, "{}"));
            let snapshot = JsValue::from_str(&to_json(&state.snapshot(), "{}"));
            if let Err(err) = callback.call2(&JsValue::NULL, &event, &snapshot) {
                warn!(error = ?err, "Board observer threw");
            }
        });

        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscriptions.insert(id, subscription);
        id
    }

    pub fn unsubscribe(&mut self, id: u32) -> bool {
        self.subscriptions.remove(&id).is_some()
    }
}
