//! Drop handling between the drag layer and the board.
//!
//! A [`DragSession`] starts on a card in the hand and ends exactly once, either by
//! [`DragSession::release`] or [`DragSession::cancel`]. Both consume the session,
//! so a drag can reach [`BoardState::play_card`] at most once. Releasing outside a
//! recognized cell, or cancelling, leaves the board untouched.

use crate::board::BoardState;
use crate::card::Card;
use crate::hex::{CellKey, HexCoord};
use crate::layout::{GridGeometry, HexLayout, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, trace};

/// What a drop does when the target cell already holds a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OccupancyPolicy {
    /// Leave the board as is; the card stays in hand
    #[default]
    Reject,
    /// Replace the occupant, which is lost
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DragError {
    #[error("Card {0:?} is not in the hand")]
    CardNotInHand(String),
}

/// How a drag ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum DropOutcome {
    /// The card was placed
    Played {
        cell: CellKey,
        card_id: String,
        displaced: Option<Card>,
    },
    /// The target was occupied and the policy is `Reject`
    Rejected { cell: CellKey, occupant: Card },
    /// Released away from every recognized cell
    Missed,
    /// The card left the hand while it was being dragged
    Stale { card_id: String },
    Cancelled,
}

impl DropOutcome {
    pub fn is_played(&self) -> bool {
        matches!(self, DropOutcome::Played { .. })
    }
}

/// The set of cells that accept drops, plus the layout used to hit-test pointers.
#[derive(Debug, Clone)]
pub struct DropZone {
    layout: HexLayout,
    cells: HashSet<CellKey>,
    policy: OccupancyPolicy,
}

impl DropZone {
    pub fn new(layout: HexLayout, cells: &[HexCoord], policy: OccupancyPolicy) -> Self {
        Self {
            layout,
            cells: cells.iter().map(|&c| CellKey::from(c)).collect(),
            policy,
        }
    }

    pub fn from_geometry(layout: HexLayout, grid: &GridGeometry, policy: OccupancyPolicy) -> Self {
        Self {
            layout,
            cells: grid.keys().collect(),
            policy,
        }
    }

    pub fn accepts(&self, cell: &CellKey) -> bool {
        self.cells.contains(cell)
    }

    /// The recognized cell under `point`, if any
    pub fn cell_at(&self, point: Point) -> Option<CellKey> {
        let key = CellKey::from(self.layout.hex_at(point)?);
        self.accepts(&key).then_some(key)
    }

    pub fn policy(&self) -> OccupancyPolicy {
        self.policy
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }
}

/// A card being dragged out of the hand
#[derive(Debug, Clone)]
#[must_use = "a drag must end with release() or cancel()"]
pub struct DragSession {
    card: Card,
    over: Option<CellKey>,
}

impl DragSession {
    /// Pick up a card. Only cards still in the hand can be dragged.
    pub fn begin(board: &BoardState, card_id: &str) -> Result<Self, DragError> {
        let card = board
            .hand_card(card_id)
            .cloned()
            .ok_or_else(|| DragError::CardNotInHand(card_id.to_string()))?;

        debug!(card = %card.id, "Drag started");
        Ok(Self { card, over: None })
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    /// The recognized cell currently under the card
    pub fn over(&self) -> Option<CellKey> {
        self.over
    }

    /// Track the cell under the pointer; anything the zone does not accept clears it.
    pub fn hover(&mut self, zone: &DropZone, cell: Option<CellKey>) {
        let over = cell.filter(|c| zone.accepts(c));
        if over != self.over {
            trace!(card = %self.card.id, over = ?over.map(|c| c.to_string()), "Hover changed");
        }
        self.over = over;
    }

    pub fn hover_at(&mut self, zone: &DropZone, point: Point) {
        self.hover(zone, zone.cell_at(point));
    }

    /// Drop the card where it is hovering.
    ///
    /// The card must still be in the hand; a card played elsewhere mid-drag is `Stale`.
    pub fn release(self, zone: &DropZone, board: &mut BoardState) -> DropOutcome {
        if board.hand_card(&self.card.id).is_none() {
            info!(card = %self.card.id, "Card left the hand during the drag");
            return DropOutcome::Stale {
                card_id: self.card.id,
            };
        }

        let Some(cell) = self.over.filter(|c| zone.accepts(c)) else {
            debug!(card = %self.card.id, "Dropped outside the board");
            return DropOutcome::Missed;
        };

        if zone.policy() == OccupancyPolicy::Reject {
            if let Some(occupant) = board.card_at(&cell) {
                info!(
                    cell = %cell,
                    card = %self.card.id,
                    occupant = %occupant.id,
                    "Cell occupied, drop rejected"
                );
                return DropOutcome::Rejected {
                    cell,
                    occupant: occupant.clone(),
                };
            }
        }

        let card_id = self.card.id.clone();
        let outcome = board.play_card(cell, self.card);
        DropOutcome::Played {
            cell,
            card_id,
            displaced: outcome.displaced,
        }
    }

    pub fn cancel(self) -> DropOutcome {
        debug!(card = %self.card.id, "Drag cancelled");
        DropOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::starter_hand;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn zone(policy: OccupancyPolicy) -> DropZone {
        DropZone::new(HexLayout::default(), &HexCoord::default().spiral(1), policy)
    }

    /// Board with the starter hand and a counter of play_card notifications
    fn counted_board() -> (BoardState, Rc<Cell<u32>>, crate::board::Subscription) {
        let board = BoardState::new(starter_hand()).unwrap();
        let plays = Rc::new(Cell::new(0));
        let counter = Rc::clone(&plays);
        let sub = board.subscribe(move |_, _| counter.set(counter.get() + 1));
        (board, plays, sub)
    }

    #[test]
    fn test_begin_requires_card_in_hand() {
        let board = BoardState::new(starter_hand()).unwrap();
        assert!(DragSession::begin(&board, "fireball").is_ok());
        assert_eq!(
            DragSession::begin(&board, "meteor").unwrap_err(),
            DragError::CardNotInHand("meteor".into())
        );
    }

    #[test]
    fn test_release_over_cell_plays_once() {
        let zone = zone(OccupancyPolicy::Reject);
        let (mut board, plays, _sub) = counted_board();

        let mut drag = DragSession::begin(&board, "fireball").unwrap();
        drag.hover(&zone, Some(CellKey::new(1, 0)));
        drag.hover(&zone, Some(CellKey::new(0, 0)));
        assert_eq!(drag.over(), Some(CellKey::new(0, 0)));

        let outcome = drag.release(&zone, &mut board);
        assert_eq!(
            outcome,
            DropOutcome::Played {
                cell: CellKey::new(0, 0),
                card_id: "fireball".into(),
                displaced: None,
            }
        );
        assert_eq!(plays.get(), 1);
        assert_eq!(
            board.card_at(&CellKey::new(0, 0)).map(|c| c.id.as_str()),
            Some("fireball")
        );
    }

    #[test]
    fn test_release_off_grid_misses() {
        let zone = zone(OccupancyPolicy::Reject);
        let (mut board, plays, _sub) = counted_board();

        let mut drag = DragSession::begin(&board, "fireball").unwrap();
        drag.hover(&zone, Some(CellKey::new(0, 0)));
        // Dragged on past the edge of the grid
        drag.hover(&zone, Some(CellKey::new(5, 5)));
        assert_eq!(drag.over(), None);

        assert_eq!(drag.release(&zone, &mut board), DropOutcome::Missed);
        assert_eq!(plays.get(), 0);
        assert_eq!(board.hand().len(), 2);
    }

    #[test]
    fn test_cancel_leaves_state_untouched() {
        let zone = zone(OccupancyPolicy::Reject);
        let (board, plays, _sub) = counted_board();
        let before = board.snapshot();

        let mut drag = DragSession::begin(&board, "defend").unwrap();
        drag.hover(&zone, Some(CellKey::new(0, 0)));
        assert_eq!(drag.cancel(), DropOutcome::Cancelled);

        assert_eq!(plays.get(), 0);
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_occupied_cell_rejected_by_default() {
        let zone = zone(OccupancyPolicy::default());
        let (mut board, plays, _sub) = counted_board();

        let mut first = DragSession::begin(&board, "fireball").unwrap();
        first.hover(&zone, Some(CellKey::new(0, 0)));
        assert!(first.release(&zone, &mut board).is_played());

        let mut second = DragSession::begin(&board, "defend").unwrap();
        second.hover(&zone, Some(CellKey::new(0, 0)));
        let outcome = second.release(&zone, &mut board);

        assert_eq!(
            outcome,
            DropOutcome::Rejected {
                cell: CellKey::new(0, 0),
                occupant: Card::new("fireball", "Fireball"),
            }
        );
        assert_eq!(plays.get(), 1);
        assert!(board.hand_card("defend").is_some());
    }

    #[test]
    fn test_overwrite_policy_replaces_occupant() {
        let zone = zone(OccupancyPolicy::Overwrite);
        let mut board = BoardState::new(starter_hand()).unwrap();

        let mut first = DragSession::begin(&board, "fireball").unwrap();
        first.hover(&zone, Some(CellKey::new(0, 1)));
        first.release(&zone, &mut board);

        let mut second = DragSession::begin(&board, "defend").unwrap();
        second.hover(&zone, Some(CellKey::new(0, 1)));
        let outcome = second.release(&zone, &mut board);

        assert_eq!(
            outcome,
            DropOutcome::Played {
                cell: CellKey::new(0, 1),
                card_id: "defend".into(),
                displaced: Some(Card::new("fireball", "Fireball")),
            }
        );
        assert!(board.hand().is_empty());
        assert_eq!(board.placed().count(), 1);
    }

    #[test]
    fn test_hover_at_uses_hit_testing() {
        let zone = zone(OccupancyPolicy::Reject);
        let board = BoardState::new(starter_hand()).unwrap();
        let layout = *zone.layout();

        let mut drag = DragSession::begin(&board, "fireball").unwrap();
        drag.hover_at(&zone, layout.to_pixel(HexCoord::new(-1, 1)));
        assert_eq!(drag.over(), Some(CellKey::new(-1, 1)));

        drag.hover_at(&zone, Point::new(1_000.0, 1_000.0));
        assert_eq!(drag.over(), None);
    }

    #[test]
    fn test_non_finite_pointer_is_not_over_a_cell() {
        let zone = zone(OccupancyPolicy::Reject);
        let (mut board, plays, _sub) = counted_board();
        let before = board.snapshot();

        let mut drag = DragSession::begin(&board, "fireball").unwrap();
        drag.hover_at(&zone, Point::new(f64::NAN, f64::NAN));
        assert_eq!(drag.over(), None);

        // A NaN hover after a real one also clears the target
        drag.hover(&zone, Some(CellKey::new(0, 0)));
        drag.hover_at(&zone, Point::new(f64::INFINITY, f64::NEG_INFINITY));
        assert_eq!(drag.over(), None);
        assert_eq!(zone.cell_at(Point::new(0.0, f64::INFINITY)), None);

        assert_eq!(drag.release(&zone, &mut board), DropOutcome::Missed);
        assert_eq!(plays.get(), 0);
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_card_played_mid_drag_is_stale() {
        let zone = zone(OccupancyPolicy::Reject);
        let mut board = BoardState::new(starter_hand()).unwrap();

        let mut drag = DragSession::begin(&board, "fireball").unwrap();
        board.play_card(CellKey::new(0, 0), Card::new("fireball", "Fireball"));
        drag.hover(&zone, Some(CellKey::new(1, 0)));

        assert_eq!(
            drag.release(&zone, &mut board),
            DropOutcome::Stale {
                card_id: "fireball".into()
            }
        );
        assert!(board.is_occupied(&CellKey::new(0, 0)));
        assert!(!board.is_occupied(&CellKey::new(1, 0)));
    }

    #[test]
    fn test_zone_from_geometry() {
        let layout = HexLayout::default();
        let grid = layout.generate(&[HexCoord::new(0, 0), HexCoord::new(1, 0)]);
        let zone = DropZone::from_geometry(layout, &grid, OccupancyPolicy::Reject);

        assert!(zone.accepts(&CellKey::new(1, 0)));
        assert!(!zone.accepts(&CellKey::new(0, 1)));
        assert_eq!(
            zone.cell_at(layout.to_pixel(HexCoord::new(1, 0))),
            Some(CellKey::new(1, 0))
        );
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_value(DropOutcome::Missed).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "Missed"}));
    }
}
