//! Board state: the hand, the cards placed on hex cells, and change notification.
//!
//! `BoardState` is owned by the host and handed to consumers explicitly. The only
//! mutation is [`BoardState::play_card`]; observers registered with
//! [`BoardState::subscribe`] run synchronously once both the hand and the board
//! reflect the play.

use crate::card::Card;
use crate::hex::CellKey;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from building a board state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Card id {0:?} appears more than once")]
    DuplicateCard(String),
}

/// Where a card currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardLocation {
    /// Still in the hand, at this index
    InHand(usize),
    /// Placed on this board cell
    OnBoard(CellKey),
}

/// Notification sent to observers after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardEvent {
    CardPlayed {
        cell: CellKey,
        card: Card,
        /// A different card that occupied `cell` and was overwritten
        displaced: Option<Card>,
        /// Another cell the same card was moved away from
        vacated: Option<CellKey>,
    },
}

/// What a call to [`BoardState::play_card`] changed besides the placement itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub displaced: Option<Card>,
    pub vacated: Option<CellKey>,
}

/// Owned copy of the state, with the board ordered by cell for stable JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub hand: Vec<Card>,
    pub board: BTreeMap<CellKey, Card>,
}

/// Observer callback
pub type Subscriber = Rc<dyn Fn(&BoardEvent, &BoardState)>;

type SubscriberList = RefCell<Vec<(u64, Subscriber)>>;

/// Handle returned by [`BoardState::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// The hand and the board
pub struct BoardState {
    /// Cards available to play, in display order
    hand: Vec<Card>,
    /// Occupied cells; a missing key is an empty cell
    board: HashMap<CellKey, Card>,
    subscribers: Rc<SubscriberList>,
    next_subscriber_id: Cell<u64>,
}

impl BoardState {
    /// Start with the given hand and an empty board.
    ///
    /// Card ids must be unique.
    pub fn new(hand: Vec<Card>) -> Result<Self, BoardError> {
        let mut seen = HashSet::new();
        for card in &hand {
            if !seen.insert(card.id.as_str()) {
                return Err(BoardError::DuplicateCard(card.id.clone()));
            }
        }

        Ok(Self {
            hand,
            board: HashMap::new(),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscriber_id: Cell::new(0),
        })
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// The card on `cell`, if any
    pub fn card_at(&self, cell: &CellKey) -> Option<&Card> {
        self.board.get(cell)
    }

    pub fn is_occupied(&self, cell: &CellKey) -> bool {
        self.board.contains_key(cell)
    }

    /// Every occupied cell and its card, in no particular order
    pub fn placed(&self) -> impl Iterator<Item = (&CellKey, &Card)> {
        self.board.iter()
    }

    pub fn hand_card(&self, card_id: &str) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == card_id)
    }

    pub fn location_of(&self, card_id: &str) -> Option<CardLocation> {
        if let Some(index) = self.hand.iter().position(|c| c.id == card_id) {
            return Some(CardLocation::InHand(index));
        }
        self.board
            .iter()
            .find(|(_, card)| card.id == card_id)
            .map(|(cell, _)| CardLocation::OnBoard(*cell))
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            hand: self.hand.clone(),
            board: self.board.iter().map(|(k, c)| (*k, c.clone())).collect(),
        }
    }

    /// Move `card` onto `cell`.
    ///
    /// Every hand entry with the card's id is removed and `cell` now holds the card.
    /// The cell is not checked against any layout and occupancy is not checked:
    /// a different card already on `cell` is overwritten and comes back as
    /// `displaced`, in neither the hand nor the board. If the same card was on
    /// another cell it is moved, and that cell comes back as `vacated`.
    ///
    /// Observers are notified once, after the whole change is applied.
    pub fn play_card(&mut self, cell: CellKey, card: Card) -> PlayOutcome {
        self.hand.retain(|c| c.id != card.id);

        let mut vacated = None;
        self.board.retain(|key, placed| {
            let stale = *key != cell && placed.id == card.id;
            if stale {
                vacated = Some(*key);
            }
            !stale
        });

        let displaced = self
            .board
            .insert(cell, card.clone())
            .filter(|previous| previous.id != card.id);

        if let Some(lost) = &displaced {
            warn!(cell = %cell, card = %card.id, lost = %lost.id, "Overwrote occupied cell");
        }
        debug!(
            cell = %cell,
            card = %card.id,
            vacated = ?vacated.map(|k| k.to_string()),
            hand_size = self.hand.len(),
            "Card played"
        );

        let event = BoardEvent::CardPlayed {
            cell,
            card,
            displaced: displaced.clone(),
            vacated,
        };
        self.notify(&event);

        PlayOutcome { displaced, vacated }
    }

    /// Register an observer. It stays registered until the returned handle is dropped.
    pub fn subscribe(&self, observer: impl Fn(&BoardEvent, &BoardState) + 'static) -> Subscription {
        let id = self.next_subscriber_id.get();
        self.next_subscriber_id.set(id + 1);
        let subscriber: Subscriber = Rc::new(observer);
        self.subscribers.borrow_mut().push((id, subscriber));

        Subscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self, event: &BoardEvent) {
        // Cloned so callbacks may subscribe or drop handles while we iterate
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| Rc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(event, self);
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            hand: Vec::new(),
            board: HashMap::new(),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscriber_id: Cell::new(0),
        }
    }
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardState")
            .field("hand", &self.hand)
            .field("board", &self.board)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
