//! Notifications emitted to the presentation layer
//!
//! Sessions queue these as state changes; the host drains them once per frame.

use serde::Serialize;

use super::board::{BoxMaterial, Cell};
use super::entity::{EntityId, EntityTag};

/// Terminal payload of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionResult {
    /// Scavenger: final score
    Score { score: i64 },
    /// Battle: label of the surviving primary ("None" if the match was abandoned)
    Winner { winner: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Launched,
    Paused,
    Resumed,
    Done(SessionResult),
    EntitySpawned {
        id: EntityId,
        tag: EntityTag,
        cell: Cell,
    },
    EntityDespawned {
        id: EntityId,
        tag: EntityTag,
    },
    /// A box tile changed; `None` means the tile is now empty
    BoxChanged {
        cell: Cell,
        material: Option<BoxMaterial>,
    },
    ScoreChanged {
        score: i64,
    },
    LifeChanged {
        id: EntityId,
        life: i32,
    },
    WaveSpawned {
        wave: u32,
        boxes: usize,
    },
}
