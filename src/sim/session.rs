//! Session surface shared by the game modes
//!
//! A host drives a session by calling [`Session::advance`] once per frame with
//! the elapsed milliseconds, feeding input through the intent setters and
//! draining [`GameEvent`]s for presentation.

use glam::Vec2;
use serde::Serialize;

use super::board::Cell;
use super::entity::EntityId;
use super::events::{GameEvent, SessionResult};
use super::player::{Ability, Cooldowns, Facing};
use super::state::{Arena, SessionPhase};

/// Primary player seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

/// Read-only snapshot of one player for HUDs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatus {
    pub id: EntityId,
    pub label: String,
    pub pos: Vec2,
    pub cell: Cell,
    pub facing: Facing,
    pub walking: bool,
    pub life: i32,
    pub cooldowns: Cooldowns,
    pub speed_boost_ms: u64,
    pub attack_boost_ms: u64,
    pub invulnerable: bool,
}

pub trait Session {
    fn arena(&self) -> &Arena;
    fn arena_mut(&mut self) -> &mut Arena;

    /// Entity seated in `slot`, if that seat exists and its player is alive
    fn slot_entity(&self, slot: PlayerSlot) -> Option<EntityId>;

    /// Build a fresh board, spawn players, start timers, phase `Running`
    fn launch(&mut self);

    /// Run timers that came due, then one simulation tick. No-op unless
    /// the session is running.
    fn advance(&mut self, delta_ms: u64);

    /// Result reported when the player walks away
    fn quit_result(&self) -> SessionResult;

    /// Remaining match clock
    fn time_left_ms(&self) -> u64;

    fn phase(&self) -> SessionPhase {
        self.arena().phase
    }

    /// Freeze timers, ticks and ability input
    fn pause(&mut self) {
        if self.arena_mut().pause() {
            log::info!("Session paused");
        }
    }

    fn resume(&mut self) {
        if self.arena_mut().resume() {
            log::info!("Session resumed");
        }
    }

    /// Finish with `result`. Later calls are ignored.
    fn done(&mut self, result: SessionResult) {
        self.arena_mut().finish(result);
    }

    fn quit(&mut self) {
        let result = self.quit_result();
        self.done(result);
    }

    /// Held movement direction for a primary; `None` releases it
    fn set_movement_intent(&mut self, slot: PlayerSlot, dir: Option<Facing>) {
        if self.phase() == SessionPhase::Done {
            return;
        }
        let Some(id) = self.slot_entity(slot) else {
            return;
        };
        if let Some(player) = self.arena_mut().entities.player_mut(id) {
            player.intent = dir;
        }
    }

    /// Queue an ability for the next tick. Ignored unless running.
    fn trigger_ability(&mut self, slot: PlayerSlot, ability: Ability) {
        if self.phase() != SessionPhase::Running {
            return;
        }
        let Some(id) = self.slot_entity(slot) else {
            return;
        };
        if let Some(player) = self.arena_mut().entities.player_mut(id) {
            player.pending_ability = Some(ability);
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.arena_mut().drain_events()
    }

    fn player_status(&self, slot: PlayerSlot) -> Option<PlayerStatus> {
        let id = self.slot_entity(slot)?;
        let entity = self.arena().entities.get(id)?;
        let player = entity.as_player()?;
        Some(PlayerStatus {
            id,
            label: player.label.clone(),
            pos: entity.pos,
            cell: entity.cell,
            facing: player.facing,
            walking: player.is_walking(),
            life: player.life,
            cooldowns: player.cooldowns,
            speed_boost_ms: player.speed_boost_ms,
            attack_boost_ms: player.attack_boost_ms,
            invulnerable: player.invulnerable,
        })
    }
}
