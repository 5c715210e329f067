//! Per-tick player phases
//!
//! Movement, ability placement, bot steering and meter refill. Every phase
//! walks players in id order so a seeded session replays identically.

use glam::Vec2;
use rand::Rng;

use super::board::{Board, Cell};
use super::entity::BubbleKind;
use super::player::{Ability, Facing};
use super::state::Arena;
use crate::consts::*;

/// Slide from `pos` along `dir` for up to `distance` world units.
///
/// The walk is split into sub-steps no longer than an eighth of a cell so a
/// fast player cannot tunnel through a thin obstacle. A sub-step is refused
/// once the leading edge would enter a cell that is off the board, blocked by
/// terrain or holding a box. The cell the player already occupies never
/// blocks, so a box landing underneath does not trap anyone.
pub fn walk(board: &Board, pos: Vec2, dir: Facing, distance: f32) -> Vec2 {
    let unit = dir.unit();
    let step_len = MOVE_SUBSTEP_CELLS * board.cell_size();
    let mut pos = pos;
    let mut remaining = distance;
    while remaining > 0.0 {
        let step = remaining.min(step_len);
        let next = pos + unit * step;
        let Ok(here) = board.point_to_cell(pos) else {
            break;
        };
        let ahead = match board.point_to_cell(next + unit * PLAYER_HALF_EXTENT) {
            Ok(cell) => cell,
            Err(_) => break,
        };
        if ahead != here && !board.is_passable(ahead) {
            break;
        }
        pos = next;
        remaining -= step;
    }
    pos
}

impl Arena {
    /// Step 1: apply held intents and move walking players
    pub fn move_players(&mut self, dt_ms: u64) {
        let dt = dt_ms as f32 / 1000.0;
        let board = &self.board;
        for entity in self.entities.iter_mut() {
            let pos = entity.pos;
            let Some(player) = entity.as_player_mut() else {
                continue;
            };
            player.apply_intent();
            if !player.is_walking() {
                continue;
            }
            let moved = walk(board, pos, player.facing, player.speed() * dt);
            entity.pos = moved;
            if let Ok(cell) = board.point_to_cell(moved) {
                entity.cell = cell;
            }
        }
    }

    /// Step 2: consume pending ability requests. Abilities outside `kit` are
    /// dropped; a request on a meter that is not full does nothing.
    pub fn process_abilities(&mut self, kit: &[Ability]) {
        let mut placed: Vec<(Cell, BubbleKind, bool)> = Vec::new();
        for entity in self.entities.iter_mut() {
            let cell = entity.cell;
            let Some(player) = entity.as_player_mut() else {
                continue;
            };
            let Some(ability) = player.pending_ability.take() else {
                continue;
            };
            if !kit.contains(&ability) {
                log::debug!("{} cannot use {ability:?} in this mode", player.label);
                continue;
            }
            if let Some((kind, boosted)) = player.try_trigger(ability) {
                placed.push((cell, kind, boosted));
            }
        }
        for (cell, kind, boosted) in placed {
            self.spawn_bubble(cell, kind, boosted);
        }
    }

    /// Step 3: refill meters and run down boosts
    pub fn advance_player_timers(&mut self, dt_ms: u64) {
        for entity in self.entities.iter_mut() {
            if let Some(player) = entity.as_player_mut() {
                player.advance_timers(dt_ms);
            }
        }
    }

    /// Bot brains: occasionally turn to a new random direction and fire the
    /// first full meter, preferring Blue, then Red, then Green.
    pub fn steer_bots(&mut self, turn_chance: f64) {
        let rng = &mut self.rng;
        for entity in self.entities.iter_mut() {
            let Some(player) = entity.as_player_mut() else {
                continue;
            };
            if !player.bot {
                continue;
            }
            if player.intent.is_none() || rng.random_bool(turn_chance) {
                let current = player.facing;
                let options: Vec<Facing> =
                    Facing::ALL.into_iter().filter(|f| *f != current).collect();
                player.intent = Some(options[rng.random_range(0..options.len())]);
            }
            player.pending_ability = [Ability::Blue, Ability::Red, Ability::Green]
                .into_iter()
                .find(|a| player.cooldowns.is_ready(*a));
        }
    }

    /// Number of live players that are bots
    pub fn bot_count(&self) -> usize {
        self.entities
            .iter()
            .filter_map(|e| e.as_player())
            .filter(|p| p.bot)
            .count()
    }
}
