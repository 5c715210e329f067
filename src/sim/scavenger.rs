//! Scavenger mode
//!
//! One player clears boxes against the clock. Box rewards add to the score and
//! getting caught in an explosion takes its damage off the score instead of
//! off the player's life.

use super::entity::EntityId;
use super::events::{GameEvent, SessionResult};
use super::player::{Ability, Archetype, Player};
use super::session::{PlayerSlot, Session};
use super::spawner::SpawnTable;
use super::state::{Arena, TimerAction};
use crate::settings::Settings;

/// Abilities usable in this mode
pub const SCAVENGER_KIT: [Ability; 2] = [Ability::Blue, Ability::Red];

/// The first wave is spawned as if three had already passed
pub const OPENING_WAVE: u32 = 4;

pub struct ScavengerSession {
    arena: Arena,
    archetype: Archetype,
    player: Option<EntityId>,
    score: i64,
    time_left_ms: u64,
}

impl ScavengerSession {
    pub fn new(settings: Settings, seed: u64, archetype: Archetype) -> Self {
        let time_left_ms = settings.scavenger_duration_ms;
        Self {
            arena: Arena::new(settings, seed),
            archetype,
            player: None,
            score: 0,
            time_left_ms,
        }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    fn add_score(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        self.score += delta;
        self.arena.emit(GameEvent::ScoreChanged { score: self.score });
    }

    fn tick(&mut self, delta_ms: u64) {
        let arena = &mut self.arena;
        arena.move_players(delta_ms);
        arena.process_abilities(&SCAVENGER_KIT);
        arena.advance_player_timers(delta_ms);

        let penalty: i64 = arena
            .resolve_player_hits()
            .iter()
            .map(|hit| i64::from(hit.kind.damage()))
            .sum();
        let reward: i64 = arena.resolve_box_hits().iter().map(|hit| hit.reward.score).sum();
        arena.retire_explosions();

        self.add_score(reward - penalty);
    }
}

impl Session for ScavengerSession {
    fn arena(&self) -> &Arena {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn slot_entity(&self, slot: PlayerSlot) -> Option<EntityId> {
        match slot {
            PlayerSlot::One => self.player,
            PlayerSlot::Two => None,
        }
    }

    fn launch(&mut self) {
        let start = self.arena.settings.scavenger_start;
        self.arena.reset(&[start]);
        self.score = 0;
        self.time_left_ms = self.arena.settings.scavenger_duration_ms;

        let life = self.arena.settings.primary_life;
        self.player = Some(
            self.arena
                .spawn_player(start, Player::new(self.archetype, "Player", life)),
        );

        self.arena.wave = OPENING_WAVE - 1;
        self.arena.spawn_wave(SpawnTable::Scavenger);
        let interval = self.arena.settings.spawn_wave_interval_ms;
        self.arena.scheduler.every(interval, TimerAction::SpawnWave);
        log::info!(
            "Scavenger launched: {} s on the clock",
            self.time_left_ms / 1000
        );
    }

    fn advance(&mut self, delta_ms: u64) {
        if !self.arena.is_running() {
            return;
        }
        self.arena.fire_timers(delta_ms, |arena, action| {
            if action == TimerAction::SpawnWave {
                arena.spawn_wave(SpawnTable::Scavenger);
            }
        });
        self.time_left_ms = self.time_left_ms.saturating_sub(delta_ms);

        self.tick(delta_ms);

        if self.time_left_ms == 0 {
            let score = self.score;
            self.done(SessionResult::Score { score });
        }
    }

    fn quit_result(&self) -> SessionResult {
        SessionResult::Score { score: self.score }
    }

    fn time_left_ms(&self) -> u64 {
        self.time_left_ms
    }
}
