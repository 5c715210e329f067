//! Battle mode
//!
//! Two primaries fight among wandering bots. Bots drop in from the sky on a
//! timer, potions appear every few seconds and fresh box waves keep the board
//! crowded. When the clock runs out the match goes into overtime: nobody
//! wins on time, bots just land twice as often until a primary falls.

use super::entity::EntityId;
use super::events::{GameEvent, SessionResult};
use super::player::{Ability, Archetype, Player};
use super::scheduler::TimerId;
use super::session::{PlayerSlot, Session};
use super::spawner::SpawnTable;
use super::state::{Arena, TimerAction};
use crate::settings::Settings;

/// Abilities usable in this mode
pub const BATTLE_KIT: [Ability; 3] = [Ability::Blue, Ability::Red, Ability::Green];

const LABELS: [&str; 2] = ["Player1", "Player2"];

pub struct BattleSession {
    arena: Arena,
    archetypes: [Archetype; 2],
    primaries: [Option<EntityId>; 2],
    time_left_ms: u64,
    overtime: bool,
    land_timer: Option<TimerId>,
}

impl BattleSession {
    pub fn new(settings: Settings, seed: u64, archetypes: [Archetype; 2]) -> Self {
        let time_left_ms = settings.battle_duration_ms;
        Self {
            arena: Arena::new(settings, seed),
            archetypes,
            primaries: [None, None],
            time_left_ms,
            overtime: false,
            land_timer: None,
        }
    }

    pub fn is_overtime(&self) -> bool {
        self.overtime
    }

    fn start_overtime(&mut self) {
        self.overtime = true;
        if let Some(timer) = self.land_timer.take() {
            self.arena.scheduler.cancel(timer);
        }
        let interval = self.arena.settings.overtime_bot_land_interval_ms;
        self.land_timer = Some(self.arena.scheduler.every(interval, TimerAction::LandBot));
        log::info!("Overtime: bots land every {interval} ms");
    }

    fn slot_of(&self, id: EntityId) -> Option<usize> {
        self.primaries.iter().position(|p| *p == Some(id))
    }

    /// Apply one hit. Returns true if it ended the match.
    fn apply_hit(&mut self, id: EntityId, damage: i32) -> bool {
        let player = self.arena.entities.expect_player_mut(id);
        player.life -= damage;
        let life = player.life;
        let dead = player.is_dead();
        self.arena.emit(GameEvent::LifeChanged { id, life });
        if !dead {
            return false;
        }
        self.arena.despawn(id);
        match self.slot_of(id) {
            Some(slot) => {
                self.primaries[slot] = None;
                let winner = LABELS[1 - slot].to_string();
                self.done(SessionResult::Winner { winner });
                true
            }
            None => {
                log::debug!("Bot {id:?} knocked out");
                false
            }
        }
    }

    fn tick(&mut self, delta_ms: u64) {
        let turn_chance = self.arena.settings.bot_turn_chance;
        self.arena.steer_bots(turn_chance);
        self.arena.move_players(delta_ms);
        self.arena.process_abilities(&BATTLE_KIT);
        self.arena.advance_player_timers(delta_ms);

        for hit in self.arena.resolve_player_hits() {
            if self.apply_hit(hit.player, hit.kind.damage()) {
                return;
            }
        }

        let bot_life = self.arena.settings.bot_life;
        for hit in self.arena.resolve_box_hits() {
            if hit.reward.spawn_bot {
                self.arena.spawn_player(hit.cell, Player::bot(bot_life));
            }
        }
        self.arena.resolve_potion_pickups();
        self.arena.retire_explosions();
    }
}

impl Session for BattleSession {
    fn arena(&self) -> &Arena {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn slot_entity(&self, slot: PlayerSlot) -> Option<EntityId> {
        self.primaries[slot.index()]
    }

    fn launch(&mut self) {
        let starts = self.arena.settings.battle_starts;
        self.arena.reset(&starts);
        self.time_left_ms = self.arena.settings.battle_duration_ms;
        self.overtime = false;

        let life = self.arena.settings.primary_life;
        for (i, start) in starts.into_iter().enumerate() {
            let player = Player::new(self.archetypes[i], LABELS[i], life);
            self.primaries[i] = Some(self.arena.spawn_player(start, player));
        }

        self.arena.spawn_wave(SpawnTable::Battle);
        let s = &self.arena.settings;
        let (wave, land, potion) = (
            s.spawn_wave_interval_ms,
            s.bot_land_interval_ms,
            s.potion_interval_ms,
        );
        let scheduler = &mut self.arena.scheduler;
        scheduler.every(wave, TimerAction::SpawnWave);
        self.land_timer = Some(scheduler.every(land, TimerAction::LandBot));
        scheduler.every(potion, TimerAction::DropPotion);
        log::info!("Battle launched: {} vs {}", LABELS[0], LABELS[1]);
    }

    fn advance(&mut self, delta_ms: u64) {
        if !self.arena.is_running() {
            return;
        }
        self.arena.fire_timers(delta_ms, |arena, action| match action {
            TimerAction::SpawnWave => {
                arena.spawn_wave(SpawnTable::Battle);
            }
            TimerAction::LandBot => {
                arena.land_bot();
            }
            TimerAction::DropPotion => {
                arena.drop_potion();
            }
            _ => {}
        });
        self.time_left_ms = self.time_left_ms.saturating_sub(delta_ms);
        if self.time_left_ms == 0 && !self.overtime {
            self.start_overtime();
        }

        self.tick(delta_ms);
    }

    fn quit_result(&self) -> SessionResult {
        SessionResult::Winner {
            winner: "None".to_string(),
        }
    }

    fn time_left_ms(&self) -> u64 {
        self.time_left_ms
    }
}
