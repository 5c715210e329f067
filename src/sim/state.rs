//! Arena state shared by both session modes
//!
//! The arena owns everything a session mutates: the board, the entity
//! registry, the timer scheduler and the seeded RNG. Mode controllers drive it
//! through the tick phases in `tick.rs` and `collision.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, BoxMaterial, Cell};
use super::entity::{
    Bubble, BubbleKind, Entity, EntityId, EntityKind, EntityRegistry, EntityTag, Explosion,
    ExplosionKind, Potion, PotionKind,
};
use super::events::{GameEvent, SessionResult};
use super::pattern::blast_pattern;
use super::player::Player;
use super::scheduler::Scheduler;
use super::spawner::{self, SpawnTable};
use crate::settings::Settings;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Constructed, not launched yet
    Ready,
    Running,
    Paused,
    /// Finished; nothing mutates any more
    Done,
}

/// Deferred work. Entity handles are resolved when the timer fires and a
/// stale handle is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Detonate(EntityId),
    ExpireExplosion(EntityId),
    EndInvulnerability(EntityId),
    SpawnWave,
    LandBot,
    DropPotion,
}

/// Board, entities, timers and randomness for one session
#[derive(Debug, Clone)]
pub struct Arena {
    pub settings: Settings,
    pub board: Board,
    pub entities: EntityRegistry,
    pub scheduler: Scheduler<TimerAction>,
    pub phase: SessionPhase,
    /// Spawner wave counter
    pub wave: u32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Arena {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let board = Board::new(settings.board_width, settings.board_height, settings.cell_size);
        Self {
            settings,
            board,
            entities: EntityRegistry::new(),
            scheduler: Scheduler::new(),
            phase: SessionPhase::Ready,
            wave: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Fresh board and registry, no timers, phase `Running`. Whatever the
    /// previous match left behind is reported gone before `Launched`.
    pub fn reset(&mut self, keep_clear: &[Cell]) {
        let stale: Vec<(EntityId, EntityTag)> =
            self.entities.iter().map(|e| (e.id, e.tag())).collect();
        for (id, tag) in stale {
            self.emit(GameEvent::EntityDespawned { id, tag });
        }
        let boxed: Vec<Cell> = self.board.cells().filter(|c| self.board.has_box(*c)).collect();
        for cell in boxed {
            self.emit(GameEvent::BoxChanged {
                cell,
                material: None,
            });
        }

        let s = &self.settings;
        self.board = Board::new(s.board_width, s.board_height, s.cell_size);
        spawner::build_terrain(&mut self.board, s.cactus_count, keep_clear, &mut self.rng);
        self.entities.clear();
        self.scheduler = Scheduler::new();
        self.wave = 0;
        self.phase = SessionPhase::Running;
        self.emit(GameEvent::Launched);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    // === Lifecycle ===

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.scheduler.pause();
        self.emit(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.scheduler.resume();
        self.emit(GameEvent::Resumed);
        true
    }

    /// Stop every timer and publish the result. Only the first call counts.
    pub fn finish(&mut self, result: SessionResult) -> bool {
        if self.phase == SessionPhase::Done {
            return false;
        }
        log::info!("Session finished: {result:?}");
        self.phase = SessionPhase::Done;
        self.scheduler.clear();
        self.emit(GameEvent::Done(result));
        true
    }

    // === Entities ===

    fn spawn_at(&mut self, cell: Cell, kind: EntityKind) -> EntityId {
        let pos = match self.board.cell_center(cell) {
            Ok(pos) => pos,
            Err(e) => panic!("spawn outside the board: {e}"),
        };
        let tag = kind.tag();
        let id = self.entities.spawn(pos, cell, kind);
        self.emit(GameEvent::EntitySpawned { id, tag, cell });
        id
    }

    pub fn spawn_player(&mut self, cell: Cell, player: Player) -> EntityId {
        log::debug!("Spawning {} at {:?}", player.label, cell);
        self.spawn_at(cell, EntityKind::Player(player))
    }

    /// Place a bubble and light its fuse
    pub fn spawn_bubble(&mut self, cell: Cell, kind: BubbleKind, attack_boosted: bool) -> EntityId {
        let id = self.spawn_at(
            cell,
            EntityKind::Bubble(Bubble {
                kind,
                attack_boosted,
            }),
        );
        self.scheduler.after(self.settings.fuse_ms, TimerAction::Detonate(id));
        id
    }

    /// Place an armed explosion and schedule its removal
    pub fn spawn_explosion(&mut self, cell: Cell, kind: ExplosionKind) -> EntityId {
        let id = self.spawn_at(cell, EntityKind::Explosion(Explosion { kind, armed: true }));
        self.scheduler
            .after(self.settings.explosion_lifetime_ms, TimerAction::ExpireExplosion(id));
        id
    }

    pub fn spawn_potion(&mut self, cell: Cell, kind: PotionKind) -> EntityId {
        self.spawn_at(cell, EntityKind::Potion(Potion { kind }))
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.despawn(id)?;
        self.emit(GameEvent::EntityDespawned {
            id,
            tag: entity.tag(),
        });
        Some(entity)
    }

    /// Write the box layer and notify
    pub fn set_box(&mut self, cell: Cell, material: Option<BoxMaterial>) {
        match material {
            Some(m) => {
                self.board.set_box(cell, m);
            }
            None => {
                self.board.clear_box(cell);
            }
        }
        self.emit(GameEvent::BoxChanged { cell, material });
    }

    // === Spawner ===

    /// Advance the wave counter and fill the board from `table`
    pub fn spawn_wave(&mut self, table: SpawnTable) -> usize {
        self.wave += 1;
        let players = self.entities.player_positions();
        let placed = spawner::spawn_wave(&mut self.board, table, self.wave, &players, &mut self.rng);
        for (cell, material) in &placed {
            self.emit(GameEvent::BoxChanged {
                cell: *cell,
                material: Some(*material),
            });
        }
        self.emit(GameEvent::WaveSpawned {
            wave: self.wave,
            boxes: placed.len(),
        });
        placed.len()
    }

    /// Drop a bot on a random open cell away from players
    pub fn land_bot(&mut self) -> Option<EntityId> {
        let players = self.entities.player_positions();
        let cell = spawner::pick_landing_cell(&self.board, &players, true, &mut self.rng)?;
        log::info!("Bot landing at {cell:?}");
        Some(self.spawn_player(cell, Player::bot(self.settings.bot_life)))
    }

    /// Drop a random potion on a random open cell away from players
    pub fn drop_potion(&mut self) -> Option<EntityId> {
        let players = self.entities.player_positions();
        let cell = spawner::pick_landing_cell(&self.board, &players, false, &mut self.rng)?;
        let kind = spawner::random_potion(&mut self.rng);
        log::debug!("{kind:?} potion at {cell:?}");
        Some(self.spawn_potion(cell, kind))
    }

    // === Timers ===

    /// Let `delta_ms` pass on the scheduler and run what came due, in due
    /// order. Entity timers are resolved here; mode-level actions (spawns) go
    /// to `on_mode` at their place in that order.
    pub fn fire_timers<F>(&mut self, delta_ms: u64, mut on_mode: F)
    where
        F: FnMut(&mut Arena, TimerAction),
    {
        for action in self.scheduler.advance(delta_ms) {
            match action {
                TimerAction::Detonate(id) => self.detonate(id),
                TimerAction::ExpireExplosion(id) => {
                    self.despawn(id);
                }
                TimerAction::EndInvulnerability(id) => {
                    if let Some(player) = self.entities.player_mut(id) {
                        player.invulnerable = false;
                        player.invulnerability_timer = None;
                    }
                }
                other => on_mode(self, other),
            }
        }
    }

    fn detonate(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let EntityKind::Bubble(bubble) = entity.kind else {
            return;
        };
        let origin = entity.cell;
        self.despawn(id);
        for blast in blast_pattern(&self.board, origin, &bubble) {
            self.spawn_explosion(blast.cell, blast.kind);
        }
    }
}
