//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `Session::advance`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod battle;
pub mod board;
pub mod collision;
pub mod entity;
pub mod events;
pub mod pattern;
pub mod player;
pub mod reaction;
pub mod scavenger;
pub mod scheduler;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use battle::{BATTLE_KIT, BattleSession};
pub use board::{Board, BoxMaterial, Cell, Terrain};
pub use collision::{BoxHit, PlayerHit};
pub use entity::{
    Bubble, BubbleKind, Entity, EntityId, EntityKind, EntityRegistry, EntityTag, Explosion,
    ExplosionKind, Potion, PotionKind,
};
pub use events::{GameEvent, SessionResult};
pub use pattern::{Blast, blast_pattern};
pub use player::{Ability, Archetype, Cooldowns, Facing, Motion, Player};
pub use reaction::{Reaction, Reward, react};
pub use scavenger::{SCAVENGER_KIT, ScavengerSession};
pub use scheduler::{Scheduler, TimerId};
pub use session::{PlayerSlot, PlayerStatus, Session};
pub use spawner::SpawnTable;
pub use state::{Arena, SessionPhase, TimerAction};
pub use tick::walk;
