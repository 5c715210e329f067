//! Entity registry
//!
//! Players, bubbles, explosions and potions share one arena keyed by
//! [`EntityId`]. Common fields (position, cell) live on [`Entity`]; the
//! kind-specific payload lives in [`EntityKind`]. Iteration is in id order so
//! a seeded session replays identically.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::board::Cell;
use super::player::Player;

/// Stable handle to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleKind {
    Blue,
    Red,
    Black,
    Green,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionKind {
    Plain,
    Red,
    Black,
}

impl ExplosionKind {
    /// Life (or score, in Scavenger) lost by a player caught in it
    pub fn damage(self) -> i32 {
        match self {
            ExplosionKind::Plain => 1,
            ExplosionKind::Red => 2,
            ExplosionKind::Black => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotionKind {
    Heal,
    Attack,
    Speed,
}

impl PotionKind {
    pub const ALL: [PotionKind; 3] = [PotionKind::Heal, PotionKind::Attack, PotionKind::Speed];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub kind: BubbleKind,
    pub attack_boosted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub kind: ExplosionKind,
    /// Still owed its single collision pass
    pub armed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potion {
    pub kind: PotionKind,
}

/// Kind-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player(Player),
    Bubble(Bubble),
    Explosion(Explosion),
    Potion(Potion),
}

/// Payload-free discriminant, used in events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    Bubble,
    Explosion,
    Potion,
}

impl EntityKind {
    pub fn tag(&self) -> EntityTag {
        match self {
            EntityKind::Player(_) => EntityTag::Player,
            EntityKind::Bubble(_) => EntityTag::Bubble,
            EntityKind::Explosion(_) => EntityTag::Explosion,
            EntityKind::Potion(_) => EntityTag::Potion,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// World-space position (cell center for everything but walking players)
    pub pos: Vec2,
    pub cell: Cell,
    pub kind: EntityKind,
}

impl Entity {
    pub fn tag(&self) -> EntityTag {
        self.kind.tag()
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }
}

/// Owner of every live entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, pos: Vec2, cell: Cell, kind: EntityKind) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.entities.insert(id, Entity { id, pos, cell, kind });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn player(&self, id: EntityId) -> Option<&Player> {
        self.get(id).and_then(Entity::as_player)
    }

    pub fn player_mut(&mut self, id: EntityId) -> Option<&mut Player> {
        self.get_mut(id).and_then(Entity::as_player_mut)
    }

    /// Player that the current tick already proved exists.
    ///
    /// # Panics
    /// If `id` is not a live player; that means tick phases ran out of order.
    pub fn expect_player_mut(&mut self, id: EntityId) -> &mut Player {
        match self.player_mut(id) {
            Some(p) => p,
            None => panic!("player {id:?} missing from registry"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Ids of every entity with the given tag, in id order
    pub fn ids(&self, tag: EntityTag) -> Vec<EntityId> {
        self.iter().filter(|e| e.tag() == tag).map(|e| e.id).collect()
    }

    pub fn count(&self, tag: EntityTag) -> usize {
        self.iter().filter(|e| e.tag() == tag).count()
    }

    /// Positions of every live player
    pub fn player_positions(&self) -> Vec<Vec2> {
        self.iter().filter(|e| e.tag() == EntityTag::Player).map(|e| e.pos).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
