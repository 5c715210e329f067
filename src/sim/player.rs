//! Player controller
//!
//! A player is either idle or walking in one of four directions. Abilities
//! are gated by cooldown meters that refill over time and must read exactly
//! [`COOLDOWN_MAX`] to fire.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::BubbleKind;
use super::scheduler::TimerId;
use crate::consts::*;

/// Direction a player faces (screen space, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    W,
    S,
    E,
    N,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::W, Facing::S, Facing::E, Facing::N];

    /// Unit vector for this direction
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::W => Vec2::new(-1.0, 0.0),
            Facing::S => Vec2::new(0.0, 1.0),
            Facing::E => Vec2::new(1.0, 0.0),
            Facing::N => Vec2::new(0.0, -1.0),
        }
    }
}

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Idle,
    Walking(Facing),
}

/// Bubble-placing abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Blue,
    Red,
    Green,
}

impl Ability {
    pub fn bubble(self) -> BubbleKind {
        match self {
            Ability::Blue => BubbleKind::Blue,
            Ability::Red => BubbleKind::Red,
            Ability::Green => BubbleKind::Green,
        }
    }

    /// Meter refill per millisecond
    pub fn recovery_per_ms(self) -> f32 {
        match self {
            Ability::Blue => BLUE_RECOVERY_PER_MS,
            Ability::Red => RED_RECOVERY_PER_MS,
            Ability::Green => GREEN_RECOVERY_PER_MS,
        }
    }
}

/// Character archetypes; they differ in walking speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Archetype {
    #[default]
    Boy,
    Girl,
    BlueBoy,
    BlueGirl,
}

impl Archetype {
    /// Base speed in world units per second
    pub fn speed(self) -> f32 {
        match self {
            Archetype::Boy => 120.0,
            Archetype::Girl => 90.0,
            Archetype::BlueBoy => 140.0,
            Archetype::BlueGirl => 105.0,
        }
    }
}

/// Ability cooldown meters in `[0, COOLDOWN_MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    pub blue: f32,
    pub red: f32,
    pub green: f32,
}

impl Cooldowns {
    pub fn get(&self, ability: Ability) -> f32 {
        match ability {
            Ability::Blue => self.blue,
            Ability::Red => self.red,
            Ability::Green => self.green,
        }
    }

    fn slot(&mut self, ability: Ability) -> &mut f32 {
        match ability {
            Ability::Blue => &mut self.blue,
            Ability::Red => &mut self.red,
            Ability::Green => &mut self.green,
        }
    }

    pub fn is_ready(&self, ability: Ability) -> bool {
        self.get(ability) == COOLDOWN_MAX
    }

    /// Refill every meter for `dt_ms`
    pub fn recover(&mut self, dt_ms: f32) {
        for ability in [Ability::Blue, Ability::Red, Ability::Green] {
            let meter = self.slot(ability);
            *meter = (*meter + dt_ms * ability.recovery_per_ms()).clamp(0.0, COOLDOWN_MAX);
        }
    }

    /// Spend a full meter. No-op returning false unless it reads exactly max.
    pub fn spend(&mut self, ability: Ability) -> bool {
        if !self.is_ready(ability) {
            return false;
        }
        *self.slot(ability) = 0.0;
        true
    }
}

/// Per-player simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub archetype: Archetype,
    pub label: String,
    pub bot: bool,
    pub facing: Facing,
    pub motion: Motion,
    pub life: i32,
    pub max_life: i32,
    pub cooldowns: Cooldowns,
    pub speed_boost_ms: u64,
    pub attack_boost_ms: u64,
    pub invulnerable: bool,
    /// Timer that ends the current invulnerability window
    pub invulnerability_timer: Option<TimerId>,
    /// Held movement direction, written by the input surface
    pub intent: Option<Facing>,
    /// One-shot ability request, consumed by the next tick
    pub pending_ability: Option<Ability>,
}

impl Player {
    pub fn new(archetype: Archetype, label: impl Into<String>, life: i32) -> Self {
        Self {
            archetype,
            label: label.into(),
            bot: false,
            facing: Facing::S,
            motion: Motion::Idle,
            life,
            max_life: life,
            cooldowns: Cooldowns::default(),
            speed_boost_ms: 0,
            attack_boost_ms: 0,
            invulnerable: false,
            invulnerability_timer: None,
            intent: None,
            pending_ability: None,
        }
    }

    pub fn bot(life: i32) -> Self {
        Self {
            bot: true,
            ..Self::new(Archetype::Boy, "Bot", life)
        }
    }

    pub fn is_walking(&self) -> bool {
        matches!(self.motion, Motion::Walking(_))
    }

    /// Idle/Walking transition from the held intent
    pub fn apply_intent(&mut self) {
        match self.intent {
            Some(dir) => {
                self.facing = dir;
                self.motion = Motion::Walking(dir);
            }
            None => self.motion = Motion::Idle,
        }
    }

    /// Speed in world units per second, including boosts
    pub fn speed(&self) -> f32 {
        let base = self.archetype.speed();
        if self.speed_boost_ms > 0 {
            base * SPEED_BOOST_FACTOR
        } else {
            base
        }
    }

    /// Velocity in world units per second
    pub fn velocity(&self) -> Vec2 {
        match self.motion {
            Motion::Idle => Vec2::ZERO,
            Motion::Walking(dir) => dir.unit() * self.speed(),
        }
    }

    /// Spend the meter for `ability`; returns the bubble to place and whether
    /// it is attack-boosted.
    pub fn try_trigger(&mut self, ability: Ability) -> Option<(BubbleKind, bool)> {
        if !self.cooldowns.spend(ability) {
            return None;
        }
        Some((ability.bubble(), self.attack_boost_ms > 0))
    }

    /// Cooldown refill and boost decay
    pub fn advance_timers(&mut self, dt_ms: u64) {
        self.cooldowns.recover(dt_ms as f32);
        self.speed_boost_ms = self.speed_boost_ms.saturating_sub(dt_ms);
        self.attack_boost_ms = self.attack_boost_ms.saturating_sub(dt_ms);
    }

    pub fn heal(&mut self, amount: i32) {
        self.life = (self.life + amount).min(self.max_life);
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }
}
