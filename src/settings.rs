//! Simulation tuning
//!
//! Every balance constant a session reads lives here so a host can load a
//! variant from JSON. Defaults reproduce the stock game.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::board::Cell;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub board_width: i32,
    pub board_height: i32,
    pub cell_size: f32,
    /// Cacti scattered over the interior at launch
    pub cactus_count: u32,

    // === Timing (ms) ===
    pub fuse_ms: u64,
    pub explosion_lifetime_ms: u64,
    pub invulnerability_ms: u64,
    pub boost_duration_ms: u64,
    pub scavenger_duration_ms: u64,
    pub battle_duration_ms: u64,
    pub spawn_wave_interval_ms: u64,
    pub bot_land_interval_ms: u64,
    pub overtime_bot_land_interval_ms: u64,
    pub potion_interval_ms: u64,

    // === Players ===
    pub primary_life: i32,
    pub bot_life: i32,
    /// Chance per tick that a bot picks a new heading
    pub bot_turn_chance: f64,
    /// Where the Scavenger player starts
    pub scavenger_start: Cell,
    /// Where Player1 and Player2 start in Battle
    pub battle_starts: [Cell; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            cell_size: CELL_SIZE,
            cactus_count: CACTUS_COUNT,

            fuse_ms: FUSE_MS,
            explosion_lifetime_ms: EXPLOSION_LIFETIME_MS,
            invulnerability_ms: INVULNERABILITY_MS,
            boost_duration_ms: BOOST_DURATION_MS,
            scavenger_duration_ms: SCAVENGER_DURATION_MS,
            battle_duration_ms: BATTLE_DURATION_MS,
            spawn_wave_interval_ms: SPAWN_WAVE_INTERVAL_MS,
            bot_land_interval_ms: BOT_LAND_INTERVAL_MS,
            overtime_bot_land_interval_ms: OVERTIME_BOT_LAND_INTERVAL_MS,
            potion_interval_ms: POTION_INTERVAL_MS,

            primary_life: PRIMARY_LIFE,
            bot_life: BOT_LIFE,
            bot_turn_chance: BOT_TURN_CHANCE,
            scavenger_start: Cell::new(10, 10),
            battle_starts: [Cell::new(7, 7), Cell::new(14, 14)],
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        if let Err(e) = settings.validate() {
            log::warn!("Refusing settings: {e}");
            return Err(e);
        }
        log::info!(
            "Loaded settings: {}x{} board, fuse {}ms",
            settings.board_width,
            settings.board_height,
            settings.fuse_ms
        );
        Ok(settings)
    }

    /// Serialize to pretty JSON (for hosts that persist tuning)
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunings the engine cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        // Border trees plus at least one walkable interior cell
        if self.board_width < 3 || self.board_height < 3 {
            return Err(invalid(
                "board_width",
                format!(
                    "board must be at least 3x3, got {}x{}",
                    self.board_width, self.board_height
                ),
            ));
        }
        if !(self.cell_size > 0.0) {
            return Err(invalid("cell_size", format!("must be positive, got {}", self.cell_size)));
        }
        if self.explosion_lifetime_ms == 0 {
            return Err(invalid("explosion_lifetime_ms", "must be non-zero".into()));
        }
        for (field, period) in [
            ("spawn_wave_interval_ms", self.spawn_wave_interval_ms),
            ("bot_land_interval_ms", self.bot_land_interval_ms),
            ("overtime_bot_land_interval_ms", self.overtime_bot_land_interval_ms),
            ("potion_interval_ms", self.potion_interval_ms),
        ] {
            if period == 0 {
                return Err(invalid(field, "repeating interval must be non-zero".into()));
            }
        }
        if self.primary_life <= 0 || self.bot_life <= 0 {
            return Err(invalid("primary_life", "starting life must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.bot_turn_chance) {
            return Err(invalid(
                "bot_turn_chance",
                format!("must be within [0, 1], got {}", self.bot_turn_chance),
            ));
        }
        let interior = |c: Cell| {
            c.x > 0 && c.y > 0 && c.x < self.board_width - 1 && c.y < self.board_height - 1
        };
        if !interior(self.scavenger_start) {
            return Err(invalid(
                "scavenger_start",
                format!("{:?} is not an interior cell", self.scavenger_start),
            ));
        }
        if let Some(bad) = self.battle_starts.iter().find(|c| !interior(**c)) {
            return Err(invalid("battle_starts", format!("{bad:?} is not an interior cell")));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}
