//! Bubble Arena - a tile-grid bubble placement arcade simulation
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (board, timers, entities, blasts, spawning, sessions)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Error types surfaced by the engine

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{BoardError, SettingsError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Side length of one board cell in world units (pixels)
    pub const CELL_SIZE: f32 = 40.0;
    /// Default board dimensions
    pub const BOARD_WIDTH: i32 = 20;
    pub const BOARD_HEIGHT: i32 = 20;
    /// Cacti scattered over the interior at launch
    pub const CACTUS_COUNT: u32 = 20;

    /// Delay between placing a bubble and its detonation (ms)
    pub const FUSE_MS: u64 = 2000;
    /// How long an explosion stays on the board (ms)
    pub const EXPLOSION_LIFETIME_MS: u64 = 500;
    /// Invulnerability window after taking a hit (ms)
    pub const INVULNERABILITY_MS: u64 = 1000;

    /// Cooldown meter ceiling; abilities fire only at exactly this value
    pub const COOLDOWN_MAX: f32 = 100.0;
    /// Cooldown recovery per millisecond
    pub const BLUE_RECOVERY_PER_MS: f32 = 0.05;
    pub const RED_RECOVERY_PER_MS: f32 = 0.04;
    pub const GREEN_RECOVERY_PER_MS: f32 = 0.02;

    /// Speed multiplier while a speed potion is active
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;
    /// Duration of speed/attack potions (ms)
    pub const BOOST_DURATION_MS: u64 = 10_000;

    /// Match clocks (ms)
    pub const SCAVENGER_DURATION_MS: u64 = 180_000;
    pub const BATTLE_DURATION_MS: u64 = 120_000;

    /// Spawner cadence (ms)
    pub const SPAWN_WAVE_INTERVAL_MS: u64 = 30_000;
    pub const BOT_LAND_INTERVAL_MS: u64 = 10_000;
    pub const OVERTIME_BOT_LAND_INTERVAL_MS: u64 = 5_000;
    pub const POTION_INTERVAL_MS: u64 = 5_000;

    /// Starting life
    pub const PRIMARY_LIFE: i32 = 5;
    pub const BOT_LIFE: i32 = 10;
    /// Chance per tick that a bot picks a new heading
    pub const BOT_TURN_CHANCE: f64 = 0.04;

    /// Boxes and landings keep this many cell widths away from every player
    pub const SAFE_RADIUS_CELLS: f32 = 2.0;
    /// Random placement attempts before a landing is skipped
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 64;
    /// Largest distance a player moves per collision check, as a fraction of a cell
    pub const MOVE_SUBSTEP_CELLS: f32 = 0.125;
    /// Half extent of a player's footprint used for the movement check
    pub const PLAYER_HALF_EXTENT: f32 = 5.0;
}
