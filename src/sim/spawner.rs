//! Procedural placement: box waves, terrain, bot landings and potion drops
//!
//! Each wave walks the whole board. Eligible cells (empty ground, no box, not
//! within the safe radius of a player) are skipped with probability
//! `4 / (wave + 10)` and otherwise receive one tier drawn from the mode's
//! weighted table. Weights grow with the wave so later waves get tougher.

use glam::Vec2;
use rand::Rng;

use super::board::{Board, BoxMaterial, Cell, Terrain};
use super::entity::PotionKind;
use crate::consts::{MAX_PLACEMENT_ATTEMPTS, SAFE_RADIUS_CELLS};

/// Which weighted table a wave draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTable {
    Scavenger,
    Battle,
}

impl SpawnTable {
    /// Tier weights for `wave`, in draw order
    pub fn weights(self, wave: u32) -> Vec<(BoxMaterial, f64)> {
        use BoxMaterial as M;
        let w = wave as f64;
        match self {
            SpawnTable::Scavenger => vec![
                (M::Silver, (0.5 * (w - 3.0)).max(0.0)),
                (M::Gold, (0.1 * (w - 2.0)).max(0.0)),
                (M::Dark, (0.3 * (w - 2.0)).max(0.0)),
                (M::Purple, 0.05 * (w - 1.0)),
                (M::Green, 0.05 * (w - 1.0)),
                (M::Black, 0.1 * w),
                (M::Blue, 0.1 * w),
                (M::N, w),
                (M::O, w.sqrt()),
            ],
            SpawnTable::Battle => vec![
                (M::Man, 0.1 * w),
                (M::Silver, 1.0),
                (M::Gold, 0.0),
                (M::Dark, 5.0),
                (M::Purple, 1.0),
                (M::Green, 0.5 * w.sqrt()),
                (M::Black, 1.0),
                (M::Red, 2.0),
                (M::Blue, w.sqrt()),
                (M::N, 6.0),
                (M::O, 3.0),
            ],
        }
    }

    /// Draw one tier; `None` if every weight is zero
    pub fn draw<R: Rng>(self, wave: u32, rng: &mut R) -> Option<BoxMaterial> {
        let weights = self.weights(wave);
        let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let roll = rng.random::<f64>() * total;
        let mut acc = 0.0;
        for (material, weight) in &weights {
            acc += weight.max(0.0);
            if roll < acc {
                return Some(*material);
            }
        }
        // Float slop at the very top of the range
        weights.iter().rev().find(|(_, w)| *w > 0.0).map(|(m, _)| *m)
    }
}

/// Probability that an eligible cell stays empty this wave
pub fn skip_chance(wave: u32) -> f64 {
    4.0 / (wave as f64 + 10.0)
}

/// True if no player stands within the safe radius of `cell`'s center
pub fn is_player_safe(board: &Board, cell: Cell, players: &[Vec2]) -> bool {
    let Ok(center) = board.cell_center(cell) else {
        return false;
    };
    let radius = SAFE_RADIUS_CELLS * board.cell_size();
    players.iter().all(|p| p.distance(center) >= radius)
}

/// Fill eligible cells for `wave`; returns what was placed
pub fn spawn_wave<R: Rng>(
    board: &mut Board,
    table: SpawnTable,
    wave: u32,
    players: &[Vec2],
    rng: &mut R,
) -> Vec<(Cell, BoxMaterial)> {
    let skip = skip_chance(wave);
    let mut placed = Vec::new();
    for cell in board.cells() {
        if !is_player_safe(board, cell, players) {
            continue;
        }
        if board.terrain_at(cell) != Terrain::Empty || board.has_box(cell) {
            continue;
        }
        if rng.random::<f64>() < skip {
            continue;
        }
        if let Some(material) = table.draw(wave, rng) {
            board.set_box(cell, material);
            placed.push((cell, material));
        }
    }
    log::info!("Wave {wave}: placed {} boxes", placed.len());
    placed
}

/// Random cell with empty ground that is safe from every player, optionally
/// also box-free. Gives up after a bounded number of attempts.
pub fn pick_landing_cell<R: Rng>(
    board: &Board,
    players: &[Vec2],
    require_box_free: bool,
    rng: &mut R,
) -> Option<Cell> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = Cell::new(
            rng.random_range(0..board.width()),
            rng.random_range(0..board.height()),
        );
        if board.terrain_at(cell) != Terrain::Empty {
            continue;
        }
        if require_box_free && board.has_box(cell) {
            continue;
        }
        if is_player_safe(board, cell, players) {
            return Some(cell);
        }
    }
    log::debug!("No landing cell found after {MAX_PLACEMENT_ATTEMPTS} attempts");
    None
}

pub fn random_potion<R: Rng>(rng: &mut R) -> PotionKind {
    PotionKind::ALL[rng.random_range(0..PotionKind::ALL.len())]
}

/// Tree border plus `count` cacti on interior cells not listed in `keep_clear`
pub fn build_terrain<R: Rng>(board: &mut Board, count: u32, keep_clear: &[Cell], rng: &mut R) {
    board.fill_border(Terrain::Tree);
    let (w, h) = (board.width(), board.height());
    if w < 3 || h < 3 {
        return;
    }
    let interior = ((w - 2) * (h - 2)) as usize;
    if interior <= keep_clear.len() {
        return;
    }
    let mut planted = 0;
    let mut attempts = 0;
    while planted < count && attempts < count * MAX_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let cell = Cell::new(rng.random_range(1..w - 1), rng.random_range(1..h - 1));
        if keep_clear.contains(&cell) {
            continue;
        }
        board.set_terrain(cell, Terrain::Cactus);
        planted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_board() -> Board {
        let mut board = Board::new(20, 20, 40.0);
        board.fill_border(Terrain::Tree);
        board
    }

    #[test]
    fn test_scavenger_weights_follow_wave() {
        let weights = SpawnTable::Scavenger.weights(4);
        let get = |m| weights.iter().find(|(x, _)| *x == m).map(|(_, w)| *w).unwrap();
        assert!((get(BoxMaterial::Silver) - 0.5).abs() < 1e-9);
        assert!((get(BoxMaterial::Gold) - 0.2).abs() < 1e-9);
        assert!((get(BoxMaterial::Dark) - 0.6).abs() < 1e-9);
        assert!((get(BoxMaterial::N) - 4.0).abs() < 1e-9);
        assert!((get(BoxMaterial::O) - 2.0).abs() < 1e-9);

        // Early waves clamp the tough tiers to zero
        let early = SpawnTable::Scavenger.weights(1);
        assert_eq!(early[0], (BoxMaterial::Silver, 0.0));
        assert_eq!(early[1], (BoxMaterial::Gold, 0.0));
    }

    #[test]
    fn test_battle_table_never_draws_gold() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2000 {
            assert_ne!(SpawnTable::Battle.draw(3, &mut rng), Some(BoxMaterial::Gold));
        }
    }

    #[test]
    fn test_scavenger_wave_one_only_basic_tiers() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..2000 {
            let m = SpawnTable::Scavenger.draw(1, &mut rng).unwrap();
            assert!(matches!(
                m,
                BoxMaterial::Black | BoxMaterial::Blue | BoxMaterial::N | BoxMaterial::O
            ));
        }
    }

    #[test]
    fn test_wave_respects_safe_radius_and_terrain() {
        let mut board = open_board();
        board.set_terrain(Cell::new(3, 3), Terrain::Cactus);
        board.set_box(Cell::new(4, 4), BoxMaterial::Gold);
        let player = board.cell_center(Cell::new(10, 10)).unwrap();
        let mut rng = Pcg32::seed_from_u64(3);

        let placed = spawn_wave(&mut board, SpawnTable::Scavenger, 50, &[player], &mut rng);
        assert!(!placed.is_empty());
        for (cell, _) in &placed {
            assert_eq!(board.terrain_at(*cell), Terrain::Empty);
            assert!(*cell != Cell::new(4, 4));
            assert!(is_player_safe(&board, *cell, &[player]));
        }
        assert_eq!(board.box_at(Cell::new(4, 4)), Some(BoxMaterial::Gold));
        // Two cells away along an axis is exactly the radius and therefore safe
        assert!(!is_player_safe(&board, Cell::new(11, 11), &[player]));
        assert!(is_player_safe(&board, Cell::new(12, 10), &[player]));
    }

    #[test]
    fn test_skip_chance_falls_with_wave() {
        assert!((skip_chance(0) - 0.4).abs() < 1e-12);
        assert!(skip_chance(10) < skip_chance(1));
    }

    #[test]
    fn test_landing_gives_up_on_full_board() {
        let mut board = Board::new(4, 4, 40.0);
        for cell in board.cells().collect::<Vec<_>>() {
            board.set_terrain(cell, Terrain::Tree);
        }
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(pick_landing_cell(&board, &[], true, &mut rng), None);
    }

    #[test]
    fn test_landing_cell_is_valid() {
        let mut board = open_board();
        let mut rng = Pcg32::seed_from_u64(5);
        let players = [board.cell_center(Cell::new(5, 5)).unwrap()];
        for cell in board.cells().collect::<Vec<_>>() {
            if cell.x % 2 == 0 && board.terrain_at(cell) == Terrain::Empty {
                board.set_box(cell, BoxMaterial::O);
            }
        }
        for _ in 0..50 {
            if let Some(cell) = pick_landing_cell(&board, &players, true, &mut rng) {
                assert!(board.is_passable(cell));
                assert!(is_player_safe(&board, cell, &players));
            }
        }
    }

    #[test]
    fn test_terrain_keeps_start_cells_clear() {
        let mut board = Board::new(20, 20, 40.0);
        let start = Cell::new(10, 10);
        let mut rng = Pcg32::seed_from_u64(9);
        build_terrain(&mut board, 200, &[start], &mut rng);
        assert_eq!(board.terrain_at(start), Terrain::Empty);
        assert_eq!(board.terrain_at(Cell::new(0, 0)), Terrain::Tree);
        let cacti = board
            .cells()
            .filter(|c| board.terrain_at(*c) == Terrain::Cactus)
            .count();
        assert!(cacti > 0);
    }
}
