//! Overlap resolution
//!
//! Explosions overlap whatever shares their cell, and only during the first
//! tick after they appear. Each pass returns what happened so the mode
//! controller can turn it into score or damage.

use super::board::Cell;
use super::entity::{EntityId, EntityKind, EntityTag, ExplosionKind, PotionKind};
use super::events::GameEvent;
use super::reaction::{Reward, react};
use super::state::{Arena, TimerAction};

/// A player caught by an explosion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHit {
    pub player: EntityId,
    pub kind: ExplosionKind,
}

/// A box that reacted to an explosion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHit {
    pub cell: Cell,
    pub reward: Reward,
}

impl Arena {
    fn armed_explosions(&self) -> Vec<(EntityId, Cell, ExplosionKind)> {
        self.entities
            .iter()
            .filter_map(|e| match e.kind {
                EntityKind::Explosion(x) if x.armed => Some((e.id, e.cell, x.kind)),
                _ => None,
            })
            .collect()
    }

    /// Step 4: players standing in a fresh explosion. A hit player becomes
    /// invulnerable until a timer clears it; an invulnerable player is skipped
    /// entirely. Several explosions on one cell count once, the oldest wins.
    pub fn resolve_player_hits(&mut self) -> Vec<PlayerHit> {
        let explosions = self.armed_explosions();
        if explosions.is_empty() {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for id in self.entities.ids(EntityTag::Player) {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            let cell = entity.cell;
            let Some(kind) = explosions.iter().find(|(_, c, _)| *c == cell).map(|e| e.2) else {
                continue;
            };
            let player = self.entities.expect_player_mut(id);
            if player.invulnerable {
                continue;
            }
            player.invulnerable = true;
            let timer = self
                .scheduler
                .after(self.settings.invulnerability_ms, TimerAction::EndInvulnerability(id));
            self.entities.expect_player_mut(id).invulnerability_timer = Some(timer);
            hits.push(PlayerHit { player: id, kind });
        }
        hits
    }

    /// Step 5: fresh explosions against the box layer. Every explosion reacts
    /// with whatever box its cell holds at that moment, so two explosions on
    /// one cell degrade it twice. Released bubbles are placed immediately.
    pub fn resolve_box_hits(&mut self) -> Vec<BoxHit> {
        let mut hits = Vec::new();
        for (_, cell, kind) in self.armed_explosions() {
            let Some(material) = self.board.box_at(cell) else {
                continue;
            };
            let reaction = react(material, kind);
            if reaction.next != Some(material) {
                self.set_box(cell, reaction.next);
            }
            if let Some(bubble) = reaction.reward.spawn_bubble {
                self.spawn_bubble(cell, bubble, false);
            }
            hits.push(BoxHit {
                cell,
                reward: reaction.reward,
            });
        }
        hits
    }

    /// Step 6: players collect potions sharing their cell. Returns how many
    /// were consumed.
    pub fn resolve_potion_pickups(&mut self) -> usize {
        let players: Vec<(EntityId, Cell)> = self
            .entities
            .iter()
            .filter(|e| e.tag() == EntityTag::Player)
            .map(|e| (e.id, e.cell))
            .collect();
        let mut consumed = 0;
        for id in self.entities.ids(EntityTag::Potion) {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            let EntityKind::Potion(potion) = entity.kind else {
                continue;
            };
            let cell = entity.cell;
            let Some(&(taker, _)) = players.iter().find(|(_, c)| *c == cell) else {
                continue;
            };
            self.apply_potion(taker, potion.kind);
            self.despawn(id);
            consumed += 1;
        }
        consumed
    }

    fn apply_potion(&mut self, id: EntityId, kind: PotionKind) {
        let boost = self.settings.boost_duration_ms;
        let player = self.entities.expect_player_mut(id);
        log::debug!("{} drinks {kind:?}", player.label);
        match kind {
            PotionKind::Heal => {
                player.heal(1);
                let life = player.life;
                self.emit(GameEvent::LifeChanged { id, life });
            }
            PotionKind::Attack => player.attack_boost_ms = boost,
            PotionKind::Speed => player.speed_boost_ms = boost,
        }
    }

    /// Step 7: explosions that had their pass become inert until they expire
    pub fn retire_explosions(&mut self) {
        for entity in self.entities.iter_mut() {
            if let EntityKind::Explosion(explosion) = &mut entity.kind {
                explosion.armed = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::board::{Board, BoxMaterial, Terrain};
    use crate::sim::entity::BubbleKind;
    use crate::sim::player::{Archetype, Player};

    fn arena() -> Arena {
        let mut arena = Arena::new(Settings::default(), 3);
        let mut board = Board::new(20, 20, 40.0);
        board.fill_border(Terrain::Tree);
        arena.board = board;
        arena
    }

    #[test]
    fn test_hit_grants_invulnerability() {
        let mut arena = arena();
        let p = arena.spawn_player(Cell::new(4, 4), Player::new(Archetype::Boy, "P", 5));
        arena.spawn_explosion(Cell::new(4, 4), ExplosionKind::Red);
        arena.spawn_explosion(Cell::new(4, 4), ExplosionKind::Black);

        let hits = arena.resolve_player_hits();
        assert_eq!(hits, vec![PlayerHit { player: p, kind: ExplosionKind::Red }]);
        let player = arena.entities.expect_player_mut(p);
        assert!(player.invulnerable);
        assert!(player.invulnerability_timer.is_some());

        // Same tick again: still armed but the player is protected
        assert!(arena.resolve_player_hits().is_empty());

        arena.fire_timers(1000, |_, _| {});
        assert!(!arena.entities.expect_player_mut(p).invulnerable);
    }

    #[test]
    fn test_retired_explosion_is_harmless() {
        let mut arena = arena();
        arena.spawn_player(Cell::new(4, 4), Player::new(Archetype::Boy, "P", 5));
        arena.spawn_explosion(Cell::new(4, 4), ExplosionKind::Plain);
        arena.retire_explosions();
        assert!(arena.resolve_player_hits().is_empty());
    }

    #[test]
    fn test_box_hits_apply_reactions() {
        let mut arena = arena();
        arena.board.set_box(Cell::new(3, 3), BoxMaterial::Gold);
        arena.board.set_box(Cell::new(5, 5), BoxMaterial::Dark);
        arena.board.set_box(Cell::new(7, 7), BoxMaterial::Green);
        arena.spawn_explosion(Cell::new(3, 3), ExplosionKind::Plain);
        arena.spawn_explosion(Cell::new(5, 5), ExplosionKind::Plain);
        arena.spawn_explosion(Cell::new(7, 7), ExplosionKind::Plain);

        let hits = arena.resolve_box_hits();
        let score: i64 = hits.iter().map(|h| h.reward.score).sum();
        assert_eq!(score, 3);
        assert_eq!(arena.board.box_at(Cell::new(3, 3)), None);
        assert_eq!(arena.board.box_at(Cell::new(5, 5)), Some(BoxMaterial::Dark));
        assert_eq!(arena.board.box_at(Cell::new(7, 7)), None);

        let bubbles = arena.entities.ids(EntityTag::Bubble);
        assert_eq!(bubbles.len(), 1);
        let bubble = arena.entities.get(bubbles[0]).unwrap();
        assert_eq!(bubble.cell, Cell::new(7, 7));
        assert!(matches!(
            bubble.kind,
            EntityKind::Bubble(b) if b.kind == BubbleKind::Green && !b.attack_boosted
        ));
    }

    #[test]
    fn test_stacked_explosions_degrade_twice() {
        let mut arena = arena();
        arena.board.set_box(Cell::new(3, 3), BoxMaterial::N);
        arena.spawn_explosion(Cell::new(3, 3), ExplosionKind::Plain);
        arena.spawn_explosion(Cell::new(3, 3), ExplosionKind::Plain);
        let hits = arena.resolve_box_hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(arena.board.box_at(Cell::new(3, 3)), None);
        assert_eq!(hits[1].reward.score, 1);
    }

    #[test]
    fn test_destroyed_box_is_gone_for_later_explosions() {
        let mut arena = arena();
        arena.board.set_box(Cell::new(3, 3), BoxMaterial::O);
        arena.spawn_explosion(Cell::new(3, 3), ExplosionKind::Plain);
        arena.spawn_explosion(Cell::new(3, 3), ExplosionKind::Black);
        arena.drain_events();

        let hits = arena.resolve_box_hits();
        let score: i64 = hits.iter().map(|h| h.reward.score).sum();
        assert_eq!(score, 1);
        assert_eq!(hits.len(), 1);
        let changes: Vec<GameEvent> = arena
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BoxChanged { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![GameEvent::BoxChanged {
                cell: Cell::new(3, 3),
                material: None
            }]
        );
    }

    #[test]
    fn test_potions() {
        let mut arena = arena();
        let p = arena.spawn_player(Cell::new(4, 4), Player::new(Archetype::Boy, "P", 5));
        arena.entities.expect_player_mut(p).life = 3;
        arena.spawn_potion(Cell::new(4, 4), PotionKind::Heal);
        arena.spawn_potion(Cell::new(4, 4), PotionKind::Speed);
        arena.spawn_potion(Cell::new(9, 9), PotionKind::Attack);

        assert_eq!(arena.resolve_potion_pickups(), 2);
        let player = arena.entities.expect_player_mut(p);
        assert_eq!(player.life, 4);
        assert_eq!(player.speed_boost_ms, 10_000);
        assert_eq!(player.attack_boost_ms, 0);
        assert_eq!(arena.entities.count(EntityTag::Potion), 1);
    }
}
