//! Box material reactions
//!
//! Pure lookup from (material, explosion kind) to the material left behind
//! and whatever the destruction pays out.

use super::board::BoxMaterial;
use super::entity::{BubbleKind, ExplosionKind};

/// What destroying (or damaging) a box yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reward {
    pub score: i64,
    pub spawn_bubble: Option<BubbleKind>,
    pub spawn_bot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    /// Material left in the cell; `None` means the box is gone
    pub next: Option<BoxMaterial>,
    pub reward: Reward,
}

impl Reaction {
    fn stays(material: BoxMaterial) -> Self {
        Self {
            next: Some(material),
            reward: Reward::default(),
        }
    }

    fn destroyed(score: i64) -> Self {
        Self {
            next: None,
            reward: Reward {
                score,
                ..Default::default()
            },
        }
    }

    fn releases(bubble: BubbleKind) -> Self {
        Self {
            next: None,
            reward: Reward {
                score: 1,
                spawn_bubble: Some(bubble),
                spawn_bot: false,
            },
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.next.is_none()
    }
}

/// React `material` with an explosion of `kind`
pub fn react(material: BoxMaterial, kind: ExplosionKind) -> Reaction {
    use BoxMaterial as M;
    use ExplosionKind as E;

    match (material, kind) {
        (M::O, _) => Reaction::destroyed(1),

        (M::N, E::Plain) => Reaction::stays(M::O),
        (M::N, _) => Reaction::destroyed(1),

        (M::Silver, E::Plain) => Reaction::stays(M::N),
        (M::Silver, E::Red) => Reaction::stays(M::O),
        (M::Silver, E::Black) => Reaction::destroyed(1),

        (M::Dark, E::Plain) => Reaction::stays(M::Dark),
        (M::Dark, _) => Reaction::destroyed(1),

        (M::Gold, _) => Reaction::destroyed(2),

        (M::Blue, _) => Reaction::releases(BubbleKind::Blue),
        (M::Red, _) => Reaction::releases(BubbleKind::Red),
        (M::Black, _) => Reaction::releases(BubbleKind::Black),
        (M::Green, _) => Reaction::releases(BubbleKind::Green),
        (M::Purple, _) => Reaction::releases(BubbleKind::Purple),

        (M::Man, _) => Reaction {
            next: None,
            reward: Reward {
                score: 0,
                spawn_bubble: None,
                spawn_bot: true,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use BoxMaterial as M;
    use ExplosionKind as E;

    const KINDS: [ExplosionKind; 3] = [E::Plain, E::Red, E::Black];

    #[test]
    fn test_degrading_tiers() {
        assert_eq!(react(M::N, E::Plain).next, Some(M::O));
        assert_eq!(react(M::Silver, E::Plain).next, Some(M::N));
        assert_eq!(react(M::Silver, E::Red).next, Some(M::O));
        assert!(react(M::Silver, E::Black).is_destroyed());
        assert!(react(M::N, E::Red).is_destroyed());
        assert!(react(M::N, E::Black).is_destroyed());
    }

    #[test]
    fn test_dark_ignores_plain() {
        let r = react(M::Dark, E::Plain);
        assert_eq!(r.next, Some(M::Dark));
        assert_eq!(r.reward, Reward::default());
        assert!(react(M::Dark, E::Red).is_destroyed());
        assert!(react(M::Dark, E::Black).is_destroyed());
    }

    #[test]
    fn test_gold_pays_double() {
        for kind in KINDS {
            assert_eq!(react(M::Gold, kind), Reaction::destroyed(2));
        }
    }

    #[test]
    fn test_elemental_boxes_release_matching_bubble() {
        let pairs = [
            (M::Blue, BubbleKind::Blue),
            (M::Red, BubbleKind::Red),
            (M::Black, BubbleKind::Black),
            (M::Green, BubbleKind::Green),
            (M::Purple, BubbleKind::Purple),
        ];
        for (material, bubble) in pairs {
            for kind in KINDS {
                let r = react(material, kind);
                assert!(r.is_destroyed());
                assert_eq!(r.reward.spawn_bubble, Some(bubble));
                assert_eq!(r.reward.score, 1);
            }
        }
    }

    #[test]
    fn test_man_releases_bot_without_score() {
        for kind in KINDS {
            let r = react(M::Man, kind);
            assert!(r.is_destroyed());
            assert!(r.reward.spawn_bot);
            assert_eq!(r.reward.score, 0);
        }
    }

    proptest! {
        #[test]
        fn prop_score_only_on_destruction(m in 0usize..11, k in 0usize..3) {
            let r = react(M::ALL[m], KINDS[k]);
            if r.next.is_some() {
                prop_assert_eq!(r.reward, Reward::default());
            }
            prop_assert!(r.reward.score >= 0 && r.reward.score <= 2);
            prop_assert!(!(r.reward.spawn_bot && r.reward.spawn_bubble.is_some()));
        }
    }
}
