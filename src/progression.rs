//! Rank and achievement progression
//!
//! Both tables are static. Everything here is a pure function of the
//! cumulative push count; there is no unlock history.

use serde::Serialize;

/// One rung of the rank ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankDefinition {
    pub threshold: u64,
    pub title: &'static str,
}

/// A medal unlocked at a push count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub threshold: u64,
    pub title: &'static str,
    pub description: &'static str,
}

/// Rank ladder, thresholds strictly increasing from 0
pub const RANKS: &[RankDefinition] = &[
    RankDefinition { threshold: 0, title: "訓練生 (Trainee)" },
    RankDefinition { threshold: 10, title: "二等兵 (Private)" },
    RankDefinition { threshold: 50, title: "上等兵 (Private First Class)" },
    RankDefinition { threshold: 100, title: "伍長 (Corporal)" },
    RankDefinition { threshold: 500, title: "軍曹 (Sergeant)" },
    RankDefinition { threshold: 1000, title: "少尉 (Second Lieutenant)" },
    RankDefinition { threshold: 5000, title: "大尉 (Captain)" },
    RankDefinition { threshold: 10000, title: "少佐 (Major)" },
    RankDefinition { threshold: 50000, title: "大佐 (Colonel)" },
    RankDefinition { threshold: 100000, title: "将軍 (General)" },
];

/// Medals in display order (not sorted by threshold)
pub const ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "first_step",
        threshold: 1,
        title: "最初の一歩",
        description: "物理的移動を開始した。",
    },
    AchievementDefinition {
        id: "kilo_pusher",
        threshold: 100,
        title: "センチュリオン",
        description: "100回の推力を供給した。",
    },
    AchievementDefinition {
        id: "millimeter",
        threshold: 41,
        title: "1ミリの奇跡",
        description: "計算上、キャンパスを1mm動かした (約41回)。",
    },
    AchievementDefinition {
        id: "dedication",
        threshold: 500,
        title: "忠実なる推進者",
        description: "500回の貢献を達成。",
    },
    AchievementDefinition {
        id: "elite",
        threshold: 1000,
        title: "エリート工作員",
        description: "1000回達成。もはや趣味ではない。",
    },
    AchievementDefinition {
        id: "legend",
        threshold: 10000,
        title: "伝説の英雄",
        description: "1万回達成。銅像が立つレベル。",
    },
];

/// Highest rank whose threshold is <= `total`
pub fn get_rank(total: u64) -> RankDefinition {
    RANKS
        .iter()
        .rev()
        .find(|r| r.threshold <= total)
        .copied()
        .unwrap_or(RANKS[0])
}

/// Lowest rank whose threshold is > `total`, None at the top of the ladder
pub fn get_next_rank(total: u64) -> Option<RankDefinition> {
    RANKS.iter().find(|r| r.threshold > total).copied()
}

/// Progress through the current rank band, in [0, 100]
pub fn rank_progress(total: u64) -> f64 {
    let Some(next) = get_next_rank(total) else {
        return 100.0;
    };
    let current = get_rank(total);
    let span = (next.threshold - current.threshold) as f64;
    let done = total.saturating_sub(current.threshold) as f64;
    (done / span * 100.0).clamp(0.0, 100.0)
}

pub fn unlocked_achievements(total: u64) -> Vec<AchievementDefinition> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| a.threshold <= total)
        .copied()
        .collect()
}

pub fn locked_achievements(total: u64) -> Vec<AchievementDefinition> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| a.threshold > total)
        .copied()
        .collect()
}

/// Everything the stats view shows for one push count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    pub total: u64,
    pub rank: RankDefinition,
    pub next_rank: Option<RankDefinition>,
    pub progress_percent: f64,
    pub unlocked: Vec<AchievementDefinition>,
    pub locked: Vec<AchievementDefinition>,
}

impl Progression {
    pub fn for_count(total: u64) -> Self {
        Self {
            total,
            rank: get_rank(total),
            next_rank: get_next_rank(total),
            progress_percent: rank_progress(total),
            unlocked: unlocked_achievements(total),
            locked: locked_achievements(total),
        }
    }

    /// Pushes still needed for the next rank
    pub fn remaining(&self) -> Option<u64> {
        self.next_rank.map(|r| r.threshold - self.total)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tables_well_formed() {
        assert_eq!(RANKS[0].threshold, 0);
        assert!(RANKS.windows(2).all(|w| w[0].threshold < w[1].threshold));

        let mut ids: Vec<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn test_rank_at_zero() {
        assert_eq!(get_rank(0), RANKS[0]);
    }

    #[test]
    fn test_rank_at_exact_threshold() {
        for rank in RANKS {
            assert_eq!(get_rank(rank.threshold), *rank);
        }
        assert_eq!(get_rank(9).title, "訓練生 (Trainee)");
        assert_eq!(get_rank(10).title, "二等兵 (Private)");
    }

    #[test]
    fn test_next_rank() {
        assert_eq!(get_next_rank(0).map(|r| r.threshold), Some(10));
        assert_eq!(get_next_rank(10).map(|r| r.threshold), Some(50));
        assert_eq!(get_next_rank(99_999).map(|r| r.threshold), Some(100_000));
        assert_eq!(get_next_rank(100_000), None);
        assert_eq!(get_next_rank(u64::MAX), None);
    }

    #[test]
    fn test_rank_progress_values() {
        assert_eq!(rank_progress(0), 0.0);
        assert_eq!(rank_progress(5), 50.0);
        assert_eq!(rank_progress(10), 0.0);
        assert_eq!(rank_progress(30), 50.0);
        assert_eq!(rank_progress(100_000), 100.0);
        assert_eq!(rank_progress(2_000_000), 100.0);
    }

    #[test]
    fn test_unlocked_achievements() {
        assert!(unlocked_achievements(0).is_empty());

        let ids: Vec<_> = unlocked_achievements(41).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first_step", "millimeter"]);

        let ids: Vec<_> = unlocked_achievements(100).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first_step", "kilo_pusher", "millimeter"]);

        assert_eq!(unlocked_achievements(10_000).len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn test_progression_snapshot() {
        let p = Progression::for_count(42);
        assert_eq!(p.rank.title, "二等兵 (Private)");
        assert_eq!(p.remaining(), Some(8));
        assert!(p.is_unlocked("millimeter"));
        assert!(!p.is_unlocked("kilo_pusher"));
        assert_eq!(p.unlocked.len() + p.locked.len(), ACHIEVEMENTS.len());
    }

    proptest! {
        #[test]
        fn prop_rank_threshold_le_count(total in 0u64..1_000_000) {
            let rank = get_rank(total);
            prop_assert!(rank.threshold <= total);
            if let Some(next) = get_next_rank(total) {
                prop_assert!(next.threshold > total);
                prop_assert!(next.threshold > rank.threshold);
            }
        }

        #[test]
        fn prop_next_rank_none_iff_at_max(total in 0u64..1_000_000) {
            let max = RANKS.last().unwrap().threshold;
            prop_assert_eq!(get_next_rank(total).is_none(), total >= max);
        }

        #[test]
        fn prop_progress_bounded(total in any::<u64>()) {
            let p = rank_progress(total);
            prop_assert!((0.0..=100.0).contains(&p));
        }

        #[test]
        fn prop_progress_monotonic_within_band(total in 0u64..200_000) {
            if get_rank(total) == get_rank(total + 1) {
                prop_assert!(rank_progress(total + 1) >= rank_progress(total));
            }
        }

        #[test]
        fn prop_unlocked_grows(total in 0u64..20_000) {
            prop_assert!(unlocked_achievements(total + 1).len() >= unlocked_achievements(total).len());
        }
    }
}
