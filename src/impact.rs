//! Projected physical impact of pushes
//!
//! Straight multiplication by tuning constants. The "global" figures are a
//! fixed mock base plus the local profile's own count.

use serde::Serialize;

/// Force applied per push (newtons)
pub const FORCE_PER_PUSH_N: f64 = 500.0;
/// Campus displacement per push (meters)
pub const DISTANCE_PER_PUSH_M: f64 = 0.0000245;
/// Distance from the campuses to Marunouchi (meters)
pub const GOAL_DISTANCE_M: f64 = 45_000.0;
/// Energy burned per push (kcal)
pub const KCAL_PER_PUSH: f64 = 0.5;

/// Buildings across all three campuses
pub const TOTAL_BUILDINGS: u32 = 51;
/// Average mass per building (kg)
pub const MASS_PER_BUILDING_KG: f64 = 2.0e7;

/// Mock aggregate for all other operatives
pub const MOCK_BASE_PUSHES: u64 = 15_840_200;
pub const MOCK_ACTIVE_OPERATIVES: u64 = 9_421;

/// Total mass to be moved (kg)
pub fn total_mass_kg() -> f64 {
    TOTAL_BUILDINGS as f64 * MASS_PER_BUILDING_KG
}

/// Personal contribution for a push count
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Impact {
    pub pushes: u64,
    pub force_newtons: f64,
    pub distance_meters: f64,
    pub calories_kcal: f64,
}

impl Impact {
    pub fn from_pushes(pushes: u64) -> Self {
        let n = pushes as f64;
        Self {
            pushes,
            force_newtons: n * FORCE_PER_PUSH_N,
            distance_meters: n * DISTANCE_PER_PUSH_M,
            calories_kcal: n * KCAL_PER_PUSH,
        }
    }

    pub fn force_kilonewtons(&self) -> f64 {
        self.force_newtons / 1000.0
    }

    pub fn distance_millimeters(&self) -> f64 {
        self.distance_meters * 1000.0
    }
}

/// Campaign-wide totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CampaignStatus {
    pub global_pushes: u64,
    pub global_distance_meters: f64,
    /// Share of the goal distance covered (percent, unclamped)
    pub progress_percent: f64,
    pub active_operatives: u64,
}

impl CampaignStatus {
    /// Mock base plus the local operative's pushes
    pub fn with_personal(personal_pushes: u64) -> Self {
        let global_pushes = MOCK_BASE_PUSHES.saturating_add(personal_pushes);
        let global_distance_meters = global_pushes as f64 * DISTANCE_PER_PUSH_M;
        Self {
            global_pushes,
            global_distance_meters,
            progress_percent: global_distance_meters / GOAL_DISTANCE_M * 100.0,
            active_operatives: MOCK_ACTIVE_OPERATIVES,
        }
    }

    /// Pushes still needed to reach the goal at the current rate
    pub fn pushes_remaining(&self) -> u64 {
        let needed = (GOAL_DISTANCE_M / DISTANCE_PER_PUSH_M).ceil() as u64;
        needed.saturating_sub(self.global_pushes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_pushes() {
        let impact = Impact::from_pushes(0);
        assert_eq!(impact.force_newtons, 0.0);
        assert_eq!(impact.distance_meters, 0.0);
        assert_eq!(impact.calories_kcal, 0.0);
    }

    #[test]
    fn test_personal_impact() {
        let impact = Impact::from_pushes(100);
        assert_eq!(impact.force_kilonewtons(), 50.0);
        assert!((impact.distance_millimeters() - 2.45).abs() < 1e-9);
        assert_eq!(impact.calories_kcal, 50.0);
    }

    #[test]
    fn test_millimeter_medal_math() {
        // 41 pushes is the first count that moves the campus a full millimeter
        assert!(Impact::from_pushes(40).distance_millimeters() < 1.0);
        assert!(Impact::from_pushes(41).distance_millimeters() >= 1.0);
    }

    #[test]
    fn test_campaign_status() {
        let status = CampaignStatus::with_personal(0);
        assert_eq!(status.global_pushes, MOCK_BASE_PUSHES);
        assert!((status.global_distance_meters - 388.0849).abs() < 1e-3);
        assert!((status.progress_percent - 0.862411).abs() < 1e-5);
        assert_eq!(status.active_operatives, 9_421);

        let more = CampaignStatus::with_personal(1_000);
        assert_eq!(more.global_pushes, MOCK_BASE_PUSHES + 1_000);
        assert!(more.pushes_remaining() < status.pushes_remaining());
    }

    #[test]
    fn test_total_mass() {
        assert!((total_mass_kg() - 1.02e9).abs() < 1.0);
    }
}
