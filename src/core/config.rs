//! Acquisition tuning with documented constants
//!
//! All magic numbers used by the item search and pickup logic are collected
//! here with explanations of their purpose and how they interact.

use crate::core::types::Tick;

/// Tuning values for item search scoring and the pickup state machine
///
/// These values have been tuned to produce sensible crew behavior.
/// Changing them shifts which items agents prefer and how fast they commit.
#[derive(Debug, Clone)]
pub struct AcquireTuning {
    // === INTERACTION ===
    /// How close an agent must be to interact with an item or another agent
    /// (world units). Also used as the reach handed to navigation sub-tasks.
    pub default_reach: f32,

    // === DISTANCE SCORING ===
    /// Vertical distance below this is ignored entirely (world units)
    ///
    /// Decks of the same compartment differ by less than this, so an item
    /// one deck over costs nothing extra.
    pub vertical_slack: f32,

    /// Multiplier applied to vertical distance above `vertical_slack`
    ///
    /// Moving between decks means ladders and hatches, which is much slower
    /// than walking the same distance horizontally.
    pub vertical_penalty: f32,

    /// Combined distance at or below which an item scores the full
    /// distance factor of 1.0
    pub near_distance: f32,

    /// Combined distance at or beyond which the distance factor bottoms out
    pub far_distance: f32,

    /// Distance factor floor while scoring for combat
    ///
    /// In a fight a far-away weapon is still worth something, so the factor
    /// never reaches zero. Outside combat the floor is 0 and very distant
    /// items are effectively invisible to the search.
    pub combat_distance_floor: f32,

    // === CONTAINER SCORING ===
    /// Score multiplier for items nested inside an item inside an item
    ///
    /// A fuel rod inside a toolbox inside a cabinet takes two interactions
    /// to reach; prefer candidates that are at most one container deep.
    pub nested_container_penalty: f32,

    // === COMBAT SCORING ===
    /// Divisor normalizing a weapon's combat rating into a 0..1 factor
    pub combat_rating_scale: f32,

    /// Divisor normalizing estimated lethal damage into a factor
    pub lethal_damage_scale: f32,

    /// Cap on the lethal-damage fallback factor
    ///
    /// Items with no explicit combat rating can never out-score a rated
    /// weapon, no matter how much incidental damage they could deal.
    pub combat_fallback_cap: f32,

    // === SEARCH BUDGET ===
    /// Minimum registry entries inspected per tick
    pub min_scan_budget: f32,

    /// Maximum registry entries inspected per tick
    ///
    /// The budget is the objective's current priority clamped into
    /// [min, max]: urgent objectives search faster, but a single objective
    /// can never stall the tick on a huge registry.
    pub max_scan_budget: f32,

    /// Priority at or above which an objective counts as an active order
    ///
    /// Gates the per-candidate path check, which is expensive enough that it
    /// is only worth doing for order-level objectives.
    pub order_priority_floor: f32,

    // === PRESENTATION ===
    /// Minimum ticks between repeats of the same failure utterance
    pub speech_throttle: Tick,
}

impl Default for AcquireTuning {
    fn default() -> Self {
        Self {
            default_reach: 100.0,

            // Distance scoring
            vertical_slack: 100.0,
            vertical_penalty: 5.0,
            near_distance: 100.0,
            far_distance: 10_000.0,
            combat_distance_floor: 0.1,

            // Containers
            nested_container_penalty: 0.1,

            // Combat
            combat_rating_scale: 100.0,
            lethal_damage_scale: 1000.0,
            combat_fallback_cap: 0.1,

            // Search budget
            min_scan_budget: 10.0,
            max_scan_budget: 100.0,
            order_priority_floor: 60.0,

            // Presentation
            speech_throttle: 20,
        }
    }
}

impl AcquireTuning {
    /// Create a new tuning set with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate tuning for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.near_distance >= self.far_distance {
            return Err(format!(
                "near_distance ({}) must be < far_distance ({})",
                self.near_distance, self.far_distance
            ));
        }
        if self.min_scan_budget > self.max_scan_budget {
            return Err(format!(
                "min_scan_budget ({}) must be <= max_scan_budget ({})",
                self.min_scan_budget, self.max_scan_budget
            ));
        }
        if self.min_scan_budget < 1.0 {
            return Err("min_scan_budget must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.nested_container_penalty) {
            return Err("nested_container_penalty must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.combat_distance_floor) {
            return Err("combat_distance_floor must be within [0, 1]".into());
        }
        if self.default_reach <= 0.0 {
            return Err("default_reach must be positive".into());
        }
        Ok(())
    }
}
