use serde::{Deserialize, Serialize};

/// Tuning constants for an encounter. Hosts can deserialize this from JSON
/// or take the defaults; every session clones its own copy at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// AP cost per path segment of a move; total cost is
    /// `max(1, segments) * move_ap_per_segment`.
    pub move_ap_per_segment: u32,
    /// Flat AP cost of one attack.
    pub attack_ap_cost: u32,
    /// Base damage of an attack before the strength bonus.
    pub attack_base_damage: u32,
    /// Size of the initiative die; each combat entry rolls `1..=die`.
    pub initiative_die: u32,
    /// Hunger and thirst decay by one every this many exploration ticks.
    /// Zero disables decay.
    pub needs_decay_interval: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            move_ap_per_segment: 1,
            attack_ap_cost: 2,
            attack_base_damage: 2,
            initiative_die: 10,
            needs_decay_interval: 50,
        }
    }
}

impl CombatConfig {
    pub fn move_cost(&self, segments: usize) -> u32 {
        (segments.max(1) as u32) * self.move_ap_per_segment
    }
}
