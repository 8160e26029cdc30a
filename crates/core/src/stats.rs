use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u32,
    pub dexterity: u32,
    pub constitution: u32,
    pub intelligence: u32,
    pub perception: u32,
    pub charisma: u32,
}

impl Attributes {
    pub fn uniform(value: u32) -> Self {
        Self {
            strength: value,
            dexterity: value,
            constitution: value,
            intelligence: value,
            perception: value,
            charisma: value,
        }
    }
}

/// Resource pools. Current values never exceed their maximums and never go
/// below zero; all mutation goes through `StatBlock` operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vitals {
    pub hp: u32,
    pub max_hp: u32,
    pub ap: u32,
    pub max_ap: u32,
    pub hunger: u32,
    pub max_hunger: u32,
    pub thirst: u32,
    pub max_thirst: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatBlock {
    pub attributes: Attributes,
    pub vitals: Vitals,
    /// Rolled once per combat entry, before the roster is sorted.
    pub initiative: u32,
    /// Monotonic: flips false -> true exactly once, when hp reaches zero.
    pub is_dead: bool,
}

impl StatBlock {
    pub fn new(attributes: Attributes) -> Self {
        let max_hp = 10 + attributes.constitution * 2;
        let max_ap = 2 + attributes.dexterity / 2;
        let vitals = Vitals {
            hp: max_hp,
            max_hp,
            ap: max_ap,
            max_ap,
            hunger: 100,
            max_hunger: 100,
            thirst: 100,
            max_thirst: 100,
        };
        Self { attributes, vitals, initiative: 0, is_dead: false }
    }

    /// Subtract `amount` from hp, floored at zero. Returns true only on the
    /// call that crossed into death; later calls keep clamping but report
    /// nothing.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        self.vitals.hp = self.vitals.hp.saturating_sub(amount);
        if self.vitals.hp == 0 && !self.is_dead {
            self.is_dead = true;
            return true;
        }
        false
    }

    /// `initiative = dexterity + roll`, where `roll` is the session's die
    /// draw for this combat entry.
    pub fn roll_initiative(&mut self, roll: u32) {
        self.initiative = self.attributes.dexterity + roll;
    }

    pub fn spend_ap(&mut self, amount: u32) {
        self.vitals.ap = self.vitals.ap.saturating_sub(amount);
    }

    pub fn restore_ap(&mut self) {
        self.vitals.ap = self.vitals.max_ap;
    }

    /// Hunger and thirst tick down outside combat; neither has any combat
    /// effect beyond staying inside its bounds.
    pub fn decay_needs(&mut self) {
        self.vitals.hunger = self.vitals.hunger.saturating_sub(1);
        self.vitals.thirst = self.vitals.thirst.saturating_sub(1);
    }
}
