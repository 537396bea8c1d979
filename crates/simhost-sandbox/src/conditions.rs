#![forbid(unsafe_code)]

//! Battle conditions: unit types, unit placements, and tuning variables.
//!
//! Conditions are read from and written to JSON files with the shape
//!
//! ```json
//! { "general_variables": { ... }, "unit_types": [ ... ], "units": [ ... ] }
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tuning shared by every unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralVariables {
    pub random0: u16,
    pub random1: u16,
    /// Squared distance within which combatants fight hand to hand.
    pub attack_melee_dsq: u16,
    pub declare_group_facing_dsq: u16,
    pub declare_max_start_dsq: u16,
    pub declare_one_to_one_dsq: u16,
    pub declare_close_enough_dsq: u16,
}

impl Default for GeneralVariables {
    fn default() -> Self {
        Self {
            random0: 58668,
            random1: 8717,
            attack_melee_dsq: 5,
            declare_group_facing_dsq: 8000,
            declare_max_start_dsq: 0xFFFF,
            declare_one_to_one_dsq: 0xFFFF,
            declare_close_enough_dsq: 5,
        }
    }
}

impl GeneralVariables {
    /// Store a 32-bit seed in the two random words.
    pub fn set_seed(&mut self, seed: u32) {
        self.random0 = (seed & 0xFFFF) as u16;
        self.random1 = (seed >> 16) as u16;
    }

    /// The seed stored in the two random words.
    pub fn seed(&self) -> u32 {
        u32::from(self.random0) | (u32::from(self.random1) << 16)
    }
}

/// Fighting characteristics of one kind of unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitType {
    pub defence: u8,
    pub melee_attack: u8,
    pub melee_damage: u8,
    pub melee_armpie: u8,
    pub missile_attack: u8,
    pub missile_damage: u8,
    pub missile_armpie: u8,
    pub missile_rate: u8,
    pub missile_range: u16,
    pub speed_maximum: u8,
    pub stature: u8,
    pub leadership: u8,
    pub wounds_per_combatant: u8,
    pub type_id: u8,
}

/// Placement of one unit at the start of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub type_id: u8,
    /// Combatants per rank.
    pub width: u16,
    /// Center of the formation on the board.
    pub average: [u16; 2],
    /// Facing, a full turn is 256.
    pub angle: u8,
    pub number_combatants: u16,
    /// Side, 0 or 1.
    pub alignment: u8,
    pub missile_number: u8,
}

/// A complete battle setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub general_variables: GeneralVariables,
    pub unit_types: Vec<UnitType>,
    pub units: Vec<UnitPlacement>,
}

/// Failure to read, write, or accept a conditions file.
#[derive(Debug)]
pub enum ConditionsError {
    Io(io::Error),
    Json(serde_json::Error),
    /// The file parsed but describes an impossible battle.
    Invalid(String),
}

impl fmt::Display for ConditionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "conditions I/O error: {err}"),
            Self::Json(err) => write!(f, "conditions JSON error: {err}"),
            Self::Invalid(reason) => write!(f, "invalid conditions: {reason}"),
        }
    }
}

impl std::error::Error for ConditionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConditionsError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConditionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl Conditions {
    /// Parse and validate conditions from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConditionsError> {
        let conditions: Self = serde_json::from_str(text)?;
        conditions.validate()?;
        Ok(conditions)
    }

    /// Load conditions from a file.
    pub fn load(path: &Path) -> Result<Self, ConditionsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write conditions to a file as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConditionsError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Unit type with the given id.
    pub fn unit_type(&self, type_id: u8) -> Option<&UnitType> {
        self.unit_types.iter().find(|t| t.type_id == type_id)
    }

    /// Check that every unit can be placed.
    pub fn validate(&self) -> Result<(), ConditionsError> {
        if self.units.is_empty() {
            return Err(ConditionsError::Invalid("no units".into()));
        }
        for (index, unit) in self.units.iter().enumerate() {
            if self.unit_type(unit.type_id).is_none() {
                return Err(ConditionsError::Invalid(format!(
                    "unit {index} references unknown type {}",
                    unit.type_id
                )));
            }
            if unit.alignment > 1 {
                return Err(ConditionsError::Invalid(format!(
                    "unit {index} has alignment {}",
                    unit.alignment
                )));
            }
            if unit.width == 0 {
                return Err(ConditionsError::Invalid(format!("unit {index} has zero width")));
            }
        }
        for side in 0..=1 {
            if !self.units.iter().any(|u| u.alignment == side) {
                return Err(ConditionsError::Invalid(format!("side {side} has no units")));
            }
        }
        Ok(())
    }
}

impl Default for Conditions {
    /// The stock battle: three archer blocks and two cavalry wings against a
    /// larger host with a skirmisher screen.
    fn default() -> Self {
        let archers = unit_type(0, [4, 6, 3, 1], [3, 4, 1, 100], 40, [3, 4, 2, 3]);
        let levy = unit_type(1, [2, 3, 1, 1], [0, 0, 0, 0], 0, [4, 1, 2, 2]);
        let cavalry = unit_type(2, [4, 6, 2, 2], [0, 0, 0, 0], 0, [6, 2, 4, 3]);
        let skirmish = unit_type(3, [2, 7, 1, 3], [0, 0, 0, 0], 0, [7, 2, 3, 1]);

        Self {
            general_variables: GeneralVariables::default(),
            unit_types: vec![archers, levy, cavalry, skirmish],
            units: vec![
                unit(0, 28, [100, 200], 120, 480, 0, 20),
                unit(0, 28, [100, 400], 128, 480, 0, 20),
                unit(0, 28, [100, 600], 136, 480, 0, 20),
                unit(2, 10, [250, 400], 128, 100, 0, 0),
                unit(2, 10, [265, 200], 128, 100, 0, 0),
                unit(0, 50, [500, 200], 0, 600, 1, 20),
                unit(2, 35, [500, 600], 0, 100, 1, 0),
                unit(0, 40, [700, 600], 0, 600, 1, 20),
                unit(3, 40, [600, 600], 0, 200, 1, 0),
            ],
        }
    }
}

/// `melee` is defence, attack, damage, armour piercing. `missile` is
/// attack, damage, armour piercing, rate. `body` is speed, stature,
/// leadership, wounds.
fn unit_type(type_id: u8, melee: [u8; 4], missile: [u8; 4], range: u16, body: [u8; 4]) -> UnitType {
    UnitType {
        defence: melee[0],
        melee_attack: melee[1],
        melee_damage: melee[2],
        melee_armpie: melee[3],
        missile_attack: missile[0],
        missile_damage: missile[1],
        missile_armpie: missile[2],
        missile_rate: missile[3],
        missile_range: range,
        speed_maximum: body[0],
        stature: body[1],
        leadership: body[2],
        wounds_per_combatant: body[3],
        type_id,
    }
}

fn unit(
    type_id: u8,
    width: u16,
    average: [u16; 2],
    angle: u8,
    number_combatants: u16,
    alignment: u8,
    missile_number: u8,
) -> UnitPlacement {
    UnitPlacement {
        type_id,
        width,
        average,
        angle,
        number_combatants,
        alignment,
        missile_number,
    }
}
