#![forbid(unsafe_code)]

//! Battle state and the per-tick rules.
//!
//! Each tick runs three phases in order:
//!
//! 1. Missile volleys from units with ammunition at the nearest enemy in range.
//! 2. Movement: every unengaged combatant closes on the nearest enemy unit.
//! 3. Melee between opposing combatants within the melee distance.
//!
//! Dead combatants leave the board at the end of the tick. The battle is
//! over when one side is wiped out or nothing has happened for a few ticks.

use std::f64::consts::TAU;

use rand::Rng;

use crate::board::{Board, Slot};
use crate::conditions::{Conditions, ConditionsError, GeneralVariables, UnitType};
use crate::view::BoardRect;

/// Ticks without movement or combat before the battle is called.
const STALEMATE_TICKS: u32 = 6;

/// Missile range is in board cells times this factor.
const MISSILE_RANGE_SCALE: i64 = 4;

/// One fighter on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combatant {
    pub x: i32,
    pub y: i32,
    pub wounds: u8,
    pub engaged: bool,
    on_board: bool,
}

impl Combatant {
    pub fn is_alive(&self) -> bool {
        self.wounds > 0
    }
}

/// A formation of combatants sharing a type and side.
#[derive(Debug, Clone)]
pub struct Unit {
    pub alignment: u8,
    pub kind: UnitType,
    pub combatants: Vec<Combatant>,
    pub selected: bool,
    pub missiles: u8,
    missile_timer: u16,
}

impl Unit {
    pub fn living(&self) -> usize {
        self.combatants.iter().filter(|c| c.is_alive()).count()
    }

    /// Mean position of living combatants.
    pub fn centroid(&self) -> Option<(i32, i32)> {
        let (mut sx, mut sy, mut n) = (0i64, 0i64, 0i64);
        for c in self.combatants.iter().filter(|c| c.is_alive()) {
            sx += i64::from(c.x);
            sy += i64::from(c.y);
            n += 1;
        }
        (n > 0).then(|| ((sx / n) as i32, (sy / n) as i32))
    }

    /// Whether any living combatant lies inside `rect`.
    pub fn intersects(&self, rect: BoardRect) -> bool {
        self.combatants
            .iter()
            .any(|c| c.is_alive() && rect.contains(c.x, c.y))
    }
}

#[derive(Debug, Clone)]
pub struct Battle {
    units: Vec<Unit>,
    board: Board,
    vars: GeneralVariables,
    still_ticks: u32,
    ticks: u64,
}

impl Battle {
    /// Lay out every unit of `conditions` on a fresh board.
    pub fn new<R: Rng + ?Sized>(conditions: &Conditions, rng: &mut R) -> Result<Self, ConditionsError> {
        conditions.validate()?;
        let mut board = Board::new();
        let mut units = Vec::with_capacity(conditions.units.len());

        for (unit_index, placement) in conditions.units.iter().enumerate() {
            let Some(kind) = conditions.unit_type(placement.type_id).copied() else {
                continue;
            };
            let spacing = 1.0 + f64::from(kind.stature / 2);
            let theta = f64::from(placement.angle) * TAU / 256.0;
            let (facing_x, facing_y) = (theta.cos(), theta.sin());
            let (flank_x, flank_y) = (-facing_y, facing_x);
            let width = usize::from(placement.width);
            let mut combatants = Vec::with_capacity(usize::from(placement.number_combatants));

            for n in 0..usize::from(placement.number_combatants) {
                let column = (n % width) as f64 - (width as f64 - 1.0) / 2.0;
                let rank = (n / width) as f64;
                // Small jitter keeps ranks from looking ruled.
                let jitter = rng.random_range(-0.4..0.4);
                let x = f64::from(placement.average[0])
                    + (column * flank_x - rank * facing_x) * spacing
                    + jitter;
                let y = f64::from(placement.average[1])
                    + (column * flank_y - rank * facing_y) * spacing
                    + jitter;
                let slot = Slot {
                    unit: unit_index as u16,
                    combatant: combatants.len() as u16,
                };
                let Some((px, py)) = board.place(x.round() as i32, y.round() as i32, slot) else {
                    continue;
                };
                combatants.push(Combatant {
                    x: px,
                    y: py,
                    wounds: kind.wounds_per_combatant.max(1),
                    engaged: false,
                    on_board: true,
                });
            }

            units.push(Unit {
                alignment: placement.alignment,
                kind,
                combatants,
                selected: false,
                missiles: placement.missile_number,
                missile_timer: 0,
            });
        }

        Ok(Self {
            units,
            board,
            vars: conditions.general_variables,
            still_ticks: 0,
            ticks: 0,
        })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Living combatants per side.
    pub fn scorecard(&self) -> [usize; 2] {
        let mut score = [0; 2];
        for unit in &self.units {
            score[usize::from(unit.alignment.min(1))] += unit.living();
        }
        score
    }

    pub fn is_over(&self) -> bool {
        let [a, b] = self.scorecard();
        a == 0 || b == 0 || self.still_ticks > STALEMATE_TICKS
    }

    /// Select the units with a living combatant inside `rect`.
    ///
    /// When `extend` is false the previous selection is replaced.
    pub fn select_in(&mut self, rect: BoardRect, extend: bool) -> usize {
        let mut count = 0;
        for unit in &mut self.units {
            let hit = unit.intersects(rect);
            if hit {
                count += 1;
            }
            unit.selected = hit || (extend && unit.selected);
        }
        count
    }

    /// Select exactly one unit.
    pub fn select_only(&mut self, index: usize) {
        for (i, unit) in self.units.iter_mut().enumerate() {
            unit.selected = i == index;
        }
    }

    /// Advance the battle by one tick.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.ticks += 1;
        let fired = self.volley(rng);
        let moved = self.advance();
        let struck = self.melee(rng);
        self.bury();

        if moved == 0 && struck == 0 && fired == 0 {
            self.still_ticks += 1;
        } else {
            self.still_ticks = 0;
        }
    }

    /// Index of the nearest enemy unit by centroid, with squared distance.
    fn nearest_enemy(&self, index: usize) -> Option<(usize, i64)> {
        let unit = &self.units[index];
        let (ux, uy) = unit.centroid()?;
        self.units
            .iter()
            .enumerate()
            .filter(|(_, other)| other.alignment != unit.alignment)
            .filter_map(|(i, other)| {
                let (ox, oy) = other.centroid()?;
                let (dx, dy) = (i64::from(ox - ux), i64::from(oy - uy));
                Some((i, dx * dx + dy * dy))
            })
            .min_by_key(|&(_, dsq)| dsq)
    }

    fn volley<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut hits = 0;
        for index in 0..self.units.len() {
            let kind = self.units[index].kind;
            if self.units[index].missiles == 0 || kind.missile_attack == 0 || kind.missile_rate == 0 {
                continue;
            }
            let unit = &mut self.units[index];
            unit.missile_timer += u16::from(kind.missile_rate);
            if unit.missile_timer < 256 {
                continue;
            }
            unit.missile_timer -= 256;

            let Some((target, dsq)) = self.nearest_enemy(index) else {
                continue;
            };
            let range = i64::from(kind.missile_range) * MISSILE_RANGE_SCALE;
            if dsq > range * range {
                continue;
            }
            self.units[index].missiles -= 1;

            let shots = self.units[index].living().div_ceil(10);
            for _ in 0..shots {
                if rng.random_range(0..10) >= kind.missile_attack {
                    continue;
                }
                let defence = self.units[target].kind.defence.saturating_sub(kind.missile_armpie);
                if rng.random_range(0..10) < defence {
                    continue;
                }
                let living: Vec<usize> = self.units[target]
                    .combatants
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_alive())
                    .map(|(i, _)| i)
                    .collect();
                if living.is_empty() {
                    break;
                }
                let victim = living[rng.random_range(0..living.len())];
                let c = &mut self.units[target].combatants[victim];
                c.wounds = c.wounds.saturating_sub(kind.missile_damage.max(1));
                hits += 1;
            }
        }
        hits
    }

    fn advance(&mut self) -> usize {
        let targets: Vec<Option<(i32, i32)>> = (0..self.units.len())
            .map(|i| {
                self.nearest_enemy(i)
                    .and_then(|(target, _)| self.units[target].centroid())
            })
            .collect();

        let mut moved = 0;
        for (unit, target) in self.units.iter_mut().zip(targets) {
            let Some((tx, ty)) = target else {
                continue;
            };
            let speed = f64::from(unit.kind.speed_maximum);
            for c in unit.combatants.iter_mut() {
                if !c.is_alive() || c.engaged {
                    continue;
                }
                let (dx, dy) = (f64::from(tx - c.x), f64::from(ty - c.y));
                let distance = dx.hypot(dy);
                if distance < 1.0 {
                    continue;
                }
                let stride = speed.min(distance);
                let nx = c.x + (dx / distance * stride).round() as i32;
                let ny = c.y + (dy / distance * stride).round() as i32;
                if self.board.move_to((c.x, c.y), (nx, ny)) {
                    c.x = nx;
                    c.y = ny;
                    moved += 1;
                }
            }
        }
        moved
    }

    fn melee<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let dsq = i32::from(self.vars.attack_melee_dsq);
        let reach = (f64::from(dsq)).sqrt() as i32;
        let mut blows: Vec<((usize, usize), Slot)> = Vec::new();

        for (ui, unit) in self.units.iter().enumerate() {
            for (ci, c) in unit.combatants.iter().enumerate() {
                if !c.is_alive() {
                    continue;
                }
                'search: for dy in -reach..=reach {
                    for dx in -reach..=reach {
                        if dx * dx + dy * dy > dsq {
                            continue;
                        }
                        let Some(slot) = self.board.get(c.x + dx, c.y + dy) else {
                            continue;
                        };
                        let foe = &self.units[usize::from(slot.unit)];
                        if foe.alignment != unit.alignment
                            && foe.combatants[usize::from(slot.combatant)].is_alive()
                        {
                            blows.push(((ui, ci), slot));
                            break 'search;
                        }
                    }
                }
            }
        }

        for unit in &mut self.units {
            for c in &mut unit.combatants {
                c.engaged = false;
            }
        }

        let mut struck = 0;
        for ((ui, ci), slot) in blows {
            let attacker = self.units[ui].kind;
            self.units[ui].combatants[ci].engaged = true;
            let defender_unit = &mut self.units[usize::from(slot.unit)];
            let defence = defender_unit.kind.defence.saturating_sub(attacker.melee_armpie);
            let defender = &mut defender_unit.combatants[usize::from(slot.combatant)];
            defender.engaged = true;
            let odds = u32::from(attacker.melee_attack) + u32::from(defence);
            if odds == 0 || rng.random_range(0..odds) >= u32::from(attacker.melee_attack) {
                continue;
            }
            defender.wounds = defender.wounds.saturating_sub(attacker.melee_damage.max(1));
            struck += 1;
        }
        struck
    }

    fn bury(&mut self) {
        for unit in &mut self.units {
            for c in &mut unit.combatants {
                if c.on_board && !c.is_alive() {
                    self.board.clear(c.x, c.y);
                    c.on_board = false;
                    c.engaged = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::UnitPlacement;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn skirmish(gap: u16) -> Conditions {
        let mut conditions = Conditions::default();
        conditions.units = vec![
            UnitPlacement {
                type_id: 1,
                width: 4,
                average: [400, 300],
                angle: 0,
                number_combatants: 8,
                alignment: 0,
                missile_number: 0,
            },
            UnitPlacement {
                type_id: 1,
                width: 4,
                average: [400 + gap, 300],
                angle: 128,
                number_combatants: 8,
                alignment: 1,
                missile_number: 0,
            },
        ];
        conditions
    }

    #[test]
    fn stock_battle_places_everyone() {
        let mut rng = SmallRng::seed_from_u64(1);
        let battle = Battle::new(&Conditions::default(), &mut rng).expect("valid");
        assert_eq!(battle.units().len(), 9);
        assert_eq!(battle.scorecard(), [1640, 1500]);
        assert!(!battle.is_over());
    }

    #[test]
    fn armies_close_distance() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut battle = Battle::new(&skirmish(100), &mut rng).expect("valid");
        let before = battle.units()[0].centroid().expect("alive").0;
        battle.step(&mut rng);
        let after = battle.units()[0].centroid().expect("alive").0;
        assert!(after > before, "{before} -> {after}");
    }

    #[test]
    fn melee_eventually_ends_the_battle() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut battle = Battle::new(&skirmish(12), &mut rng).expect("valid");
        for _ in 0..2_000 {
            if battle.is_over() {
                break;
            }
            battle.step(&mut rng);
        }
        assert!(battle.is_over());
        let [a, b] = battle.scorecard();
        assert!(a + b < 16);
    }

    #[test]
    fn selection_replaces_unless_extended() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut battle = Battle::new(&skirmish(100), &mut rng).expect("valid");
        let left = BoardRect::new(380, 280, 420, 320);
        let right = BoardRect::new(480, 280, 520, 320);
        assert_eq!(battle.select_in(left, false), 1);
        assert_eq!(battle.select_in(right, true), 1);
        assert!(battle.units().iter().all(|u| u.selected));
        battle.select_in(right, false);
        assert!(!battle.units()[0].selected);
        assert!(battle.units()[1].selected);
    }

    #[test]
    fn same_seed_same_battle() {
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut battle = Battle::new(&skirmish(20), &mut rng).expect("valid");
            for _ in 0..30 {
                battle.step(&mut rng);
            }
            battle.scorecard()
        };
        assert_eq!(run(11), run(11));
    }
}
