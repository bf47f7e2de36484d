use crate::logic::board::{Team, Unit};
use crate::logic::catalog::ROSTER;

/// Mints unit instances. Ids increase monotonically and are never reused for
/// the lifetime of the generator.
#[derive(Debug)]
pub struct TeamGenerator {
    next_id: u32,
}

impl Default for TeamGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 1 }
    }

    /// One unit per archetype, in roster order, laid out along `row`.
    pub fn generate(&mut self, team: Team, row: i32) -> Vec<Unit> {
        ROSTER
            .iter()
            .zip(0..)
            .map(|(archetype, col)| {
                let id = self.next_id;
                self.next_id += 1;
                Unit::spawn(id, archetype, team, col, row)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_across_teams() {
        let mut generator = TeamGenerator::new();
        let a = generator.generate(Team::A, 0);
        let b = generator.generate(Team::B, 7);

        let ids: Vec<u32> = a.iter().chain(b.iter()).map(|u| u.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.first(), Some(&1));
    }

    #[test]
    fn units_start_fresh() {
        let mut generator = TeamGenerator::new();
        for (col, unit) in generator.generate(Team::B, 7).iter().enumerate() {
            let archetype = &ROSTER[col];
            assert_eq!(unit.name, archetype.name);
            assert_eq!(unit.x, i32::try_from(col).expect("small index"));
            assert_eq!(unit.y, 7);
            assert_eq!(unit.hp, archetype.max_hp);
            assert_eq!(unit.moves_left, archetype.move_range);
            assert!(!unit.has_attacked);
            assert_eq!(unit.team, Team::B);
        }
    }
}
