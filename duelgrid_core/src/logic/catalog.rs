/// Static stats shared by every unit of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitArchetype {
    pub name: &'static str,
    pub max_hp: u32,
    pub attack_power: u32,
    pub move_range: u32,
}

impl UnitArchetype {
    const fn new(name: &'static str, max_hp: u32, attack_power: u32, move_range: u32) -> Self {
        Self {
            name,
            max_hp,
            attack_power,
            move_range,
        }
    }
}

/// Roster in deployment order. A unit's starting column is its index here.
pub const ROSTER: [UnitArchetype; 8] = [
    UnitArchetype::new("Knight", 100, 30, 2),
    UnitArchetype::new("Archer", 80, 25, 3),
    UnitArchetype::new("Mage", 70, 40, 2),
    UnitArchetype::new("Healer", 90, 10, 2),
    UnitArchetype::new("Warrior", 110, 35, 1),
    UnitArchetype::new("Rogue", 75, 30, 4),
    UnitArchetype::new("Summoner", 65, 45, 2),
    UnitArchetype::new("Paladin", 95, 20, 1),
];

#[must_use]
pub fn archetype(name: &str) -> Option<&'static UnitArchetype> {
    ROSTER.iter().find(|a| a.name == name)
}
