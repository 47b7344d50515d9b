//! Conversions between serialized and in-game numbers
//!
//! The game stores item power and player experience on a compressed internal
//! scale. These functions map between that scale and the values shown to the
//! player, and compute the points an enchantment level costs.

/// Fixed-point precision of serialized power values (five decimal digits).
const POWER_PRECISION: f64 = 100_000.0;

/// Precision of in-game level values (four decimal digits).
const LEVEL_PRECISION: f64 = 10_000.0;

/// Per-level enchantment cost tables, indexed by [`cost_table`].
const COST_TABLES: [[u32; 3]; 4] = [
    [1, 2, 3], // normal
    [2, 3, 4], // powerful
    [2, 3, 4], // gilded
    [3, 4, 5], // powerful + gilded
];

/// Highest level a normal enchantment slot can hold.
pub const MAX_ENCHANTMENT_LEVEL: u32 = COST_TABLES[0].len() as u32;

/// Convert a serialized power value to the power shown in game.
///
/// Values below 1 are treated as 1.
pub fn power_to_in_game(serialized: f64) -> f64 {
    (serialized.max(1.0) - 1.0) * 10.0 + 1.0
}

/// Convert an in-game power value to its serialized form.
///
/// Non-positive input maps to 0. The result is rounded to five decimal digits,
/// which is the precision the game writes.
pub fn power_to_serialized(in_game: f64) -> f64 {
    if in_game <= 0.0 {
        return 0.0;
    }
    let raw = ((in_game.max(1.0) - 1.0) / 10.0 + 1.0) * POWER_PRECISION;
    raw.round() / POWER_PRECISION
}

/// Convert a serialized experience value to the player level shown in game.
///
/// Negative experience is treated as 0 (level 1).
pub fn level_to_in_game(xp: i64) -> f64 {
    let xp = xp.max(0) as f64;
    let level = ((3.0 * xp + 100.0).sqrt() + 20.0) / 30.0;
    (level * LEVEL_PRECISION).round() / LEVEL_PRECISION
}

/// Convert an in-game level to the serialized experience value.
///
/// Levels below 1 are treated as 1.
pub fn level_to_serialized(level: f64) -> i64 {
    let level = level.max(1.0);
    (100.0 * (level - 1.0) * (3.0 * level - 1.0)).round() as i64
}

fn cost_table(powerful: bool, gilded: bool) -> &'static [u32; 3] {
    match (powerful, gilded) {
        (false, false) => &COST_TABLES[0],
        (true, false) => &COST_TABLES[1],
        (false, true) => &COST_TABLES[2],
        (true, true) => &COST_TABLES[3],
    }
}

/// Points invested in a normal enchantment slot at `level`.
///
/// `gilded` is whether the holding item carries an active netherite
/// enchantment. Levels past the table length cost the full table.
pub fn invested_points(level: u32, powerful: bool, gilded: bool) -> u32 {
    cost_table(powerful, gilded)
        .iter()
        .take(level as usize)
        .sum()
}
