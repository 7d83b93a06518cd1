//! Bundled "easy" sample set: arithmetic, geography and science trivia.

/// `(front, back)` pairs, in display order.
pub const EASY_SET: [(&str, &str); 20] = [
    ("2 + 2 = ?", "4"),
    ("Capital of France?", "Paris"),
    ("3 × 3 = ?", "9"),
    ("Opposite of hot?", "Cold"),
    ("Color of the sky?", "Blue (clear day)"),
    ("5 − 2 = ?", "3"),
    ("1 week = ? days", "7 days"),
    ("Largest planet?", "Jupiter"),
    ("H₂O is called?", "Water"),
    ("Square has ? sides", "4 sides"),
    ("Sun rises in the?", "East"),
    ("Primary colors?", "Red, blue, yellow"),
    ("5 + 7 = ?", "12"),
    ("Our galaxy name?", "Milky Way"),
    ("Triangle has ? sides", "3 sides"),
    ("Planet we live on?", "Earth"),
    ("First day of week?", "Monday (common)"),
    ("10 ÷ 2 = ?", "5"),
    ("Opposite of big?", "Small"),
    ("Dog says?", "Bark"),
];
