//! Built-in Hebrew letter table.
//!
//! Weights are standard gematria (1..9, 10..90, 100..400). A letter
//! decomposes into the letters of its spelled-out name after the leading
//! one, with final forms folded to their base letters:
//!
//! ```text
//! א אלף → ל פ     ו וו  → ו       מ מם  → מ       נ נון → ו נ
//! ל למד → מ ד     ד דלת → ל ת     ה הא  → א       פ פה  → ה
//! ```
//!
//! This gives self-loops on ו, מ, נ, the 2-cycle ל ↔ ד, and the cycle
//! א → פ → ה → א.

use els_types::LetterSymbol;

#[rustfmt::skip]
const HEBREW: [(char, u32, &str); 22] = [
    ('א', 1, "לפ"),
    ('ב', 2, "ית"),
    ('ג', 3, "ימל"),
    ('ד', 4, "לת"),
    ('ה', 5, "א"),
    ('ו', 6, "ו"),
    ('ז', 7, "ינ"),
    ('ח', 8, "ית"),
    ('ט', 9, "ית"),
    ('י', 10, "וד"),
    ('כ', 20, "פ"),
    ('ל', 30, "מד"),
    ('מ', 40, "מ"),
    ('נ', 50, "ונ"),
    ('ס', 60, "מכ"),
    ('ע', 70, "ינ"),
    ('פ', 80, "ה"),
    ('צ', 90, "די"),
    ('ק', 100, "ופ"),
    ('ר', 200, "יש"),
    ('ש', 300, "ינ"),
    ('ת', 400, "ו"),
];

/// Final letter forms and the base letter each one counts as.
pub const HEBREW_FINAL_FORMS: [(char, char); 5] = [
    ('ך', 'כ'),
    ('ם', 'מ'),
    ('ן', 'נ'),
    ('ף', 'פ'),
    ('ץ', 'צ'),
];

pub(crate) fn hebrew_letters() -> Vec<LetterSymbol> {
    HEBREW
        .iter()
        .map(|&(symbol, weight, decomposition)| LetterSymbol::new(symbol, weight, decomposition))
        .collect()
}
