//! Hebrew text for dates: Gematria numerals, month names, and the labels
//! built from them.

use crate::date::{CalendarDate, HebrewMonth};

pub const GERESH: char = '\u{05F3}';
pub const GERSHAYIM: char = '\u{05F4}';

static ONES: [&str; 10] = ["", "א", "ב", "ג", "ד", "ה", "ו", "ז", "ח", "ט"];
static TENS: [&str; 10] = ["", "י", "כ", "ל", "מ", "נ", "ס", "ע", "פ", "צ"];
static HUNDREDS: [&str; 5] = ["", "ק", "ר", "ש", "ת"];

/// Single-letter weekday names, Sunday first
pub static WEEKDAY_INITIALS: [&str; 7] = ["א׳", "ב׳", "ג׳", "ד׳", "ה׳", "ו׳", "ש׳"];

/// Render `n` as a Hebrew numeral, e.g. 15 → `ט״ו`, 785 → `תשפ״ה`.
///
/// Thousands are written as a single letter followed by a geresh in front of
/// the rest of the number (5785 → `ה׳תשפ״ה`).  Zero renders as the empty
/// string.
pub fn hebrew_numeral(n: u32) -> String {
    let mut s = String::new();
    let thousands = n / 1000;
    if thousands > 0 {
        s.push_str(&hebrew_numeral(thousands));
        if !s.ends_with(GERESH) {
            s.push(GERESH);
        }
    }
    let mut letters = String::new();
    let mut rest = n % 1000;
    while rest >= 400 {
        letters.push_str(HUNDREDS[4]);
        rest -= 400;
    }
    letters.push_str(HUNDREDS[digit(rest / 100)]);
    rest %= 100;
    // 15 and 16 would otherwise spell out names of God
    match rest {
        15 => letters.push_str("טו"),
        16 => letters.push_str("טז"),
        _ => {
            letters.push_str(TENS[digit(rest / 10)]);
            letters.push_str(ONES[digit(rest % 10)]);
        }
    }
    let mut chars = letters.chars();
    match (chars.next_back(), chars.as_str()) {
        (None, _) => (),
        (Some(c), "") => {
            s.push(c);
            s.push(GERESH);
        }
        (Some(c), init) => {
            s.push_str(init);
            s.push(GERSHAYIM);
            s.push(c);
        }
    }
    s
}

fn digit(d: u32) -> usize {
    usize::try_from(d % 10).unwrap_or_default()
}

pub fn month_name(month: HebrewMonth) -> &'static str {
    match month {
        HebrewMonth::Tishrei => "תשרי",
        HebrewMonth::Cheshvan => "חשוון",
        HebrewMonth::Kislev => "כסלו",
        HebrewMonth::Tevet => "טבת",
        HebrewMonth::Shevat => "שבט",
        HebrewMonth::Adar => "אדר",
        HebrewMonth::AdarI => "אדר א׳",
        HebrewMonth::AdarII => "אדר ב׳",
        HebrewMonth::Nisan => "ניסן",
        HebrewMonth::Iyar => "אייר",
        HebrewMonth::Sivan => "סיוון",
        HebrewMonth::Tammuz => "תמוז",
        HebrewMonth::Av => "אב",
        HebrewMonth::Elul => "אלול",
    }
}

/// The year without its thousands, as used in search labels (5785 → `תשפ״ה`)
pub fn short_year(year: i32) -> String {
    hebrew_numeral(year.unsigned_abs() % 1000)
}

/// The full year as shown in the picker header (5785 → `ה׳תשפ״ה`)
pub fn long_year(year: i32) -> String {
    hebrew_numeral(year.unsigned_abs())
}

/// Label for a month of a specific year, e.g. `אדר א׳ תשפ״ד`
pub fn month_label(year: i32, month: HebrewMonth) -> String {
    format!("{} {}", month_name(month), short_year(year))
}

/// Label reported when a date is picked, e.g. `י״ד ניסן, ה׳תשפ״ה`
pub fn date_label(date: CalendarDate) -> String {
    format!(
        "{} {}, {}",
        hebrew_numeral(u32::from(date.day())),
        month_name(date.month()),
        long_year(date.year())
    )
}
