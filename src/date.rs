use std::fmt;
use thiserror::Error;

/// A month of the Hebrew calendar, declared in the order the months occur
/// within a year (which begins at Tishrei).
///
/// `Adar` only exists in common years; leap years have `AdarI` and `AdarII`
/// in its place.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HebrewMonth {
    Tishrei,
    Cheshvan,
    Kislev,
    Tevet,
    Shevat,
    Adar,
    AdarI,
    AdarII,
    Nisan,
    Iyar,
    Sivan,
    Tammuz,
    Av,
    Elul,
}

impl HebrewMonth {
    pub const ALL: [HebrewMonth; 14] = [
        HebrewMonth::Tishrei,
        HebrewMonth::Cheshvan,
        HebrewMonth::Kislev,
        HebrewMonth::Tevet,
        HebrewMonth::Shevat,
        HebrewMonth::Adar,
        HebrewMonth::AdarI,
        HebrewMonth::AdarII,
        HebrewMonth::Nisan,
        HebrewMonth::Iyar,
        HebrewMonth::Sivan,
        HebrewMonth::Tammuz,
        HebrewMonth::Av,
        HebrewMonth::Elul,
    ];

    /// Returns true for the month in which Purim and the Fast of Esther fall
    /// in a year of the given kind
    pub fn is_purim_month(self, leap_year: bool) -> bool {
        if leap_year {
            self == HebrewMonth::AdarII
        } else {
            self == HebrewMonth::Adar
        }
    }
}

impl fmt::Display for HebrewMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HebrewMonth::Tishrei => "Tishrei",
            HebrewMonth::Cheshvan => "Cheshvan",
            HebrewMonth::Kislev => "Kislev",
            HebrewMonth::Tevet => "Tevet",
            HebrewMonth::Shevat => "Shevat",
            HebrewMonth::Adar => "Adar",
            HebrewMonth::AdarI => "Adar I",
            HebrewMonth::AdarII => "Adar II",
            HebrewMonth::Nisan => "Nisan",
            HebrewMonth::Iyar => "Iyar",
            HebrewMonth::Sivan => "Sivan",
            HebrewMonth::Tammuz => "Tammuz",
            HebrewMonth::Av => "Av",
            HebrewMonth::Elul => "Elul",
        };
        f.write_str(name)
    }
}

/// A date in the Hebrew calendar.
///
/// Values are only handed out by [`CalendarEngine::date`][crate::CalendarEngine::date],
/// so a `CalendarDate` never holds a month that does not occur in its year or
/// a day past the end of its month.  Ordering is chronological.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CalendarDate {
    year: i32,
    month: HebrewMonth,
    day: u8,
}

impl CalendarDate {
    // Callers are responsible for validation; see `CalendarEngine::date`.
    pub(crate) fn new_unchecked(year: i32, month: HebrewMonth, day: u8) -> CalendarDate {
        CalendarDate { year, month, day }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> HebrewMonth {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// The first day of this date's month
    pub fn first_of_month(&self) -> CalendarDate {
        CalendarDate { day: 1, ..*self }
    }

    pub fn same_month(&self, other: &CalendarDate) -> bool {
        self.year == other.year && self.month == other.month
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month, self.year)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum InvalidDate {
    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),
    #[error("{month} does not occur in year {year}")]
    NoSuchMonth { year: i32, month: HebrewMonth },
    #[error("{month} {year} has no day {day}")]
    NoSuchDay {
        year: i32,
        month: HebrewMonth,
        day: u8,
    },
}
