mod hebrew;
pub use self::hebrew::{GregorianRangeError, HebrewCalendar, Schedule};
use crate::date::{CalendarDate, HebrewMonth, InvalidDate};
use std::fmt;

/// Number of days in a week; weekdays are numbered `1..=DAYS_IN_WEEK`
/// starting from Sunday
pub const DAYS_IN_WEEK: u8 = 7;

/// Weekday number of Shabbat
pub const SHABBAT: u8 = 7;

/// The date arithmetic the picker relies on.
///
/// Implementations answer questions about the calendar; the navigation, grid
/// and search code never computes month lengths or weekdays itself.
pub trait CalendarEngine {
    /// Smallest and largest years the engine can compute
    fn year_range(&self) -> (i32, i32);

    fn is_leap_year(&self, year: i32) -> bool;

    /// Number of days in `month` of `year`.  Only called for months that
    /// occur in `year`.
    fn days_in_month(&self, year: i32, month: HebrewMonth) -> u8;

    /// Day of the week from 1 (Sunday) to 7 (Shabbat)
    fn day_of_week(&self, date: CalendarDate) -> u8;

    /// The festival falling on `date`, if any
    fn yom_tov(&self, date: CalendarDate) -> Option<YomTov>;

    fn is_fast_day(&self, date: CalendarDate) -> bool;

    /// Construct a validated date.
    ///
    /// `Adar` and `AdarI` name the same slot of the year: `Adar` in a leap
    /// year is read as `AdarI` and `AdarI` in a common year as `Adar`.
    /// `AdarII` in a common year is rejected.
    fn date(&self, year: i32, month: HebrewMonth, day: u8) -> Result<CalendarDate, InvalidDate> {
        let (min_year, max_year) = self.year_range();
        if !(min_year..=max_year).contains(&year) {
            return Err(InvalidDate::YearOutOfRange(year));
        }
        let leap = self.is_leap_year(year);
        let month = match (month, leap) {
            (HebrewMonth::Adar, true) => HebrewMonth::AdarI,
            (HebrewMonth::AdarI, false) => HebrewMonth::Adar,
            (HebrewMonth::AdarII, false) => return Err(InvalidDate::NoSuchMonth { year, month }),
            (m, _) => m,
        };
        if day == 0 || day > self.days_in_month(year, month) {
            return Err(InvalidDate::NoSuchDay { year, month, day });
        }
        Ok(CalendarDate::new_unchecked(year, month, day))
    }
}

impl<T: CalendarEngine + ?Sized> CalendarEngine for &T {
    fn year_range(&self) -> (i32, i32) {
        (**self).year_range()
    }

    fn is_leap_year(&self, year: i32) -> bool {
        (**self).is_leap_year(year)
    }

    fn days_in_month(&self, year: i32, month: HebrewMonth) -> u8 {
        (**self).days_in_month(year, month)
    }

    fn day_of_week(&self, date: CalendarDate) -> u8 {
        (**self).day_of_week(date)
    }

    fn yom_tov(&self, date: CalendarDate) -> Option<YomTov> {
        (**self).yom_tov(date)
    }

    fn is_fast_day(&self, date: CalendarDate) -> bool {
        (**self).is_fast_day(date)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum YomTov {
    RoshHashana,
    YomKippur,
    Sukkot,
    CholHamoedSukkot,
    HoshanaRabba,
    SheminiAtzeret,
    /// Only observed as a separate day outside Israel
    SimchatTorah,
    Chanukah,
    TuBishvat,
    Purim,
    ShushanPurim,
    Pesach,
    CholHamoedPesach,
    PesachSheni,
    LagBaomer,
    Shavuot,
    TuBeav,
    /// The modern Israeli days are only reported by engines that opt in,
    /// such as [`HebrewCalendar::modern_holidays`]
    YomHashoah,
    YomHazikaron,
    YomHaatzmaut,
    YomYerushalayim,
}

impl fmt::Display for YomTov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            YomTov::RoshHashana => "ראש השנה",
            YomTov::YomKippur => "יום כיפור",
            YomTov::Sukkot => "סוכות",
            YomTov::CholHamoedSukkot => "חול המועד סוכות",
            YomTov::HoshanaRabba => "הושענא רבה",
            YomTov::SheminiAtzeret => "שמיני עצרת",
            YomTov::SimchatTorah => "שמחת תורה",
            YomTov::Chanukah => "חנוכה",
            YomTov::TuBishvat => "ט״ו בשבט",
            YomTov::Purim => "פורים",
            YomTov::ShushanPurim => "שושן פורים",
            YomTov::Pesach => "פסח",
            YomTov::CholHamoedPesach => "חול המועד פסח",
            YomTov::PesachSheni => "פסח שני",
            YomTov::LagBaomer => "ל״ג בעומר",
            YomTov::Shavuot => "שבועות",
            YomTov::TuBeav => "ט״ו באב",
            YomTov::YomHashoah => "יום השואה",
            YomTov::YomHazikaron => "יום הזיכרון",
            YomTov::YomHaatzmaut => "יום העצמאות",
            YomTov::YomYerushalayim => "יום ירושלים",
        };
        f.write_str(name)
    }
}
