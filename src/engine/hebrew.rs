use super::{CalendarEngine, YomTov, SHABBAT};
use crate::date::{CalendarDate, HebrewMonth, InvalidDate};
use crate::months::months_of_year;
use thiserror::Error;

/// Fixed day number (days since the Gregorian date 0001-01-01, which is day
/// 1) of 1 Tishrei AM 1
const EPOCH: i64 = -1_373_427;

/// Julian day number minus fixed day number
const JULIAN_DAY_OFFSET: i64 = 1_721_425;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Parts (1/1080 of an hour) in a day
const PARTS_PER_DAY: i64 = 25_920;

const SUNDAY: u8 = 1;
const MONDAY: u8 = 2;
const TUESDAY: u8 = 3;
const WEDNESDAY: u8 = 4;
const THURSDAY: u8 = 5;
const FRIDAY: u8 = 6;

/// Which festival days are kept.  Outside Israel the first and last days of
/// the pilgrimage festivals are doubled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Schedule {
    #[default]
    Israel,
    Diaspora,
}

/// The arithmetic Hebrew calendar
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HebrewCalendar {
    schedule: Schedule,
    modern_holidays: bool,
}

impl HebrewCalendar {
    pub fn new() -> HebrewCalendar {
        HebrewCalendar::default()
    }

    pub fn schedule(mut self, schedule: Schedule) -> HebrewCalendar {
        self.schedule = schedule;
        self
    }

    /// Also report Yom HaShoah, Yom HaZikaron, Yom HaAtzmaut and Yom
    /// Yerushalayim, moved off Shabbat and its eves as the Israeli rabbinate
    /// does.  Off by default.
    pub fn modern_holidays(mut self, flag: bool) -> HebrewCalendar {
        self.modern_holidays = flag;
        self
    }

    pub fn hebrew_date(&self, date: time::Date) -> Result<CalendarDate, InvalidDate> {
        self.date_from_fixed(i64::from(date.to_julian_day()) - JULIAN_DAY_OFFSET)
    }

    pub fn gregorian_date(&self, date: CalendarDate) -> Result<time::Date, GregorianRangeError> {
        let jd = self.fixed(date) + JULIAN_DAY_OFFSET;
        i32::try_from(jd)
            .ok()
            .and_then(|jd| time::Date::from_julian_day(jd).ok())
            .ok_or(GregorianRangeError(date))
    }

    fn days_in_year(&self, year: i32) -> i64 {
        new_year(year + 1) - new_year(year)
    }

    /// Fixed day number of `date`
    fn fixed(&self, date: CalendarDate) -> i64 {
        let mut day = new_year(date.year());
        for month in &months_of_year(self, date.year()) {
            if month == date.month() {
                break;
            }
            day += i64::from(self.days_in_month(date.year(), month));
        }
        day + i64::from(date.day()) - 1
    }

    fn date_from_fixed(&self, fixed: i64) -> Result<CalendarDate, InvalidDate> {
        // Mean year length is 35975351/98496 days
        let approx = ((fixed - EPOCH) * 98_496).div_euclid(35_975_351) + 1;
        let approx =
            i32::try_from(approx).map_err(|_| InvalidDate::YearOutOfRange(i32::MAX))?;
        let year = if new_year(approx) <= fixed {
            approx
        } else {
            approx - 1
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(InvalidDate::YearOutOfRange(year));
        }
        let mut start = new_year(year);
        for month in &months_of_year(self, year) {
            let length = self.days_in_month(year, month);
            if fixed < start + i64::from(length) {
                let day = u8::try_from(fixed - start + 1)
                    .map_err(|_| InvalidDate::NoSuchDay { year, month, day: 0 })?;
                return self.date(year, month, day);
            }
            start += i64::from(length);
        }
        Err(InvalidDate::YearOutOfRange(year))
    }

    fn diaspora(&self) -> bool {
        self.schedule == Schedule::Diaspora
    }

    fn modern_yom_tov(&self, date: CalendarDate) -> Option<YomTov> {
        let weekday = self.day_of_week(date);
        match (date.month(), date.day(), weekday) {
            (HebrewMonth::Nisan, 26, THURSDAY)
            | (HebrewMonth::Nisan, 28, MONDAY) => Some(YomTov::YomHashoah),
            (HebrewMonth::Nisan, 27, wd) if wd != SUNDAY && wd != FRIDAY => {
                Some(YomTov::YomHashoah)
            }
            (HebrewMonth::Iyar, 4, TUESDAY)
            | (HebrewMonth::Iyar, 2 | 3, WEDNESDAY)
            | (HebrewMonth::Iyar, 5, MONDAY) => Some(YomTov::YomHazikaron),
            (HebrewMonth::Iyar, 5, WEDNESDAY)
            | (HebrewMonth::Iyar, 3 | 4, THURSDAY)
            | (HebrewMonth::Iyar, 6, TUESDAY) => Some(YomTov::YomHaatzmaut),
            (HebrewMonth::Iyar, 28, _) => Some(YomTov::YomYerushalayim),
            _ => None,
        }
    }
}

impl CalendarEngine for HebrewCalendar {
    fn year_range(&self) -> (i32, i32) {
        (MIN_YEAR, MAX_YEAR)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        (7 * i64::from(year) + 1).rem_euclid(19) < 7
    }

    fn days_in_month(&self, year: i32, month: HebrewMonth) -> u8 {
        match month {
            HebrewMonth::Cheshvan if self.days_in_year(year) % 10 == 5 => 30,
            HebrewMonth::Kislev if self.days_in_year(year) % 10 == 3 => 29,
            HebrewMonth::Tishrei
            | HebrewMonth::Kislev
            | HebrewMonth::Shevat
            | HebrewMonth::AdarI
            | HebrewMonth::Nisan
            | HebrewMonth::Sivan
            | HebrewMonth::Av => 30,
            HebrewMonth::Cheshvan
            | HebrewMonth::Tevet
            | HebrewMonth::Adar
            | HebrewMonth::AdarII
            | HebrewMonth::Iyar
            | HebrewMonth::Tammuz
            | HebrewMonth::Elul => 29,
        }
    }

    fn day_of_week(&self, date: CalendarDate) -> u8 {
        // Fixed day 0 was a Sunday
        let index = self.fixed(date).rem_euclid(7);
        u8::try_from(index).map_or(SUNDAY, |i| i + 1)
    }

    fn yom_tov(&self, date: CalendarDate) -> Option<YomTov> {
        let leap = self.is_leap_year(date.year());
        let diaspora = self.diaspora();
        match (date.month(), date.day()) {
            (HebrewMonth::Tishrei, 1 | 2) => Some(YomTov::RoshHashana),
            (HebrewMonth::Tishrei, 10) => Some(YomTov::YomKippur),
            (HebrewMonth::Tishrei, 15) => Some(YomTov::Sukkot),
            (HebrewMonth::Tishrei, 16) if diaspora => Some(YomTov::Sukkot),
            (HebrewMonth::Tishrei, 16..=20) => Some(YomTov::CholHamoedSukkot),
            (HebrewMonth::Tishrei, 21) => Some(YomTov::HoshanaRabba),
            (HebrewMonth::Tishrei, 22) => Some(YomTov::SheminiAtzeret),
            (HebrewMonth::Tishrei, 23) if diaspora => Some(YomTov::SimchatTorah),
            (HebrewMonth::Kislev, 25..) => Some(YomTov::Chanukah),
            (HebrewMonth::Tevet, 1 | 2) => Some(YomTov::Chanukah),
            (HebrewMonth::Tevet, 3)
                if self.days_in_month(date.year(), HebrewMonth::Kislev) == 29 =>
            {
                Some(YomTov::Chanukah)
            }
            (HebrewMonth::Shevat, 15) => Some(YomTov::TuBishvat),
            (m, 14) if m.is_purim_month(leap) => Some(YomTov::Purim),
            (m, 15) if m.is_purim_month(leap) => Some(YomTov::ShushanPurim),
            (HebrewMonth::Nisan, 15 | 21) => Some(YomTov::Pesach),
            (HebrewMonth::Nisan, 16 | 22) if diaspora => Some(YomTov::Pesach),
            (HebrewMonth::Nisan, 16..=20) => Some(YomTov::CholHamoedPesach),
            (HebrewMonth::Iyar, 14) => Some(YomTov::PesachSheni),
            (HebrewMonth::Iyar, 18) => Some(YomTov::LagBaomer),
            (HebrewMonth::Sivan, 6) => Some(YomTov::Shavuot),
            (HebrewMonth::Sivan, 7) if diaspora => Some(YomTov::Shavuot),
            (HebrewMonth::Av, 15) => Some(YomTov::TuBeav),
            _ if self.modern_holidays => self.modern_yom_tov(date),
            _ => None,
        }
    }

    fn is_fast_day(&self, date: CalendarDate) -> bool {
        let leap = self.is_leap_year(date.year());
        let weekday = self.day_of_week(date);
        // Fasts that would fall on Shabbat are postponed to Sunday, except
        // the Fast of Esther, which is moved back to Thursday.
        match (date.month(), date.day()) {
            (HebrewMonth::Tishrei, 3) | (HebrewMonth::Tammuz, 17) | (HebrewMonth::Av, 9) => {
                weekday != SHABBAT
            }
            (HebrewMonth::Tishrei, 4) | (HebrewMonth::Tammuz, 18) | (HebrewMonth::Av, 10) => {
                weekday == SUNDAY
            }
            (HebrewMonth::Tishrei | HebrewMonth::Tevet, 10) => true,
            (m, 13) if m.is_purim_month(leap) => weekday != SHABBAT,
            (m, 11) if m.is_purim_month(leap) => weekday == THURSDAY,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("{0} has no representable Gregorian equivalent")]
pub struct GregorianRangeError(CalendarDate);

/// Days from the epoch to the molad of Tishrei of `year`, after the first
/// postponement rule
fn elapsed_days(year: i32) -> i64 {
    let months_elapsed = (235 * i64::from(year) - 234).div_euclid(19);
    let parts_elapsed = 12_084 + 13_753 * months_elapsed;
    let days = 29 * months_elapsed + parts_elapsed.div_euclid(PARTS_PER_DAY);
    if (3 * (days + 1)).rem_euclid(7) < 3 {
        days + 1
    } else {
        days
    }
}

/// Delay keeping the lengths of `year` and the year before it valid
fn year_length_correction(year: i32) -> i64 {
    let ny0 = elapsed_days(year - 1);
    let ny1 = elapsed_days(year);
    let ny2 = elapsed_days(year + 1);
    if ny2 - ny1 == 356 {
        2
    } else if ny1 - ny0 == 382 {
        1
    } else {
        0
    }
}

/// Fixed day number of 1 Tishrei of `year`
fn new_year(year: i32) -> i64 {
    EPOCH + elapsed_days(year) + year_length_correction(year)
}
