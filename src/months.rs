use crate::date::HebrewMonth;
use crate::engine::CalendarEngine;
use std::iter::Copied;
use std::slice::Iter;

static COMMON_YEAR: [HebrewMonth; 12] = [
    HebrewMonth::Tishrei,
    HebrewMonth::Cheshvan,
    HebrewMonth::Kislev,
    HebrewMonth::Tevet,
    HebrewMonth::Shevat,
    HebrewMonth::Adar,
    HebrewMonth::Nisan,
    HebrewMonth::Iyar,
    HebrewMonth::Sivan,
    HebrewMonth::Tammuz,
    HebrewMonth::Av,
    HebrewMonth::Elul,
];

static LEAP_YEAR: [HebrewMonth; 13] = [
    HebrewMonth::Tishrei,
    HebrewMonth::Cheshvan,
    HebrewMonth::Kislev,
    HebrewMonth::Tevet,
    HebrewMonth::Shevat,
    HebrewMonth::AdarI,
    HebrewMonth::AdarII,
    HebrewMonth::Nisan,
    HebrewMonth::Iyar,
    HebrewMonth::Sivan,
    HebrewMonth::Tammuz,
    HebrewMonth::Av,
    HebrewMonth::Elul,
];

/// The months of one year in calendar order, from Tishrei to Elul.
///
/// Month arithmetic walks this sequence rather than doing arithmetic on
/// month numbers, since the presence of Adar II in leap years means the
/// months do not line up between years.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthOrderList(&'static [HebrewMonth]);

impl MonthOrderList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<HebrewMonth> {
        self.0.get(index).copied()
    }

    pub fn first(&self) -> Option<HebrewMonth> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<HebrewMonth> {
        self.0.last().copied()
    }

    pub fn position(&self, month: HebrewMonth) -> Option<usize> {
        self.0.iter().position(|&m| m == month)
    }

    pub fn contains(&self, month: HebrewMonth) -> bool {
        self.0.contains(&month)
    }

    pub fn iter(&self) -> Copied<Iter<'static, HebrewMonth>> {
        self.0.iter().copied()
    }
}

impl IntoIterator for &MonthOrderList {
    type Item = HebrewMonth;
    type IntoIter = Copied<Iter<'static, HebrewMonth>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns the months of `year`, which depend only on whether `year` is a
/// leap year
pub fn months_of_year<E: CalendarEngine + ?Sized>(engine: &E, year: i32) -> MonthOrderList {
    if engine.is_leap_year(year) {
        MonthOrderList(&LEAP_YEAR)
    } else {
        MonthOrderList(&COMMON_YEAR)
    }
}
