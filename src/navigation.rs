use crate::config::Policy;
use crate::date::{CalendarDate, HebrewMonth, InvalidDate};
use crate::engine::CalendarEngine;
use crate::months::months_of_year;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Backward,
    Forward,
}

/// What the picker is showing and what the user has picked.
///
/// `displayed` is always the first day of a month.  `selected` need not lie
/// in the displayed month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavigationState {
    today: CalendarDate,
    selected: CalendarDate,
    displayed: CalendarDate,
    policy: Policy,
}

impl NavigationState {
    pub fn new(today: CalendarDate, policy: Policy) -> NavigationState {
        NavigationState {
            today,
            selected: today,
            displayed: today.first_of_month(),
            policy,
        }
    }

    pub fn start_date(mut self, date: CalendarDate) -> NavigationState {
        self.jump_to(date);
        self
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn selected(&self) -> CalendarDate {
        self.selected
    }

    pub fn displayed(&self) -> CalendarDate {
        self.displayed
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Show the previous or next month.  On error the state is unchanged.
    pub fn step_month<E: CalendarEngine + ?Sized>(
        &mut self,
        engine: &E,
        direction: Direction,
    ) -> Result<(), NavigationError> {
        let target = step_month(engine, self.displayed, direction)?;
        debug!(from = %self.displayed, to = %target, "Stepped month");
        self.displayed = target;
        Ok(())
    }

    /// Show the same month of the previous or next year.  On error the state
    /// is unchanged.
    pub fn step_year<E: CalendarEngine + ?Sized>(
        &mut self,
        engine: &E,
        direction: Direction,
    ) -> Result<(), NavigationError> {
        let target = step_year(engine, self.displayed, direction)?;
        debug!(from = %self.displayed, to = %target, "Stepped year");
        self.displayed = target;
        Ok(())
    }

    /// Pick a date.  Whether the date is allowed by the policy is for the
    /// caller to check.
    pub fn select(&mut self, date: CalendarDate) {
        self.selected = date;
    }

    pub fn jump_to(&mut self, anchor: CalendarDate) {
        debug!(%anchor, "Jumping");
        self.displayed = anchor.first_of_month();
        self.selected = anchor;
    }

    pub fn reset_to_today(&mut self) {
        self.jump_to(self.today);
    }
}

/// Returns the first day of the month before or after `month`'s month
pub fn step_month<E: CalendarEngine + ?Sized>(
    engine: &E,
    month: CalendarDate,
    direction: Direction,
) -> Result<CalendarDate, NavigationError> {
    let year = month.year();
    let months = months_of_year(engine, year);
    let index = months
        .position(month.month())
        .ok_or(NavigationError::MonthNotInYear {
            year,
            month: month.month(),
        })?;
    let (year, target) = match direction {
        Direction::Backward => match index.checked_sub(1).and_then(|i| months.get(i)) {
            Some(m) => (year, m),
            None => (year - 1, HebrewMonth::Elul),
        },
        Direction::Forward => match months.get(index + 1) {
            Some(m) => (year, m),
            None => (year + 1, HebrewMonth::Tishrei),
        },
    };
    resolve(engine, year, target)
}

/// Returns the first day of the same month in the year before or after
/// `month`'s year.  Adar II falls back to Adar when the target year is not a
/// leap year.
pub fn step_year<E: CalendarEngine + ?Sized>(
    engine: &E,
    month: CalendarDate,
    direction: Direction,
) -> Result<CalendarDate, NavigationError> {
    let year = match direction {
        Direction::Backward => month.year() - 1,
        Direction::Forward => month.year() + 1,
    };
    let target = match month.month() {
        HebrewMonth::AdarII if !engine.is_leap_year(year) => HebrewMonth::Adar,
        m => m,
    };
    resolve(engine, year, target)
}

fn resolve<E: CalendarEngine + ?Sized>(
    engine: &E,
    year: i32,
    month: HebrewMonth,
) -> Result<CalendarDate, NavigationError> {
    match engine.date(year, month, 1) {
        Ok(date) => Ok(date),
        Err(InvalidDate::YearOutOfRange(_)) => Err(NavigationError::OutOfTime),
        Err(e) => Err(NavigationError::InvalidTarget(e)),
    }
}

/// Failure to move the displayed month.
///
/// Everything except `OutOfTime` means the engine broke its contract and
/// should not be recovered from.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum NavigationError {
    #[error("{month} is missing from the month list of year {year}")]
    MonthNotInYear { year: i32, month: HebrewMonth },
    #[error("engine rejected navigation target")]
    InvalidTarget(#[source] InvalidDate),
    #[error("reached the end of time")]
    OutOfTime,
}

impl NavigationError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, NavigationError::OutOfTime)
    }
}
