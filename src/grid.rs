use crate::config::Policy;
use crate::date::CalendarDate;
use crate::engine::{CalendarEngine, YomTov, DAYS_IN_WEEK, SHABBAT};
use crate::format::hebrew_numeral;
use std::slice::Chunks;
use thiserror::Error;
use tracing::trace;

/// One square of the month grid.  Cells before the first of the month are
/// blank: they have an empty label and no day.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridCell {
    pub label: String,
    pub day: Option<u8>,
    pub disabled: bool,
}

impl GridCell {
    fn blank() -> GridCell {
        GridCell {
            label: String::new(),
            day: None,
            disabled: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.day.is_none()
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_blank() && !self.disabled
    }
}

/// The cells of one month laid out in rows of seven, Sunday first
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthGrid {
    month: CalendarDate,
    offset: usize,
    cells: Vec<GridCell>,
    selection: Option<usize>,
}

impl MonthGrid {
    /// The first day of the projected month
    pub fn month(&self) -> CalendarDate {
        self.month
    }

    /// Number of blank cells before the first of the month
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Position of the selected date, if it is in this month
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn weeks(&self) -> Chunks<'_, GridCell> {
        self.cells.chunks(usize::from(DAYS_IN_WEEK))
    }

    pub fn position_of(&self, day: u8) -> Option<usize> {
        let position = usize::from(day).checked_sub(1)? + self.offset;
        (position < self.cells.len()).then_some(position)
    }

    /// Map a grid position back to a day of the month.  Blank and disabled
    /// cells are rejected.
    pub fn day_at(&self, position: usize) -> Result<u8, OutOfRangeCellTap> {
        match self.cells.get(position) {
            Some(GridCell {
                day: Some(day),
                disabled: false,
                ..
            }) => Ok(*day),
            _ => Err(OutOfRangeCellTap(position)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("grid position {0} is not a selectable day")]
pub struct OutOfRangeCellTap(pub usize);

/// Lay out `displayed`'s month, marking the days that `policy` excludes.
///
/// The result always holds `offset + days_in_month` cells.
pub fn project<E: CalendarEngine + ?Sized>(
    engine: &E,
    displayed: CalendarDate,
    selected: CalendarDate,
    today: CalendarDate,
    policy: Policy,
) -> MonthGrid {
    let month = displayed.first_of_month();
    let offset = usize::from(engine.day_of_week(month).saturating_sub(1));
    let days = engine.days_in_month(month.year(), month.month());
    let mut cells = Vec::with_capacity(offset + usize::from(days));
    cells.resize_with(offset, GridCell::blank);
    for d in 1..=days {
        let disabled = match engine.date(month.year(), month.month(), d) {
            Ok(date) => is_disabled(engine, date, today, policy),
            Err(_) => true,
        };
        cells.push(GridCell {
            label: hebrew_numeral(u32::from(d)),
            day: Some(d),
            disabled,
        });
    }
    let selection = if selected.same_month(&month) {
        Some(usize::from(selected.day()) + offset - 1)
    } else {
        None
    };
    trace!(%month, offset, days, ?selection, "Projected month grid");
    MonthGrid {
        month,
        offset,
        cells,
        selection,
    }
}

/// Whether `policy` forbids picking `date`
pub fn is_disabled<E: CalendarEngine + ?Sized>(
    engine: &E,
    date: CalendarDate,
    today: CalendarDate,
    policy: Policy,
) -> bool {
    if policy.disable_past_dates && date < today {
        return true;
    }
    if policy.disable_holidays_and_shabbat {
        let yom_tov = engine.yom_tov(date);
        if yom_tov.is_some_and(|yt| yt != YomTov::YomKippur)
            || engine.day_of_week(date) == SHABBAT
            || engine.is_fast_day(date)
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::HebrewMonth;
    use crate::engine::HebrewCalendar;

    fn hdate(year: i32, month: HebrewMonth, day: u8) -> CalendarDate {
        HebrewCalendar::new().date(year, month, day).unwrap()
    }

    fn tishrei_5785(policy: Policy) -> MonthGrid {
        let today = hdate(5785, HebrewMonth::Tishrei, 10);
        project(
            &HebrewCalendar::new(),
            hdate(5785, HebrewMonth::Tishrei, 1),
            hdate(5785, HebrewMonth::Tishrei, 14),
            today,
            policy,
        )
    }

    fn disabled_days(grid: &MonthGrid) -> Vec<u8> {
        grid.cells()
            .iter()
            .filter(|c| c.disabled)
            .filter_map(|c| c.day)
            .collect()
    }

    #[test]
    fn test_layout() {
        let grid = tishrei_5785(Policy::new());
        // 1 Tishrei 5785 was a Thursday
        assert_eq!(grid.offset(), 4);
        assert_eq!(grid.len(), 34);
        assert!(grid.cells()[..4].iter().all(GridCell::is_blank));
        assert_eq!(grid.cells()[4].label, "א׳");
        assert_eq!(grid.cells()[4].day, Some(1));
        assert_eq!(grid.cells()[33].label, "ל׳");
        assert_eq!(grid.weeks().count(), 5);
        assert!(disabled_days(&grid).is_empty());
    }

    #[test]
    fn test_cell_count() {
        let cal = HebrewCalendar::new();
        let today = hdate(5785, HebrewMonth::Tishrei, 10);
        for year in [5784, 5785, 5786] {
            for month in &crate::months::months_of_year(&cal, year) {
                let first = hdate(year, month, 1);
                let grid = project(&cal, first, today, today, Policy::new());
                let expected = usize::from(cal.day_of_week(first)) - 1
                    + usize::from(cal.days_in_month(year, month));
                assert_eq!(grid.len(), expected);
            }
        }
    }

    #[test]
    fn test_selection() {
        let grid = tishrei_5785(Policy::new());
        assert_eq!(grid.selection(), Some(17));
        let grid = project(
            &HebrewCalendar::new(),
            hdate(5785, HebrewMonth::Cheshvan, 1),
            hdate(5785, HebrewMonth::Tishrei, 14),
            hdate(5785, HebrewMonth::Tishrei, 10),
            Policy::new(),
        );
        assert_eq!(grid.selection(), None);
    }

    #[test]
    fn test_past_dates() {
        let grid = tishrei_5785(Policy::new().disable_past_dates(true));
        assert_eq!(disabled_days(&grid), (1..=9).collect::<Vec<_>>());
        assert!(!grid.cells()[grid.position_of(10).unwrap()].disabled);
    }

    #[test]
    fn test_holidays_and_shabbat() {
        let grid = tishrei_5785(Policy::new().disable_holidays_and_shabbat(true));
        assert_eq!(
            disabled_days(&grid),
            [1, 2, 3, 4, 10, 15, 16, 17, 18, 19, 20, 21, 22, 24]
        );
    }

    #[test]
    fn test_modern_holidays() {
        let iyar = hdate(5784, HebrewMonth::Iyar, 1);
        let policy = Policy::new().disable_holidays_and_shabbat(true);
        let grid = project(&HebrewCalendar::new(), iyar, iyar, iyar, policy);
        assert_eq!(disabled_days(&grid), [3, 10, 14, 17, 18, 24]);
        let modern = HebrewCalendar::new().modern_holidays(true);
        let grid = project(&modern, iyar, iyar, iyar, policy);
        assert_eq!(disabled_days(&grid), [3, 5, 6, 10, 14, 17, 18, 24, 28]);
    }

    #[test]
    fn test_inverse_mapping() {
        let grid = tishrei_5785(Policy::new().disable_past_dates(true));
        for (position, cell) in grid.cells().iter().enumerate() {
            match cell.day {
                Some(day) if !cell.disabled => {
                    assert_eq!(grid.day_at(position), Ok(day));
                    assert_eq!(grid.position_of(day), Some(position));
                }
                _ => assert_eq!(grid.day_at(position), Err(OutOfRangeCellTap(position))),
            }
        }
        assert!(grid.day_at(grid.len()).is_err());
        assert_eq!(grid.position_of(31), None);
        assert_eq!(grid.position_of(0), None);
    }
}
