//! Hebrew calendar date picking.
//!
//! The pieces of a month-at-a-time date picker for the Hebrew calendar:
//! stepping between months and years across leap years ([`NavigationState`]),
//! laying a month out as a grid with days disabled by a [`Policy`]
//! ([`grid::project`]), finding a month by typing its name
//! ([`SearchIndex`]), and the [`DatePicker`] controller that ties them
//! together.
//!
//! Calendar arithmetic is behind the [`CalendarEngine`] trait;
//! [`HebrewCalendar`] is the arithmetic Hebrew calendar.

pub mod config;
pub mod date;
pub mod engine;
pub mod format;
pub mod grid;
pub mod months;
pub mod navigation;
pub mod picker;
pub mod search;

pub use crate::config::{PickerConfig, Policy};
pub use crate::date::{CalendarDate, HebrewMonth, InvalidDate};
pub use crate::engine::{CalendarEngine, GregorianRangeError, HebrewCalendar, Schedule, YomTov};
pub use crate::grid::{GridCell, MonthGrid, OutOfRangeCellTap};
pub use crate::months::{months_of_year, MonthOrderList};
pub use crate::navigation::{Direction, NavigationError, NavigationState};
pub use crate::picker::DatePicker;
pub use crate::search::{
    MonthOrder, SearchCache, SearchEntry, SearchError, SearchIndex, SearchOutcome,
};
