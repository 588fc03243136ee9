use crate::config::{PickerConfig, Policy};
use crate::date::CalendarDate;
use crate::engine::CalendarEngine;
use crate::format::{date_label, long_year, month_name};
use crate::grid::{project, MonthGrid, OutOfRangeCellTap};
use crate::navigation::{Direction, NavigationError, NavigationState};
use crate::search::{SearchCache, SearchEntry, SearchError, SearchIndex, SearchOutcome};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

type DateSetListener = Box<dyn FnMut(CalendarDate, &str)>;
type CancelListener = Box<dyn FnMut()>;

/// A date picker: navigation, the month grid, month search, and the final
/// OK/cancel report.
///
/// Nothing is reported to listeners until [`DatePicker::confirm`] or
/// [`DatePicker::cancel`] is called.
pub struct DatePicker<E> {
    engine: E,
    state: NavigationState,
    search: Rc<SearchCache>,
    on_date_set: Option<DateSetListener>,
    on_cancel: Option<CancelListener>,
}

impl<E: CalendarEngine> DatePicker<E> {
    pub fn new(
        engine: E,
        today: CalendarDate,
        config: PickerConfig,
        search: Rc<SearchCache>,
    ) -> DatePicker<E> {
        let mut state = NavigationState::new(today, config.policy);
        if let Some(date) = config.initial_date {
            state = state.start_date(date);
        }
        DatePicker {
            engine,
            state,
            search,
            on_date_set: None,
            on_cancel: None,
        }
    }

    /// Call `listener` with the picked date and its label on
    /// [`DatePicker::confirm`]
    pub fn on_date_set<F>(mut self, listener: F) -> DatePicker<E>
    where
        F: FnMut(CalendarDate, &str) + 'static,
    {
        self.on_date_set = Some(Box::new(listener));
        self
    }

    /// Call `listener` on [`DatePicker::cancel`]
    pub fn on_cancel<F>(mut self, listener: F) -> DatePicker<E>
    where
        F: FnMut() + 'static,
    {
        self.on_cancel = Some(Box::new(listener));
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn today(&self) -> CalendarDate {
        self.state.today()
    }

    pub fn selected(&self) -> CalendarDate {
        self.state.selected()
    }

    pub fn displayed(&self) -> CalendarDate {
        self.state.displayed()
    }

    pub fn policy(&self) -> Policy {
        self.state.policy()
    }

    pub fn previous_month(&mut self) -> Result<(), NavigationError> {
        self.state.step_month(&self.engine, Direction::Backward)
    }

    pub fn next_month(&mut self) -> Result<(), NavigationError> {
        self.state.step_month(&self.engine, Direction::Forward)
    }

    pub fn previous_year(&mut self) -> Result<(), NavigationError> {
        self.state.step_year(&self.engine, Direction::Backward)
    }

    pub fn next_year(&mut self) -> Result<(), NavigationError> {
        self.state.step_year(&self.engine, Direction::Forward)
    }

    pub fn reset_to_today(&mut self) {
        self.state.reset_to_today();
    }

    pub fn jump_to(&mut self, anchor: CalendarDate) {
        self.state.jump_to(anchor);
    }

    /// The displayed month laid out for drawing
    pub fn grid(&self) -> MonthGrid {
        project(
            &self.engine,
            self.state.displayed(),
            self.state.selected(),
            self.state.today(),
            self.state.policy(),
        )
    }

    /// Select the day at `position` in [`DatePicker::grid`].  Blank and
    /// disabled cells are rejected and leave the selection alone.
    pub fn tap(&mut self, position: usize) -> Result<CalendarDate, OutOfRangeCellTap> {
        let displayed = self.state.displayed();
        let day = self.grid().day_at(position)?;
        let date = self
            .engine
            .date(displayed.year(), displayed.month(), day)
            .map_err(|_| OutOfRangeCellTap(position))?;
        self.state.select(date);
        Ok(date)
    }

    /// The search index, built on first use
    pub fn search_index(&self) -> Result<&SearchIndex, NavigationError> {
        self.search.get_or_build(&self.engine, self.state.today())
    }

    /// Look up a month or year.  The displayed month does not change; pass
    /// the result to [`DatePicker::jump_to`] once the user confirms it.
    pub fn search(&self, text: &str) -> Result<SearchOutcome, SearchError> {
        let index = self.search_index().map_err(SearchError::Index)?;
        index.query(&self.engine, text, self.state.today(), self.state.policy())
    }

    /// At most `limit` months whose labels contain `text`, nearest first
    pub fn suggestions(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<SearchEntry>, NavigationError> {
        let index = self.search_index()?;
        Ok(index
            .suggestions(text, self.state.today(), self.state.policy())
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    /// The displayed year, e.g. `ה׳תשפ״ה`
    pub fn year_label(&self) -> String {
        long_year(self.state.displayed().year())
    }

    /// The displayed month's name
    pub fn month_label(&self) -> &'static str {
        month_name(self.state.displayed().month())
    }

    /// Report the selected date to the date-set listener
    pub fn confirm(&mut self) -> CalendarDate {
        let date = self.state.selected();
        let label = date_label(date);
        debug!(%date, %label, "Date confirmed");
        if let Some(listener) = self.on_date_set.as_mut() {
            listener(date, &label);
        }
        date
    }

    pub fn cancel(&mut self) {
        debug!("Picker cancelled");
        if let Some(listener) = self.on_cancel.as_mut() {
            listener();
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for DatePicker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("engine", &self.engine)
            .field("state", &self.state)
            .field("search", &self.search)
            .field("on_date_set", &self.on_date_set.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::HebrewMonth;
    use crate::engine::HebrewCalendar;
    use crate::search::MonthOrder;
    use std::cell::RefCell;

    fn hdate(year: i32, month: HebrewMonth, day: u8) -> CalendarDate {
        HebrewCalendar::new().date(year, month, day).unwrap()
    }

    fn picker(config: PickerConfig) -> DatePicker<HebrewCalendar> {
        DatePicker::new(
            HebrewCalendar::new(),
            hdate(5785, HebrewMonth::Tishrei, 10),
            config,
            Rc::new(SearchCache::new()),
        )
    }

    #[test]
    fn test_initial_state() {
        let p = picker(PickerConfig::new());
        assert_eq!(p.selected(), hdate(5785, HebrewMonth::Tishrei, 10));
        assert_eq!(p.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
        assert_eq!(p.year_label(), "ה׳תשפ״ה");
        assert_eq!(p.month_label(), "תשרי");
        let start = hdate(5784, HebrewMonth::AdarII, 14);
        let p = picker(PickerConfig::new().initial_date(start));
        assert_eq!(p.displayed(), hdate(5784, HebrewMonth::AdarII, 1));
        assert_eq!(p.month_label(), "אדר ב׳");
    }

    #[test]
    fn test_navigation() {
        let mut p = picker(PickerConfig::new());
        p.previous_month().unwrap();
        assert_eq!(p.displayed(), hdate(5784, HebrewMonth::Elul, 1));
        p.previous_year().unwrap();
        assert_eq!(p.displayed(), hdate(5783, HebrewMonth::Elul, 1));
        p.next_year().unwrap();
        p.next_month().unwrap();
        assert_eq!(p.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
        p.next_month().unwrap();
        p.reset_to_today();
        assert_eq!(p.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
    }

    #[test]
    fn test_tap() {
        let policy = Policy::new().disable_past_dates(true);
        let mut p = picker(PickerConfig::new().policy(policy));
        let grid = p.grid();
        let position = grid.position_of(14).unwrap();
        assert_eq!(p.tap(position), Ok(hdate(5785, HebrewMonth::Tishrei, 14)));
        assert_eq!(p.selected(), hdate(5785, HebrewMonth::Tishrei, 14));
        // Blank cell, then a past day
        assert_eq!(p.tap(0), Err(OutOfRangeCellTap(0)));
        let past = grid.position_of(3).unwrap();
        assert_eq!(p.tap(past), Err(OutOfRangeCellTap(past)));
        assert_eq!(p.tap(1000), Err(OutOfRangeCellTap(1000)));
        assert_eq!(p.selected(), hdate(5785, HebrewMonth::Tishrei, 14));
    }

    #[test]
    fn test_search_then_jump() {
        let mut p = picker(PickerConfig::new());
        let Ok(SearchOutcome::Month(entry)) = p.search("אלול תשפ״ו") else {
            panic!("search should find Elul 5786");
        };
        assert_eq!(p.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
        p.jump_to(entry.anchor);
        assert_eq!(p.displayed(), hdate(5786, HebrewMonth::Elul, 1));
        assert_eq!(p.search("  "), Err(SearchError::EmptyQuery));
        assert!(matches!(p.search("אלול"), Err(SearchError::NoMatch(_))));
    }

    #[test]
    fn test_suggestions() {
        let p = picker(PickerConfig::new());
        let found = p.suggestions("כסלו", 3).unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].anchor, hdate(5785, HebrewMonth::Kislev, 1));
        assert!(p.suggestions("", 3).unwrap().is_empty());
    }

    #[test]
    fn test_shared_cache() {
        let cache = Rc::new(SearchCache::new());
        let today = hdate(5785, HebrewMonth::Tishrei, 10);
        let new_picker = || {
            DatePicker::new(
                HebrewCalendar::new(),
                today,
                PickerConfig::new(),
                Rc::clone(&cache),
            )
        };
        let a = new_picker();
        let b = new_picker();
        let first = a.search_index().unwrap();
        assert!(std::ptr::eq(first, b.search_index().unwrap()));
    }

    fn year_labels(p: &DatePicker<HebrewCalendar>, text: &str) -> Vec<String> {
        match p.search(text) {
            Ok(SearchOutcome::Year { choices, .. }) => {
                choices.into_iter().map(|e| e.label).collect()
            }
            r => panic!("expected a year, got {r:?}"),
        }
    }

    #[test]
    fn test_custom_month_order() {
        let order = MonthOrder::new()
            .with_alias("מרחשבן", HebrewMonth::Cheshvan)
            .with_alias("אלול", HebrewMonth::Tishrei);
        let p = DatePicker::new(
            HebrewCalendar::new(),
            hdate(5785, HebrewMonth::Tishrei, 10),
            PickerConfig::new(),
            Rc::new(SearchCache::new().with_month_order(order)),
        );
        let index = p.search_index().unwrap();
        assert_eq!(
            index.month_order().month("מרחשבן"),
            Some(HebrewMonth::Cheshvan)
        );
        // Elul now ranks with Tishrei and wins the tie on its label
        let labels = year_labels(&p, "תשפ״ה");
        assert_eq!(labels[..3], ["אלול תשפ״ה", "תשרי תשפ״ה", "חשוון תשפ״ה"]);
        let labels = year_labels(&picker(PickerConfig::new()), "תשפ״ה");
        assert_eq!(labels[0], "תשרי תשפ״ה");
        assert_eq!(labels[11], "אלול תשפ״ה");
    }

    #[test]
    fn test_search_header_year() {
        let p = picker(PickerConfig::new());
        let labels = year_labels(&p, &p.year_label());
        assert_eq!(labels.len(), 12);
        assert!(labels.iter().all(|l| l.ends_with("תשפ״ה")));
        let Ok(SearchOutcome::Month(entry)) = p.search("אלול ה׳תשפ״ו") else {
            panic!("search should find Elul 5786");
        };
        assert_eq!(entry.anchor, hdate(5786, HebrewMonth::Elul, 1));
    }

    #[test]
    fn test_confirm() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reported);
        let mut p = picker(PickerConfig::new()).on_date_set(move |date, label: &str| {
            sink.borrow_mut().push((date, label.to_owned()));
        });
        p.jump_to(hdate(5785, HebrewMonth::Nisan, 1));
        let position = p.grid().position_of(14).unwrap();
        p.tap(position).unwrap();
        assert!(reported.borrow().is_empty());
        assert_eq!(p.confirm(), hdate(5785, HebrewMonth::Nisan, 14));
        assert_eq!(
            *reported.borrow(),
            [(
                hdate(5785, HebrewMonth::Nisan, 14),
                String::from("י״ד ניסן, ה׳תשפ״ה")
            )]
        );
    }

    #[test]
    fn test_cancel() {
        let cancelled = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&cancelled);
        let mut p = picker(PickerConfig::new())
            .on_date_set(|_, _: &str| panic!("nothing was picked"))
            .on_cancel(move || *sink.borrow_mut() += 1);
        p.next_month().unwrap();
        p.cancel();
        assert_eq!(*cancelled.borrow(), 1);
    }
}
