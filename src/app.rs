use crate::calendar::Calendar;
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState, MAX_SUGGESTIONS};
use crate::monthlist::{MonthList, MonthListInput, MonthListOutput, MonthListState};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use luach::format::date_label;
use luach::{
    CalendarDate, CalendarEngine, DatePicker, NavigationError, SearchError, SearchOutcome,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};

#[derive(Debug)]
pub(crate) struct App<E> {
    picker: DatePicker<E>,
    /// Day of the displayed month under the cursor
    cursor: u8,
    state: AppState,
}

impl<E: CalendarEngine> App<E> {
    pub(crate) fn new(picker: DatePicker<E>) -> App<E> {
        let cursor = picker.selected().day();
        App {
            picker,
            cursor,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> anyhow::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> anyhow::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.cancel();
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code)? {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or tried to go
    // somewhere they can't
    fn handle_key(&mut self, key: KeyCode) -> Result<bool, NavigationError> {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Enter | KeyCode::Char(' ') => Ok(self.select_cursor()),
                KeyCode::Char('<') => self.navigate(DatePicker::previous_month),
                KeyCode::Char('>') => self.navigate(DatePicker::next_month),
                KeyCode::Char('[') => self.navigate(DatePicker::previous_year),
                KeyCode::Char(']') => self.navigate(DatePicker::next_year),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.picker.reset_to_today();
                    self.cursor = self.picker.today().day();
                    Ok(true)
                }
                KeyCode::Char('/' | 'g') => {
                    self.state = AppState::Searching(JumpToState::new());
                    Ok(true)
                }
                KeyCode::Char('o') => {
                    self.picker.confirm();
                    self.state = AppState::Done;
                    Ok(true)
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.cancel();
                    Ok(true)
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    Ok(true)
                }
                _ => Ok(false),
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                Ok(true)
            }
            AppState::Searching(state) => {
                let input = match key {
                    KeyCode::Esc => {
                        self.state = AppState::Calendar;
                        return Ok(true);
                    }
                    KeyCode::Char(c) => JumpToInput::Char(c),
                    KeyCode::Backspace | KeyCode::Delete => JumpToInput::Backspace,
                    KeyCode::Up => JumpToInput::Up,
                    KeyCode::Down => JumpToInput::Down,
                    KeyCode::Enter => JumpToInput::Enter,
                    _ => return Ok(false),
                };
                match state.handle_input(input) {
                    JumpToOutput::Ok => Ok(true),
                    JumpToOutput::Invalid => Ok(false),
                    JumpToOutput::Edited => {
                        let suggestions =
                            self.picker.suggestions(state.query(), MAX_SUGGESTIONS)?;
                        state.set_suggestions(suggestions);
                        Ok(true)
                    }
                    JumpToOutput::Jump(date) => {
                        self.state = AppState::Calendar;
                        self.jump_to(date);
                        Ok(true)
                    }
                    JumpToOutput::Search(query) => match self.picker.search(&query) {
                        Ok(SearchOutcome::Month(entry)) => {
                            self.state = AppState::Calendar;
                            self.jump_to(entry.anchor);
                            Ok(true)
                        }
                        Ok(SearchOutcome::Year { year, choices }) => {
                            self.state =
                                AppState::ChoosingMonth(MonthListState::new(year, choices));
                            Ok(true)
                        }
                        Err(SearchError::Index(e)) => Err(e),
                        Err(e) => {
                            state.set_error(e.to_string());
                            Ok(false)
                        }
                    },
                }
            }
            AppState::ChoosingMonth(list) => {
                let input = match key {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.state = AppState::Calendar;
                        return Ok(true);
                    }
                    KeyCode::Char('k') | KeyCode::Up => MonthListInput::Up,
                    KeyCode::Char('j') | KeyCode::Down => MonthListInput::Down,
                    KeyCode::Enter => MonthListInput::Enter,
                    _ => return Ok(false),
                };
                match list.handle_input(input) {
                    MonthListOutput::Ok => Ok(true),
                    MonthListOutput::Invalid => Ok(false),
                    MonthListOutput::Jump(date) => {
                        self.state = AppState::Calendar;
                        self.jump_to(date);
                        Ok(true)
                    }
                }
            }
            AppState::Done => Ok(false),
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Done
    }

    /// Run a navigation step.  Running into the end of time is reported as
    /// `Ok(false)`; anything else that goes wrong is a bug in the engine.
    fn navigate<F>(&mut self, step: F) -> Result<bool, NavigationError>
    where
        F: FnOnce(&mut DatePicker<E>) -> Result<(), NavigationError>,
    {
        match step(&mut self.picker) {
            Ok(()) => {
                self.cursor = self.cursor.min(self.days_in_displayed());
                Ok(true)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(_) => Ok(false),
        }
    }

    /// Move the cursor `delta` days, changing months if needed
    fn move_cursor(&mut self, delta: i16) -> Result<bool, NavigationError> {
        let target = i16::from(self.cursor) + delta;
        let days = i16::from(self.days_in_displayed());
        if target < 1 {
            if !self.navigate(DatePicker::previous_month)? {
                return Ok(false);
            }
            self.cursor = day_from(i16::from(self.days_in_displayed()) + target);
        } else if target > days {
            if !self.navigate(DatePicker::next_month)? {
                return Ok(false);
            }
            self.cursor = day_from(target - days);
        } else {
            self.cursor = day_from(target);
        }
        Ok(true)
    }

    fn select_cursor(&mut self) -> bool {
        let grid = self.picker.grid();
        grid.position_of(self.cursor)
            .is_some_and(|position| self.picker.tap(position).is_ok())
    }

    fn days_in_displayed(&self) -> u8 {
        let month = self.picker.displayed();
        self.picker
            .engine()
            .days_in_month(month.year(), month.month())
    }

    fn jump_to(&mut self, date: CalendarDate) {
        self.picker.jump_to(date);
        self.cursor = date.day();
    }

    fn cancel(&mut self) {
        self.picker.cancel();
        self.state = AppState::Done;
    }
}

fn day_from(n: i16) -> u8 {
    u8::try_from(n).unwrap_or(1)
}

impl<E: CalendarEngine> Widget for &mut App<E> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let grid = self.picker.grid();
        let today = self.picker.today();
        let today_position = if today.same_month(&grid.month()) {
            grid.position_of(today.day())
        } else {
            None
        };
        let title = format!("{} {}", self.picker.month_label(), self.picker.year_label());
        Calendar::new(&grid, title)
            .footer(format!("Selected: {}", date_label(self.picker.selected())))
            .cursor(grid.position_of(self.cursor))
            .today(today_position)
            .render(area, buf);
        match self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::Searching(ref mut state) => JumpTo.render(area, buf, state),
            AppState::ChoosingMonth(ref mut state) => MonthList.render(area, buf, state),
            AppState::Calendar | AppState::Done => (),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Searching(JumpToState),
    ChoosingMonth(MonthListState),
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{CURSOR_MODIFIER, TITLE_STYLE, TODAY_STYLE, WEEKDAY_STYLE};
    use luach::{HebrewCalendar, HebrewMonth, PickerConfig, SearchCache};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn hdate(year: i32, month: HebrewMonth, day: u8) -> CalendarDate {
        HebrewCalendar::new().date(year, month, day).unwrap()
    }

    fn picker() -> DatePicker<HebrewCalendar> {
        DatePicker::new(
            HebrewCalendar::new(),
            hdate(5785, HebrewMonth::Tishrei, 10),
            PickerConfig::new(),
            Rc::new(SearchCache::new()),
        )
    }

    fn press(app: &mut App<HebrewCalendar>, keys: &str) {
        for c in keys.chars() {
            assert!(app.handle_key(KeyCode::Char(c)).unwrap(), "key {c:?} rejected");
        }
    }

    #[test]
    fn test_render() {
        let mut app = App::new(picker());
        let area = Rect::new(0, 0, 47, 14);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "                 תשרי ה׳תשפ״ה                  ",
            "  א׳     ב׳     ג׳     ד׳     ה׳     ו׳     ש׳ ",
            "───────────────────────────────────────────────",
            "                              א׳     ב׳     ג׳ ",
            "                                               ",
            "  ד׳     ה׳     ו׳     ז׳     ח׳     ט׳   [ י׳]",
            "                                               ",
            " י״א    י״ב    י״ג    י״ד    ט״ו    ט״ז    י״ז ",
            "                                               ",
            " י״ח    י״ט     כ׳    כ״א    כ״ב    כ״ג    כ״ד ",
            "                                               ",
            " כ״ה    כ״ו    כ״ז    כ״ח    כ״ט     ל׳        ",
            "                                               ",
            "Selected: י׳ תשרי, ה׳תשפ״ה                     ",
        ]);
        expected.set_style(*expected.area(), BASE_STYLE);
        expected.set_style(Rect::new(17, 0, 12, 1), TITLE_STYLE);
        for wd in 0..7 {
            expected.set_style(Rect::new(7 * wd, 1, 5, 1), WEEKDAY_STYLE);
        }
        expected.set_style(
            Rect::new(42, 5, 5, 1),
            TODAY_STYLE.add_modifier(CURSOR_MODIFIER),
        );
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_cursor() {
        let mut app = App::new(picker());
        press(&mut app, "lj");
        assert_eq!(app.cursor, 18);
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert_eq!(app.picker.selected(), hdate(5785, HebrewMonth::Tishrei, 18));
        // Three weeks back crosses into Elul, which has 29 days
        press(&mut app, "kkk");
        assert_eq!(app.picker.displayed(), hdate(5784, HebrewMonth::Elul, 1));
        assert_eq!(app.cursor, 26);
        assert_eq!(app.picker.selected(), hdate(5785, HebrewMonth::Tishrei, 18));
        assert!(app.handle_key(KeyCode::Right).unwrap());
        assert!(app.handle_key(KeyCode::Right).unwrap());
        assert!(app.handle_key(KeyCode::Right).unwrap());
        assert!(app.handle_key(KeyCode::Right).unwrap());
        assert_eq!(app.picker.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_month_and_year_keys() {
        let mut app = App::new(picker());
        press(&mut app, ">]");
        assert_eq!(app.picker.displayed(), hdate(5786, HebrewMonth::Cheshvan, 1));
        press(&mut app, "<<[");
        assert_eq!(app.picker.displayed(), hdate(5784, HebrewMonth::Elul, 1));
        press(&mut app, "0");
        assert_eq!(app.picker.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
        assert_eq!(app.cursor, 10);
        assert!(!app.handle_key(KeyCode::Char('x')).unwrap());
    }

    #[test]
    fn test_end_of_time() {
        let picker = DatePicker::new(
            HebrewCalendar::new(),
            hdate(9999, HebrewMonth::Elul, 29),
            PickerConfig::new(),
            Rc::new(SearchCache::new()),
        );
        let mut app = App::new(picker);
        assert_eq!(app.handle_key(KeyCode::Char('>')), Ok(false));
        assert_eq!(app.handle_key(KeyCode::Char('l')), Ok(false));
        assert_eq!(app.picker.displayed(), hdate(9999, HebrewMonth::Elul, 1));
        assert_eq!(app.cursor, 29);
    }

    #[test]
    fn test_search_month() {
        let mut app = App::new(picker());
        press(&mut app, "/אלול תשפ״ה");
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.picker.displayed(), hdate(5785, HebrewMonth::Elul, 1));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn test_search_year() {
        let mut app = App::new(picker());
        press(&mut app, "gתשפ״ד");
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert!(matches!(app.state, AppState::ChoosingMonth(_)));
        assert!(app.handle_key(KeyCode::Down).unwrap());
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.picker.displayed(), hdate(5784, HebrewMonth::Cheshvan, 1));
    }

    #[test]
    fn test_search_no_match() {
        let mut app = App::new(picker());
        press(&mut app, "/אלול");
        assert!(!app.handle_key(KeyCode::Enter).unwrap());
        assert!(matches!(app.state, AppState::Searching(_)));
        assert!(app.handle_key(KeyCode::Esc).unwrap());
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.picker.displayed(), hdate(5785, HebrewMonth::Tishrei, 1));
    }

    #[test]
    fn test_search_suggestion() {
        let mut app = App::new(picker());
        press(&mut app, "/כסלו");
        assert!(app.handle_key(KeyCode::Down).unwrap());
        assert!(app.handle_key(KeyCode::Enter).unwrap());
        assert_eq!(app.picker.displayed(), hdate(5785, HebrewMonth::Kislev, 1));
    }

    #[test]
    fn test_confirm() {
        let picked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&picked);
        let picker = picker().on_date_set(move |date, label: &str| {
            *sink.borrow_mut() = Some((date, label.to_owned()));
        });
        let mut app = App::new(picker);
        press(&mut app, "l ");
        assert_eq!(*picked.borrow(), None);
        press(&mut app, "o");
        assert!(app.quitting());
        assert_eq!(
            *picked.borrow(),
            Some((
                hdate(5785, HebrewMonth::Tishrei, 11),
                String::from("י״א תשרי, ה׳תשפ״ה")
            ))
        );
    }

    #[test]
    fn test_cancel() {
        let cancelled = Rc::new(RefCell::new(false));
        let sink = Rc::clone(&cancelled);
        let mut app = App::new(picker().on_cancel(move || *sink.borrow_mut() = true));
        press(&mut app, "?");
        assert_eq!(app.state, AppState::Helping);
        press(&mut app, "q");
        assert_eq!(app.state, AppState::Calendar);
        assert!(!*cancelled.borrow());
        press(&mut app, "q");
        assert!(app.quitting());
        assert!(*cancelled.borrow());
    }
}
