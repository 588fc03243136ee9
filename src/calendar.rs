use crate::theme::{
    BASE_STYLE, CURSOR_MODIFIER, DISABLED_STYLE, TITLE_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use luach::format::WEEKDAY_INITIALS;
use luach::MonthGrid;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Widget,
};
use std::iter::zip;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Width of a single day's cell, including the brackets drawn around the
/// selected day
const CELL_WIDTH: u16 = 5;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 6 + CELL_WIDTH;

const TITLE_LINE: u16 = 0;

const HEADER_LINE: u16 = 1;

const RULE_LINE: u16 = 2;

/// Number of lines above the first week
const TOP_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

const ACS_HLINE: char = '─';

/// One month of days, Sunday on the left, with a title above and a status
/// line below
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<'a> {
    grid: &'a MonthGrid,
    title: String,
    footer: String,
    cursor: Option<usize>,
    today: Option<usize>,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, title: String) -> Calendar<'a> {
        Calendar {
            grid,
            title,
            footer: String::new(),
            cursor: None,
            today: None,
        }
    }

    pub(crate) fn footer(mut self, footer: String) -> Self {
        self.footer = footer;
        self
    }

    /// Grid position to draw in reverse video
    pub(crate) fn cursor(mut self, position: Option<usize>) -> Self {
        self.cursor = position;
        self
    }

    /// Grid position of today's date
    pub(crate) fn today(mut self, position: Option<usize>) -> Self {
        self.today = position;
        self
    }
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(&self.title);
        canvas.draw_header();
        let mut week_qty = 0;
        for (week_no, week) in zip(0u16.., self.grid.weeks()) {
            for (wd, cell) in zip(0u16.., week) {
                if cell.is_blank() {
                    continue;
                }
                let position = usize::from(week_no) * 7 + usize::from(wd);
                let text = if self.grid.selection() == Some(position) {
                    format!("[{:>3}]", cell.label)
                } else {
                    format!(" {:>3} ", cell.label)
                };
                let mut style = if cell.disabled {
                    DISABLED_STYLE
                } else if self.today == Some(position) {
                    TODAY_STYLE
                } else {
                    BASE_STYLE
                };
                if self.cursor == Some(position) {
                    style = style.add_modifier(CURSOR_MODIFIER);
                }
                canvas.draw_day(week_no, wd, text, style);
            }
            week_qty = week_no + 1;
        }
        canvas.mvprint(
            TOP_LINES + week_qty * WEEK_LINES,
            0,
            &self.footer,
            BASE_STYLE,
        );
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(Line::raw(title).width()).unwrap_or(u16::MAX);
        let x = MAIN_WIDTH.saturating_sub(width) / 2;
        self.mvprint(TITLE_LINE, x, title, TITLE_STYLE);
    }

    fn draw_header(&mut self) {
        for (wd, initial) in zip(0u16.., WEEKDAY_INITIALS) {
            self.mvprint(
                HEADER_LINE,
                DAY_WIDTH * wd,
                format!(" {initial:>3} "),
                WEEKDAY_STYLE,
            );
        }
        self.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day<S: AsRef<str>>(&mut self, week_no: u16, wd: u16, s: S, style: Style) {
        self.mvprint(TOP_LINES + week_no * WEEK_LINES, DAY_WIDTH * wd, s, style);
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            // `set_stringn` stops at the edge of the buffer, not of our area
            let width = usize::from(self.area.width - x);
            self.buf
                .set_stringn(x + self.area.x, y + self.area.y, s, width, style);
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(
            y,
            x,
            String::from(ch).repeat(length.into()),
            BASE_STYLE,
        );
    }
}
