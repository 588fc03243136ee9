use crate::theme::{jumpto::HIGHLIGHT_STYLE, BASE_STYLE};
use luach::format::long_year;
use luach::{CalendarDate, SearchEntry};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 24;

/// Border and margin lines around the list
const FRAME_LINES: u16 = 4;

/// Pick one month out of a year, after a search that named only the year
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthList;

impl StatefulWidget for MonthList {
    type State = MonthListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let text = state.to_text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(FRAME_LINES);
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(format!(" {} ", state.title))
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        text.render(block_area.inner(Margin::new(1, 1)), buf);
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthListState {
    title: String,
    choices: Vec<SearchEntry>,
    highlighted: usize,
}

impl MonthListState {
    pub(crate) fn new(year: i32, choices: Vec<SearchEntry>) -> MonthListState {
        MonthListState {
            title: long_year(year),
            choices,
            highlighted: 0,
        }
    }

    fn to_text(&self) -> Text<'_> {
        Text::from_iter(self.choices.iter().enumerate().map(|(i, entry)| {
            let style = if i == self.highlighted {
                HIGHLIGHT_STYLE
            } else {
                BASE_STYLE
            };
            Line::styled(entry.label.as_str(), style)
        }))
        .centered()
    }

    pub(crate) fn handle_input(&mut self, input: MonthListInput) -> MonthListOutput {
        match input {
            MonthListInput::Up if self.highlighted > 0 => {
                self.highlighted -= 1;
                MonthListOutput::Ok
            }
            MonthListInput::Down if self.highlighted + 1 < self.choices.len() => {
                self.highlighted += 1;
                MonthListOutput::Ok
            }
            MonthListInput::Enter => match self.choices.get(self.highlighted) {
                Some(entry) => MonthListOutput::Jump(entry.anchor),
                None => MonthListOutput::Invalid,
            },
            _ => MonthListOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MonthListInput {
    Up,
    Down,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MonthListOutput {
    Ok,
    Invalid,
    Jump(CalendarDate),
}

#[cfg(test)]
mod tests {
    use super::*;
    use luach::{CalendarEngine, HebrewCalendar, HebrewMonth, Policy, SearchIndex, SearchOutcome};

    fn year_5784() -> MonthListState {
        let cal = HebrewCalendar::new();
        let today = cal.date(5785, HebrewMonth::Tishrei, 10).unwrap();
        let index = SearchIndex::build(&cal, today).unwrap();
        match index.query(&cal, "תשפ״ד", today, Policy::new()) {
            Ok(SearchOutcome::Year { year, choices }) => MonthListState::new(year, choices),
            r => panic!("expected a year, got {r:?}"),
        }
    }

    #[test]
    fn test_choose() {
        let mut state = year_5784();
        assert_eq!(state.title, "ה׳תשפ״ד");
        assert_eq!(state.choices.len(), 13);
        assert_eq!(state.handle_input(MonthListInput::Up), MonthListOutput::Invalid);
        for _ in 0..6 {
            assert_eq!(state.handle_input(MonthListInput::Down), MonthListOutput::Ok);
        }
        let cal = HebrewCalendar::new();
        assert_eq!(
            state.handle_input(MonthListInput::Enter),
            MonthListOutput::Jump(cal.date(5784, HebrewMonth::AdarII, 1).unwrap())
        );
        for _ in 0..6 {
            assert_eq!(state.handle_input(MonthListInput::Down), MonthListOutput::Ok);
        }
        assert_eq!(state.handle_input(MonthListInput::Down), MonthListOutput::Invalid);
    }

    #[test]
    fn test_render() {
        let mut state = year_5784();
        state.handle_input(MonthListInput::Down);
        let area = Rect::new(0, 0, 30, 21);
        let mut buffer = Buffer::empty(area);
        MonthList.render(area, &mut buffer, &mut state);
        // 13 months plus the frame, centered in 21 lines
        let top = 2;
        let title_row = (3..27)
            .map(|x| buffer[(x, top + 1)].symbol())
            .collect::<String>();
        assert!(title_row.contains(" ה׳תשפ״ד "));
        let row = |y: u16| {
            (5..25)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim()
                .to_owned()
        };
        assert_eq!(row(top + 2), "תשרי תשפ״ד");
        assert_eq!(row(top + 3), "חשוון תשפ״ד");
        assert_eq!(row(top + 14), "אלול תשפ״ד");
    }
}
