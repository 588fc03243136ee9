use crate::theme::{
    jumpto::{ERROR_STYLE, HIGHLIGHT_STYLE, PROMPT_STYLE},
    BASE_STYLE,
};
use luach::{CalendarDate, SearchEntry};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 36;
const OUTER_HEIGHT: u16 = 14;

/// Number of suggestions shown below the query
pub(crate) const MAX_SUGGESTIONS: usize = 6;

static HINT: &str = "ENTER: go   ESC: close";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpTo;

impl StatefulWidget for JumpTo {
    type State = JumpToState;

    /*
     * ....................................
     * .┌──────────── Jump To… ──────────┐.
     * .│> אלול תשפ״ה_                   │.
     * .│                                │.
     * .│  אלול תשפ״ה                    │.
     * .│  …up to six suggestions…       │.
     * .│                                │.
     * .│ENTER: go   ESC: close          │.
     * .└────────────────────────────────┘.
     * ....................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Jump To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Contents of the search dialog: the query typed so far, the months it
/// currently matches, and any error from the last attempt to resolve it
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    query: String,
    suggestions: Vec<SearchEntry>,
    highlighted: Option<usize>,
    error: Option<String>,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    /// Replace the suggestion list, e.g. after the query was edited
    pub(crate) fn set_suggestions(&mut self, suggestions: Vec<SearchEntry>) {
        self.suggestions = suggestions;
        self.highlighted = None;
    }

    /// Show `msg` in place of the key hint until the query is next edited
    pub(crate) fn set_error(&mut self, msg: String) {
        self.error = Some(msg);
    }

    fn to_text(&self) -> Text<'_> {
        let mut lines = Vec::with_capacity(MAX_SUGGESTIONS + 4);
        lines.push(Line::from_iter([
            Span::styled("> ", PROMPT_STYLE),
            Span::styled(self.query.as_str(), BASE_STYLE),
            Span::styled("_", BASE_STYLE),
        ]));
        lines.push(Line::styled("", BASE_STYLE));
        for (i, entry) in self.suggestions.iter().take(MAX_SUGGESTIONS).enumerate() {
            let style = if self.highlighted == Some(i) {
                HIGHLIGHT_STYLE
            } else {
                BASE_STYLE
            };
            lines.push(Line::from_iter([
                Span::styled("  ", BASE_STYLE),
                Span::styled(entry.label.as_str(), style),
            ]));
        }
        while lines.len() < MAX_SUGGESTIONS + 3 {
            lines.push(Line::styled("", BASE_STYLE));
        }
        lines.push(match self.error {
            Some(ref msg) => Line::styled(msg.as_str(), ERROR_STYLE),
            None => Line::styled(HINT, BASE_STYLE),
        });
        Text::from(lines)
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        let shown = self.suggestions.len().min(MAX_SUGGESTIONS);
        match input {
            JumpToInput::Char(c) => {
                self.query.push(c);
                self.error = None;
                JumpToOutput::Edited
            }
            JumpToInput::Backspace => {
                if self.query.pop().is_some() {
                    self.error = None;
                    JumpToOutput::Edited
                } else {
                    JumpToOutput::Invalid
                }
            }
            JumpToInput::Down => match self.highlighted {
                None if shown > 0 => {
                    self.highlighted = Some(0);
                    JumpToOutput::Ok
                }
                Some(i) if i + 1 < shown => {
                    self.highlighted = Some(i + 1);
                    JumpToOutput::Ok
                }
                _ => JumpToOutput::Invalid,
            },
            JumpToInput::Up => match self.highlighted {
                Some(0) => {
                    self.highlighted = None;
                    JumpToOutput::Ok
                }
                Some(i) => {
                    self.highlighted = Some(i - 1);
                    JumpToOutput::Ok
                }
                None => JumpToOutput::Invalid,
            },
            JumpToInput::Enter => match self.highlighted.and_then(|i| self.suggestions.get(i)) {
                Some(entry) => JumpToOutput::Jump(entry.anchor),
                None => JumpToOutput::Search(self.query.clone()),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Char(char),
    Backspace,
    Up,
    Down,
    Enter,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    /// The query changed; suggestions should be refreshed
    Edited,
    /// A suggestion was chosen
    Jump(CalendarDate),
    /// The query should be resolved
    Search(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use luach::{CalendarEngine, HebrewCalendar, HebrewMonth};
    use ratatui::style::Modifier;
    use std::ops::Range;

    fn entry(year: i32, month: HebrewMonth, label: &str) -> SearchEntry {
        SearchEntry {
            label: String::from(label),
            anchor: HebrewCalendar::new().date(year, month, 1).unwrap(),
        }
    }

    fn adar_state() -> JumpToState {
        let mut state = JumpToState::new();
        for c in "אדר".chars() {
            assert_eq!(state.handle_input(JumpToInput::Char(c)), JumpToOutput::Edited);
        }
        state.set_suggestions(vec![
            entry(5787, HebrewMonth::AdarI, "אדר א׳ תשפ״ז"),
            entry(5787, HebrewMonth::AdarII, "אדר ב׳ תשפ״ז"),
        ]);
        state
    }

    fn row(buf: &Buffer, y: u16, xs: Range<u16>) -> String {
        xs.map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_typing() {
        let mut state = adar_state();
        assert_eq!(state.query(), "אדר");
        assert_eq!(state.handle_input(JumpToInput::Backspace), JumpToOutput::Edited);
        assert_eq!(state.query(), "אד");
        state.handle_input(JumpToInput::Backspace);
        state.handle_input(JumpToInput::Backspace);
        assert_eq!(state.handle_input(JumpToInput::Backspace), JumpToOutput::Invalid);
        assert_eq!(
            state.handle_input(JumpToInput::Enter),
            JumpToOutput::Search(String::new())
        );
    }

    #[test]
    fn test_suggestion_keys() {
        let mut state = adar_state();
        assert_eq!(state.handle_input(JumpToInput::Up), JumpToOutput::Invalid);
        assert_eq!(state.handle_input(JumpToInput::Down), JumpToOutput::Ok);
        assert_eq!(state.handle_input(JumpToInput::Down), JumpToOutput::Ok);
        assert_eq!(state.handle_input(JumpToInput::Down), JumpToOutput::Invalid);
        let adar_ii = HebrewCalendar::new()
            .date(5787, HebrewMonth::AdarII, 1)
            .unwrap();
        assert_eq!(
            state.handle_input(JumpToInput::Enter),
            JumpToOutput::Jump(adar_ii)
        );
        state.handle_input(JumpToInput::Up);
        state.handle_input(JumpToInput::Up);
        assert_eq!(
            state.handle_input(JumpToInput::Enter),
            JumpToOutput::Search(String::from("אדר"))
        );
    }

    #[test]
    fn test_error_cleared_by_edit() {
        let mut state = adar_state();
        state.set_error(String::from("no month matches"));
        assert_eq!(state.error.as_deref(), Some("no month matches"));
        state.handle_input(JumpToInput::Char(' '));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_render() {
        let mut state = adar_state();
        state.handle_input(JumpToInput::Down);
        state.handle_input(JumpToInput::Down);
        let area = Rect::new(0, 0, 40, 16);
        let mut buffer = Buffer::empty(area);
        JumpTo.render(area, &mut buffer, &mut state);
        assert!(row(&buffer, 2, 3..37).contains(" Jump To… "));
        assert_eq!(row(&buffer, 3, 4..36).trim_end(), "> אדר_");
        assert_eq!(row(&buffer, 4, 4..36).trim_end(), "");
        assert_eq!(row(&buffer, 5, 4..36).trim_end(), "  אדר א׳ תשפ״ז");
        assert_eq!(row(&buffer, 6, 4..36).trim_end(), "  אדר ב׳ תשפ״ז");
        assert_eq!(row(&buffer, 12, 4..36).trim_end(), HINT);
        assert_eq!(buffer[(3, 5)].symbol(), "│");
        assert!(!buffer[(6, 5)].modifier.contains(Modifier::REVERSED));
        assert!(buffer[(6, 6)].modifier.contains(Modifier::REVERSED));
        // Padding before the label is not highlighted
        assert!(!buffer[(5, 6)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_render_error() {
        let mut state = adar_state();
        state.set_error(String::from("no month matches \"אדר\""));
        let area = Rect::new(0, 0, 40, 16);
        let mut buffer = Buffer::empty(area);
        JumpTo.render(area, &mut buffer, &mut state);
        assert_eq!(
            row(&buffer, 12, 4..36).trim_end(),
            "no month matches \"אדר\""
        );
        assert_eq!(buffer[(4, 12)].fg, ERROR_STYLE.fg.unwrap());
    }
}
