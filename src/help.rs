use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Width of the key column
const KEY_WIDTH: usize = 16;

static CALENDAR_KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous day"),
    ("l, RIGHT", "Next day"),
    ("k, UP", "Previous week"),
    ("j, DOWN", "Next week"),
    ("ENTER, SPACE", "Select day"),
    ("<, >", "Previous/next month"),
    ("[, ]", "Previous/next year"),
    ("0, HOME", "Jump to today"),
    ("/, g", "Search for a month"),
    ("o", "OK: report the selected date"),
    ("?", "Show this help"),
    ("q, ESC", "Cancel"),
];

static SEARCH_KEYS: &[(&str, &str)] = &[
    ("UP, DOWN", "Choose a suggestion"),
    ("ENTER", "Go to month or year"),
    ("ESC", "Close search"),
];

static DISMISS: &str = "Press the Any Key to dismiss.";

/// Key reference drawn over the calendar
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let keys = |table: &'static [(&str, &str)]| {
            table
                .iter()
                .map(|(key, what)| Line::raw(format!("{key:<KEY_WIDTH$}{what}")))
        };
        let mut lines = keys(CALENDAR_KEYS).collect::<Vec<_>>();
        lines.push(Line::raw(""));
        lines.push(Line::raw("In search:"));
        lines.extend(keys(SEARCH_KEYS));
        lines.push(Line::raw(""));
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // One column of padding either side of the border
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0)
            .render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Cell;

    fn row(buf: &Buffer, y: u16) -> String {
        let area = buf.area();
        (area.x..area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_text() {
        let text = Help::text();
        assert_eq!(
            text.height(),
            CALENDAR_KEYS.len() + SEARCH_KEYS.len() + 4
        );
        assert_eq!(text.lines[4].to_string(), "ENTER, SPACE    Select day");
        assert_eq!(text.width(), KEY_WIDTH + "OK: report the selected date".len());
    }

    #[test]
    fn test_render() {
        let area = Rect::new(0, 0, 60, 25);
        let mut buffer = Buffer::filled(area, Cell::new("x"));
        Help(Style::new()).render(area, &mut buffer);
        // 44 columns and 19 lines of text plus the border, centered
        let top = row(&buffer, 2);
        assert!(top.starts_with("xxxxxx ┌"));
        assert!(top.contains(" Commands "));
        assert!(top.ends_with("┐ xxxxxx"));
        assert!(row(&buffer, 3).starts_with("xxxxxx │h, LEFT         Previous day"));
        assert!(row(&buffer, 21).contains("│Press the Any Key to dismiss."));
        assert!(row(&buffer, 22).starts_with("xxxxxx └"));
        assert_eq!(row(&buffer, 1), "x".repeat(60));
    }
}
