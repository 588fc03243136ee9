use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const PROMPT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const HIGHLIGHT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

    pub(crate) const ERROR_STYLE: Style = BASE_STYLE.fg(Color::LightRed);
}
