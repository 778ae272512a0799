use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    scoring::Score,
    session::{SessionView, Status},
};

const PASSAGE_WIDTH: u16 = 54;
const VERTICAL_MARGIN: u16 = 1;

/// Every styled element of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Correct,
    Mistake,
    Cursor,
    NotTyped,
    Header,
    Keybind,
    Spacer,
    Timer,
    Score,
}

impl Element {
    const COUNT: usize = 9;
}

/// Styles indexed by [`Element`]
#[derive(Debug, Clone)]
pub struct Palette {
    styles: [Style; Element::COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        let grey = Color::Rgb(0x59, 0x59, 0x59);
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let mut styles = [Style::default(); Element::COUNT];
        styles[Element::Correct as usize] = bold.fg(Color::White);
        styles[Element::Mistake as usize] = bold.fg(Color::Red);
        styles[Element::Cursor as usize] = Style::default()
            .fg(grey)
            .add_modifier(Modifier::UNDERLINED);
        styles[Element::NotTyped as usize] = Style::default().fg(grey);
        styles[Element::Header as usize] = Style::default().fg(Color::White);
        styles[Element::Keybind as usize] = Style::default().fg(grey);
        styles[Element::Spacer as usize] = Style::default().fg(Color::White);
        styles[Element::Timer as usize] = Style::default().fg(Color::Red);
        styles[Element::Score as usize] = bold.fg(Color::Magenta);

        Self { styles }
    }
}

impl Palette {
    pub fn style(&self, element: Element) -> Style {
        self.styles[element as usize]
    }
}

/// `esc Exit | enter Reset | 1 Length | 2 Live WPM`
fn keybind_line(palette: &Palette) -> Line<'static> {
    let bindings = [("esc", "Exit"), ("enter", "Reset"), ("1", "Length"), ("2", "Live WPM")];

    let mut spans = Vec::with_capacity(bindings.len() * 3);
    for (i, (key, label)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", palette.style(Element::Header)));
        }
        spans.push(Span::styled(*key, palette.style(Element::Keybind)));
        spans.push(Span::styled(format!(" {label}"), palette.style(Element::Header)));
    }
    Line::from(spans)
}

/// Target passage coloured against what has been typed.
pub fn passage_spans<'a>(view: &SessionView<'a>, palette: &Palette) -> Vec<Span<'a>> {
    let mut typed = view.typed.chars();
    let typed_len = view.typed.chars().count();
    let cursor_visible = view.status != Status::Finished;

    view.target
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed.next() {
            Some(c) if c == expected => {
                Span::styled(expected.to_string(), palette.style(Element::Correct))
            }
            Some(c) => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                palette.style(Element::Mistake),
            ),
            None if cursor_visible && idx == typed_len => {
                Span::styled(expected.to_string(), palette.style(Element::Cursor))
            }
            None => Span::styled(expected.to_string(), palette.style(Element::NotTyped)),
        })
        .collect()
}

/// One-line score readout shown live and at the end of a session
pub fn score_line(score: &Score) -> String {
    format!("{:.1} wpm   {}% acc", score.wpm, score.accuracy_percent())
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::default();
        let view = self.session.view();

        let header = keybind_line(&palette);
        let content_width = (header.width() as u16).max(PASSAGE_WIDTH);
        let area = centered(area, content_width);

        let passage_lines = (view.target.width() as f64 / area.width.max(1) as f64).ceil() as u16 + 1;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),             // keybinds
                Constraint::Length(1),             // separator
                Constraint::Length(1),             // padding
                Constraint::Length(passage_lines), // passage
                Constraint::Length(1),             // timer
                Constraint::Length(1),             // score
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(header).render(chunks[0], buf);

        Paragraph::new(Span::styled(
            "-".repeat(area.width as usize),
            palette.style(Element::Spacer),
        ))
        .render(chunks[1], buf);

        Paragraph::new(Line::from(passage_spans(&view, &palette)))
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            format!("{}s", view.time_left),
            palette.style(Element::Timer),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        let show_score = match view.status {
            Status::Finished => true,
            Status::Active => view.live_score,
            Status::Idle => false,
        };
        if show_score {
            Paragraph::new(Span::styled(
                score_line(&self.session.score()),
                palette.style(Element::Score),
            ))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
        }
    }
}
