use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, clock::Clock, page::Page, session::Phase};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let prompt = self.prompt();
        let overlay = self.page.text(self.layout.overlay);
        let value = self.page.value(self.layout.input);

        let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_lines = ((prompt.width() as f64 / inner_width as f64).ceil() as u16).max(1);
        let input_lines = ((value.width() as f64 / inner_width.saturating_sub(2).max(1) as f64)
            .ceil() as u16)
            .max(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(prompt_lines + 1),
                Constraint::Length(input_lines + 2),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        // correct prefix highlighted, the rest still to type
        let rest: String = prompt.chars().skip(overlay.chars().count()).collect();
        Paragraph::new(Line::from(vec![
            Span::styled(overlay, green_bold_style),
            Span::styled(rest, dim_bold_style),
        ]))
        .wrap(Wrap { trim: false })
        .render(chunks[0], buf);

        let border_style = if self.has_error() {
            Style::default().fg(Color::Red)
        } else if self.test.phase() == Phase::Completed {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Paragraph::new(value)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title("answer"),
            )
            .wrap(Wrap { trim: false })
            .render(chunks[1], buf);

        let stats = Line::from(vec![
            Span::styled(self.page.text(self.layout.stats), bold_style),
            Span::raw(" wpm   "),
            Span::styled(self.page.text(self.layout.progress), bold_style),
            Span::raw("   completed: "),
            Span::raw(self.page.text(self.layout.completed)),
        ]);
        Paragraph::new(stats).render(chunks[2], buf);

        if let Some(completion) = &self.completion {
            Paragraph::new(Span::styled(
                format!(
                    "finished at {} wpm ({} keys, {} errors)",
                    completion.wpm, completion.keystrokes, completion.errors
                ),
                green_bold_style,
            ))
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled(
            "(ctrl-r) reset / (esc) quit",
            italic_style.add_modifier(Modifier::DIM),
        ))
        .render(chunks[4], buf);
    }
}
