#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;

use crate::domain::models::Exchange;
use crate::domain::models::ERROR_MARKER;

const USER_LABEL: &str = "You: ";
const ASSISTANT_LABEL: &str = "Bot: ";

// Borders plus horizontal padding.
const FRAME_WIDTH: usize = 4;

fn label_style(color: Color) -> Style {
    return Style::default().fg(color).add_modifier(Modifier::BOLD);
}

/// Greedy word wrap by character count. Words longer than the width are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = vec![];

    for line in text.lines() {
        let mut row = String::new();
        let mut row_len = 0;

        for word in line.split(' ') {
            let mut word = word.to_string();
            let mut word_len = word.chars().count();

            while word_len > width {
                if row_len > 0 {
                    rows.push(row);
                    row = String::new();
                    row_len = 0;
                }
                let head = word.chars().take(width).collect::<String>();
                word = word.chars().skip(width).collect::<String>();
                word_len -= width;
                rows.push(head);
            }

            if row_len > 0 && row_len + 1 + word_len > width {
                rows.push(row);
                row = String::new();
                row_len = 0;
            }
            if row_len > 0 {
                row.push(' ');
                row_len += 1;
            }

            row.push_str(&word);
            row_len += word_len;
        }

        rows.push(row);
    }

    if rows.is_empty() {
        rows.push("".to_string());
    }

    return rows;
}

fn labelled_lines(
    label: &'static str,
    label_color: Color,
    text: &str,
    text_style: Style,
    width: usize,
) -> Vec<Line<'static>> {
    let indent = " ".repeat(label.chars().count());
    let rows = wrap(text, width.saturating_sub(label.chars().count()));

    return rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let prefix = if idx == 0 {
                Span::styled(label, label_style(label_color))
            } else {
                Span::raw(indent.clone())
            };

            return Line::from(vec![prefix, Span::styled(row, text_style)]);
        })
        .collect();
}

/// Laid out view of the display log for a given width.
#[derive(Default)]
pub struct Transcript {
    lines: Vec<Line<'static>>,
}

impl Transcript {
    pub fn set_exchanges(&mut self, exchanges: &[Exchange], width: u16) {
        let text_width = usize::from(width).saturating_sub(FRAME_WIDTH);

        let mut lines = vec![];
        for (idx, exchange) in exchanges.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::from(""));
            }

            lines.extend(labelled_lines(
                USER_LABEL,
                Color::Cyan,
                &exchange.prompt,
                Style::default(),
                text_width,
            ));

            let (reply, style) = match &exchange.reply {
                Some(reply) if reply.starts_with(ERROR_MARKER) => {
                    (reply.as_str(), Style::default().fg(Color::Red))
                }
                Some(reply) => (reply.as_str(), Style::default()),
                None => ("(no reply)", Style::default().add_modifier(Modifier::DIM)),
            };
            lines.extend(labelled_lines(
                ASSISTANT_LABEL,
                Color::Green,
                reply,
                style,
                text_width,
            ));
        }

        self.lines = lines;
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn widget(&self, title: &str, position: u16) -> Paragraph<'static> {
        return Paragraph::new(self.lines.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(title.to_string())
                    .padding(Padding::new(1, 1, 0, 0)),
            )
            .scroll((position, 0));
    }
}
