use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

fn with_title<'a>(title: &'a str) -> tui_textarea::TextArea<'a> {
    let mut textarea = tui_textarea::TextArea::default();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .title(title)
            .padding(Padding::new(1, 1, 0, 0)),
    );

    return textarea;
}

pub struct TextArea {}

impl<'a> TextArea {
    pub fn prompt() -> tui_textarea::TextArea<'a> {
        return with_title("Type your message");
    }

    pub fn email() -> tui_textarea::TextArea<'a> {
        return with_title("Email");
    }

    pub fn password() -> tui_textarea::TextArea<'a> {
        let mut textarea = with_title("Password");
        textarea.set_mask_char('\u{2022}');

        return textarea;
    }

    /// Shows or hides the cursor so only the focused field looks editable.
    pub fn set_focus(textarea: &mut tui_textarea::TextArea<'a>, focused: bool) {
        if focused {
            textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        } else {
            textarea.set_cursor_style(Style::default());
        }
    }

    pub fn text(textarea: &tui_textarea::TextArea<'a>) -> String {
        return textarea.lines().join("\n");
    }
}
