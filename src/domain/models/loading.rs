use ratatui::layout::Alignment;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;

const FRAMES: [&str; 4] = ["Thinking   ", "Thinking.  ", "Thinking.. ", "Thinking..."];

#[derive(Default)]
pub struct Loading {
    frame: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn widget(&self) -> Paragraph<'static> {
        return Paragraph::new(FRAMES[self.frame])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .padding(Padding::new(1, 1, 0, 0)),
            )
            .alignment(Alignment::Center);
    }
}
