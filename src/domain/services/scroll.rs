#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

const PAGE: u16 = 10;

/// Vertical offset into the transcript. The newest exchange renders first, so
/// position 0 is the latest content.
#[derive(Default)]
pub struct Scroll {
    list_length: u16,
    viewport_length: u16,
    pub position: u16,
}

impl Scroll {
    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn up_page(&mut self) {
        for _ in 0..PAGE {
            self.up();
        }
    }

    pub fn down(&mut self) {
        self.position = self.position.saturating_add(1).min(self.max_position());
    }

    pub fn down_page(&mut self) {
        for _ in 0..PAGE {
            self.down();
        }
    }

    pub fn top(&mut self) {
        self.position = 0;
    }

    pub fn set_state(&mut self, list_length: u16, viewport_length: u16) {
        self.list_length = list_length;
        self.viewport_length = viewport_length;
        self.position = self.position.min(self.max_position());
    }

    fn max_position(&self) -> u16 {
        return self.list_length.saturating_sub(self.viewport_length);
    }
}
