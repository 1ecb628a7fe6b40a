pub mod huggingface;

use crate::domain::models::CompletionBox;

pub struct CompletionManager {}

impl CompletionManager {
    pub fn get() -> CompletionBox {
        return Box::<huggingface::HuggingFace>::default();
    }
}
