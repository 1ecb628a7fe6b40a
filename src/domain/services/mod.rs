pub mod actions;
mod app_state;
pub mod events;
mod scroll;
mod session_store;
mod transcript;

pub use app_state::*;
pub use scroll::*;
pub use session_store::*;
pub use transcript::*;
