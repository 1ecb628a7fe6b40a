mod action;
mod auth;
mod completion;
mod event;
mod identity;
mod loading;
mod slash_commands;
mod textarea;
mod turn;

pub use action::*;
pub use auth::*;
pub use completion::*;
pub use event::*;
pub use identity::*;
pub use loading::*;
pub use slash_commands::*;
pub use textarea::*;
pub use turn::*;
