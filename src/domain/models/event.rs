use tui_textarea::Input;

use super::AuthError;
use super::CompletionPrompt;
use super::CompletionReply;
use super::Identity;

#[derive(Debug)]
pub enum Event {
    CompletionResponse(CompletionPrompt, CompletionReply),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLL(),
    KeyboardCTRLR(),
    KeyboardEnter(),
    KeyboardPaste(String),
    KeyboardTab(),
    LoginResponse(u64, Result<Identity, AuthError>),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
}
