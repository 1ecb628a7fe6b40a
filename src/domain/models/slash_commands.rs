#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let cmd = SlashCommand {
            command: text.trim().split(' ').next().unwrap_or_default().to_string(),
        };
        if cmd.is_quit() || cmd.is_logout() || cmd.is_reset() || cmd.is_help() {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_logout(&self) -> bool {
        return ["/l", "/logout"].contains(&self.command.as_str());
    }

    pub fn is_reset(&self) -> bool {
        return ["/r", "/reset"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
