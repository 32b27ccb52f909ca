/// Slash commands the bot understands. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Login,
    Logout,
    SetCaption,
    SetTag,
}

impl Command {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "setcaption" => Some(Self::SetCaption),
            "settag" => Some(Self::SetTag),
            _ => None,
        }
    }

    /// Commands that are silently ignored for unauthenticated senders.
    pub fn is_admin_only(self) -> bool {
        matches!(self, Self::SetCaption | Self::SetTag)
    }
}

/// Split `/cmd@bot rest of text` into `("cmd", "rest of text")`.
///
/// Returns `None` when `text` is not a slash command.
pub fn split_command(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('/')?;
    let (head, rest) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    let token = head.split_once('@').map_or(head, |(name, _)| name);
    Some((token, rest.trim_start()))
}
