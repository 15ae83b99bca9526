#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),        // any text not starting with '/'
    Open(Option<usize>),   // /open | /open <n> (1-based)
    Help,                  // /help
    Quit,                  // /quit or /exit
    Invalid(String),
    Unknown(String),
}

/// Parse a submitted line. Returns `None` for blank input.
///
/// Keywords are passed through untrimmed apart from surrounding whitespace;
/// encoding happens downstream.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.starts_with('/') {
        return Some(Command::Search(trimmed.to_string()));
    }
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let cmd = match verb {
        "/open" => match rest {
            None => Command::Open(None),
            Some(n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Open(Some(n)),
                _ => Command::Invalid(format!("/open expects a positive number, got `{n}`")),
            },
        },
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    };
    Some(cmd)
}
