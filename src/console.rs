//! Free-text command surface of the activity log.
//!
//! Input is trimmed and matched case-insensitively. `start` keeps the
//! original spelling of its URL argument.

/// Commands listed by `help`.
pub const HELP_TEXT: &str =
    "Available commands: status, help, test, refresh, clear, pause, resume, export, start <tool> <url>";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Help,
    Test,
    Refresh,
    Clear,
    Pause,
    Resume,
    Export,
    Start { tool: String, url: String },
    Unknown(String),
}

impl Command {
    /// Parse one line of input. Blank input yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }

        let mut words = raw.split_whitespace();
        let head = words.next()?.to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let command = match (head.as_str(), rest.as_slice()) {
            ("status", []) => Self::Status,
            ("help", []) => Self::Help,
            ("test", []) => Self::Test,
            ("refresh", []) => Self::Refresh,
            ("clear", []) => Self::Clear,
            ("pause", []) => Self::Pause,
            ("resume", []) => Self::Resume,
            ("export", []) => Self::Export,
            ("start", [tool, url]) => Self::Start {
                tool: tool.to_ascii_lowercase(),
                url: (*url).to_string(),
            },
            _ => Self::Unknown(raw.to_string()),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Command::parse("STATUS"), Some(Command::Status));
        assert_eq!(Command::parse("  Help  "), Some(Command::Help));
        assert_eq!(Command::parse("ReFrEsH"), Some(Command::Refresh));
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t"), None);
    }

    #[test]
    fn start_keeps_url_case() {
        assert_eq!(
            Command::parse("Start CLICK https://Shop.example/Item"),
            Some(Command::Start {
                tool: "click".to_string(),
                url: "https://Shop.example/Item".to_string()
            })
        );
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(
            Command::parse("launch rockets"),
            Some(Command::Unknown("launch rockets".to_string()))
        );
        assert_eq!(
            Command::parse("status now"),
            Some(Command::Unknown("status now".to_string()))
        );
        assert_eq!(
            Command::parse("start click"),
            Some(Command::Unknown("start click".to_string()))
        );
    }
}
