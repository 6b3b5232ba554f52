/// A single line typed by the opponent.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Drop a piece into the column.
    Move(u8),
    /// Print the board again.
    Board,
    /// Print the search statistics of the current position.
    Stats,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        match input {
            "board" | "d" => Self::Board,
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => input
                .parse::<u8>()
                .map_or_else(|_| Self::Unknown(input.to_string()), Self::Move),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_move() {
        assert_eq!(Command::parse("3"), Command::Move(3));
        assert_eq!(Command::parse("  0\n"), Command::Move(0));
        assert_eq!(Command::parse("42"), Command::Move(42));
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(Command::parse("board"), Command::Board);
        assert_eq!(Command::parse("d"), Command::Board);
        assert_eq!(Command::parse("stats\n"), Command::Stats);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn malformed() {
        assert_eq!(Command::parse("three"), Command::Unknown("three".to_string()));
        assert_eq!(Command::parse("-1"), Command::Unknown("-1".to_string()));
        assert_eq!(Command::parse("300"), Command::Unknown("300".to_string()));
        assert_eq!(Command::parse("3.5"), Command::Unknown("3.5".to_string()));
        assert_eq!(Command::parse("\n"), Command::Unknown(String::new()));
    }
}
