//! Keyboard commands read from stdin, one per line.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleTalked,
    ToggleIssue,
    Rename(String),
    Quit,
    Redraw,
    Unknown(String),
}

pub const HELP: &str = "t: toggle done  i: toggle issue  n <name>: rename  q: leave";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let (head, rest) = match line.trim_start().split_once(' ') {
        Some((head, rest)) => (head, Some(rest)),
        None => (line.trim(), None),
    };
    match (head, rest) {
        ("t", None) => Command::ToggleTalked,
        ("i", None) => Command::ToggleIssue,
        ("q", None) | ("quit", None) => Command::Quit,
        ("n", None) => Command::Rename(String::new()),
        ("n", Some(name)) => Command::Rename(name.trim().to_string()),
        ("", None) => Command::Redraw,
        _ => Command::Unknown(line.trim().to_string()),
    }
}
