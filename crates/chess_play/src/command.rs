//! Parses the lines typed at the prompt.

use std::path::PathBuf;

use chess_core::Square;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Click(Square),
    Drag { from: Square, to: Square },
    Undo,
    Reset,
    Flip,
    Jump(usize),
    History,
    Save(PathBuf),
    Status,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    let command = match (first.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("undo" | "u", []) => Command::Undo,
        ("reset" | "new", []) => Command::Reset,
        ("flip", []) => Command::Flip,
        ("history" | "moves", []) => Command::History,
        ("status", []) => Command::Status,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        ("jump", [ply]) => Command::Jump(
            ply.parse()
                .map_err(|_| format!("jump needs a ply number, got {ply}"))?,
        ),
        ("save", [path]) => Command::Save(PathBuf::from(path)),
        (word, []) if word.is_ascii() && word.len() == 2 => Command::Click(word.parse()?),
        (word, []) if word.is_ascii() && word.len() == 4 => Command::Drag {
            from: word[0..2].parse()?,
            to: word[2..4].parse()?,
        },
        (from, [to]) if from.len() == 2 => Command::Drag {
            from: from.parse()?,
            to: to.to_ascii_lowercase().parse()?,
        },
        _ => return Err(format!("unknown command: {}", line.trim())),
    };
    Ok(command)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
