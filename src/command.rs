//! REPL input parsing

use crate::conversation::TurnId;
use crate::feedback::Rating;
use crate::render::SUGGESTIONS;
use thiserror::Error;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    ToggleSources(TurnId),
    Rate {
        turn: TurnId,
        rating: Rating,
        comment: Option<String>,
    },
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command /{0}, try /help")]
    Unknown(String),
    #[error("there are {} suggestions", SUGGESTIONS.len())]
    NoSuchSuggestion,
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Ask(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    match name {
        "sources" => {
            let turn = turn_arg(words.next()).ok_or(CommandError::Usage("/sources N"))?;
            Ok(Command::ToggleSources(turn))
        }
        "rate" => {
            const USAGE: &str = "/rate N up|down [comment]";
            let turn = turn_arg(words.next()).ok_or(CommandError::Usage(USAGE))?;
            let rating = match words.next() {
                Some("up" | "+") => Rating::HELPFUL,
                Some("down" | "-") => Rating::NOT_HELPFUL,
                Some(value) => value
                    .parse::<u8>()
                    .ok()
                    .and_then(Rating::new)
                    .ok_or(CommandError::Usage(USAGE))?,
                None => return Err(CommandError::Usage(USAGE)),
            };
            let comment = words.collect::<Vec<_>>().join(" ");
            Ok(Command::Rate {
                turn,
                rating,
                comment: (!comment.is_empty()).then_some(comment),
            })
        }
        "suggest" => {
            let index = words
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or(CommandError::Usage("/suggest N"))?;
            index
                .checked_sub(1)
                .and_then(|i| SUGGESTIONS.get(i))
                .map(|s| Command::Ask((*s).to_string()))
                .ok_or(CommandError::NoSuchSuggestion)
        }
        "dismiss" => Ok(Command::Dismiss),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn turn_arg(word: Option<&str>) -> Option<TurnId> {
    word?.parse::<u64>().ok().map(TurnId::new)
}
