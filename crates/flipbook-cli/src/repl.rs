//! Commands understood by the interactive reader.

use std::fmt;
use std::str::FromStr;

pub const HELP: &str = "\
commands:
  next | n            turn forward
  prev | p            turn backward
  goto <section>      jump to a section (navigation link)
  hash <#section>     change the URL fragment from outside
  retry               reload the current section
  status              show position and cache
  help                this text
  quit | q            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Next,
    Prev,
    Goto(String),
    Hash(String),
    Retry,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Unknown(String),
    MissingArgument(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command '{word}' (try 'help')"),
            Self::MissingArgument(command) => write!(f, "'{command}' needs an argument"),
        }
    }
}

impl std::error::Error for ParseError {}

impl FromStr for ReplCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(ParseError::MissingArgument("command"));
        };
        let argument = words.next();

        match command.to_ascii_lowercase().as_str() {
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Prev),
            "goto" | "g" => argument
                .map(|section| Self::Goto(section.to_string()))
                .ok_or(ParseError::MissingArgument("goto")),
            "hash" => argument
                .map(|fragment| {
                    let fragment = if fragment.starts_with('#') {
                        fragment.to_string()
                    } else {
                        format!("#{fragment}")
                    };
                    Self::Hash(fragment)
                })
                .ok_or(ParseError::MissingArgument("hash")),
            "retry" | "r" => Ok(Self::Retry),
            "status" | "s" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}
