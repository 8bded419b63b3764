use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Empty,
    Tools,
    Prompt {
        name: String,
        arguments: HashMap<String, String>,
    },
    Query(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("usage: /prompt <name> [key=value]...")]
    MissingPromptName,
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Command::Empty);
    }
    if trimmed.eq_ignore_ascii_case("exit") {
        return Ok(Command::Exit);
    }
    if trimmed == "/tools" {
        return Ok(Command::Tools);
    }

    let mut words = trimmed.split_whitespace();
    if words.next() != Some("/prompt") {
        return Ok(Command::Query(input.to_owned()));
    }

    let name = words.next().ok_or(CommandError::MissingPromptName)?;
    let arguments = words.filter_map(parse_prompt_argument).collect();
    Ok(Command::Prompt {
        name: name.to_owned(),
        arguments,
    })
}

/// `key=value`; anything else is dropped.
fn parse_prompt_argument(word: &str) -> Option<(String, String)> {
    let mut parts = word.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.is_empty() && !value.is_empty() => {
            Some((key.to_owned(), value.to_owned()))
        }
        _ => {
            tracing::warn!(argument = word, "ignoring malformed prompt argument");
            None
        }
    }
}
