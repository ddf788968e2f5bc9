//! Line-oriented event scripts driving a [`TableViewModel`](crate::view::TableViewModel).
//!
//! ```text
//! # comments and blank lines are skipped
//! page 2
//! toggle about
//! sort name
//! open 5
//! save first=Anna about="two words"
//! cancel
//! ```

use thiserror::Error;

use crate::model::{Column, RecordId};
use crate::view::edit::EditPatch;
use crate::view::Event;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct EventParseError {
    pub line: usize,
    pub message: String,
}

pub fn parse_event_script(input: &str) -> Result<Vec<Event>, EventParseError> {
    let mut events = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let parsed = parse_event_line(raw).map_err(|message| EventParseError {
            line: idx + 1,
            message,
        })?;
        events.extend(parsed);
    }
    Ok(events)
}

pub fn parse_event_line(line: &str) -> Result<Option<Event>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let tokens = tokenize(trimmed)?;
    let (command, args) = match tokens.split_first() {
        Some((command, args)) => (command.to_lowercase(), args),
        None => return Ok(None),
    };

    let event = match command.as_str() {
        "page" => {
            let raw = single_arg(&command, args)?;
            let page = raw
                .parse::<usize>()
                .map_err(|_| format!("invalid page number '{raw}'"))?;
            Event::SwitchPage(page)
        }
        "toggle" => Event::ToggleColumn(parse_column(single_arg(&command, args)?)?),
        "sort" => Event::SortBy(parse_column(single_arg(&command, args)?)?),
        "open" => Event::OpenEdit(RecordId::new(single_arg(&command, args)?)),
        "cancel" => {
            if !args.is_empty() {
                return Err("cancel takes no arguments".to_string());
            }
            Event::CancelEdit
        }
        "save" => Event::SaveEdit(parse_patch(args)?),
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(event))
}

fn single_arg<'a>(command: &str, args: &'a [String]) -> Result<&'a str, String> {
    match args {
        [one] => Ok(one.as_str()),
        _ => Err(format!("{command} expects exactly one argument")),
    }
}

fn parse_column(raw: &str) -> Result<Column, String> {
    Column::parse(raw).ok_or_else(|| format!("unknown column '{raw}'"))
}

fn parse_patch(args: &[String]) -> Result<EditPatch, String> {
    let mut patch = EditPatch::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{arg}'"))?;
        let slot = match key.to_lowercase().as_str() {
            "first" | "firstname" | "name" => &mut patch.first_name,
            "last" | "lastname" | "surname" => &mut patch.last_name,
            "about" => &mut patch.about,
            "eye" | "eyecolor" | "eye-color" => &mut patch.eye_color,
            _ => return Err(format!("unknown field '{key}'")),
        };
        *slot = Some(value.to_string());
    }
    Ok(patch)
}

fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err("dangling escape".to_string()),
            },
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}
