//! Message 层：把输入行翻译成命令
//!
//! Parsing never touches page state; the update step in `app.rs` decides
//! whether a command applies to the active page.

use rental_catalog_core::PageNav;
use thiserror::Error;

/// Which page a `films` / `customers` / `actors` command switches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Films,
    Customers,
    Actors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PageKind),
    /// Submitted search text; empty clears the search.
    Search(String),
    Navigate(PageNav),
    Reload,
    Show(u32),
    Close,
    /// Rent the shown film to the customer id as typed.
    Rent(String),
    New,
    Edit(u32),
    Delete(u32),
    Set { field: String, value: String },
    Confirm,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("`{0}` is not a valid id or page number")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
pages:      films | customers | actors
list:       search [text] | next | prev | first | last | page <n> | reload
detail:     show <id> | close
films:      rent <customer-id>
customers:  new | edit <id> | delete <id> | set <field> <value> | confirm
            fields: first_name last_name email store_id active
other:      help | quit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "films" => Command::Open(PageKind::Films),
        "customers" => Command::Open(PageKind::Customers),
        "actors" => Command::Open(PageKind::Actors),
        "search" | "/" => Command::Search(rest.to_string()),
        "next" | "n" => Command::Navigate(PageNav::Next),
        "prev" | "p" => Command::Navigate(PageNav::Prev),
        "first" => Command::Navigate(PageNav::First),
        "last" => Command::Navigate(PageNav::Last),
        "page" => Command::Navigate(PageNav::To(number("page", "a page number", rest)?)),
        "reload" => Command::Reload,
        "show" => Command::Show(number("show", "an id", rest)?),
        "close" => Command::Close,
        "rent" => Command::Rent(required("rent", "a customer id", rest)?.to_string()),
        "new" => Command::New,
        "edit" => Command::Edit(number("edit", "an id", rest)?),
        "delete" => Command::Delete(number("delete", "an id", rest)?),
        "set" => {
            let rest = required("set", "a field name", rest)?;
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            Command::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "confirm" | "ok" => Command::Confirm,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(
    command: &'static str,
    what: &'static str,
    arg: &'a str,
) -> Result<&'a str, ParseError> {
    if arg.is_empty() {
        Err(ParseError::MissingArgument { command, what })
    } else {
        Ok(arg)
    }
}

fn number(command: &'static str, what: &'static str, arg: &str) -> Result<u32, ParseError> {
    let arg = required(command, what, arg)?;
    arg.parse()
        .map_err(|_| ParseError::InvalidNumber(arg.to_string()))
}
