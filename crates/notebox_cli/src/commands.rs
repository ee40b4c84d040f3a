//! Shell command parsing and dispatch.

use notebox_core::model::note::format_epoch_ms;
use notebox_core::richtext::FONT_SIZES;
use notebox_core::{LoadMode, NoteSession, SessionResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const HELP: &[&str] = &[
    "users                 list users",
    "user <name>           switch to an existing user",
    "adduser <name>        create a user (or switch if it exists)",
    "list                  list notes, newest first",
    "select <row>          open the note at a list row",
    "show                  print the editor text and selection",
    "info                  print the selected note with timestamps",
    "new <text>            create a note and open it",
    "edit <text>           replace the open note's text",
    "delete                delete the open note",
    "type <html>           replace the editor text",
    "sel <start> <end>     select a byte range in the editor",
    "bold | italic         toggle a tag around the selection",
    "font <family>         set font family on the selection",
    "size <points>         set font size on the selection",
    "image <path>          embed an image at the selection end",
    "save <path>           save notes (.db/.sqlite/.sqlite3 = SQLite, else JSON)",
    "load <path>           replace notes from a file",
    "merge <path>          append notes from a file",
    "version               print the core version",
    "quit                  leave",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Users,
    User(String),
    AddUser(String),
    List,
    Select(usize),
    Show,
    Info,
    New(String),
    Edit(String),
    Delete,
    Type(String),
    Sel(usize, usize),
    Bold,
    Italic,
    Font(String),
    Size(u16),
    Image(PathBuf),
    Save(PathBuf),
    Load(PathBuf),
    Merge(PathBuf),
    Version,
    Quit,
}

/// Malformed shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command `{name}`; try `help`"),
            Self::MissingArgument(what) => write!(f, "missing {what}"),
            Self::InvalidNumber(raw) => write!(f, "`{raw}` is not a valid number"),
        }
    }
}

impl Error for ParseError {}

pub enum Outcome {
    Continue(Vec<String>),
    Quit,
}

impl Command {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "users" => Self::Users,
            "user" => Self::User(required(rest, "user name")?),
            "adduser" => Self::AddUser(required(rest, "user name")?),
            "list" | "ls" => Self::List,
            "select" => Self::Select(number(rest, "row number")?),
            "show" => Self::Show,
            "info" => Self::Info,
            "new" => Self::New(rest.to_string()),
            "edit" => Self::Edit(rest.to_string()),
            "delete" | "rm" => Self::Delete,
            "type" => Self::Type(rest.to_string()),
            "sel" => {
                let (start, end) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ParseError::MissingArgument("start and end offsets"))?;
                Self::Sel(number(start, "start offset")?, number(end, "end offset")?)
            }
            "bold" | "b" => Self::Bold,
            "italic" | "i" => Self::Italic,
            "font" => Self::Font(required(rest, "font family")?),
            "size" => Self::Size(number(rest, "font size")?),
            "image" => Self::Image(PathBuf::from(required(rest, "image path")?)),
            "save" => Self::Save(PathBuf::from(required(rest, "file path")?)),
            "load" => Self::Load(PathBuf::from(required(rest, "file path")?)),
            "merge" => Self::Merge(PathBuf::from(required(rest, "file path")?)),
            "version" => Self::Version,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Runs the command against `session`.
    pub fn execute(self, session: &mut NoteSession) -> SessionResult<Outcome> {
        let lines = match self {
            Self::Help => HELP
                .iter()
                .map(|line| line.to_string())
                .chain(std::iter::once(format!("font sizes: {}", font_size_choices())))
                .collect(),
            Self::Users => session
                .user_names()
                .into_iter()
                .map(|name| {
                    let marker = if name == session.current_user_name() {
                        "*"
                    } else {
                        " "
                    };
                    format!("{marker} {name}")
                })
                .collect(),
            Self::User(name) => {
                session.switch_user(&name)?;
                vec![format!("Switched to {name}")]
            }
            Self::AddUser(name) => {
                session.add_user(&name)?;
                vec![format!("Now using {}", session.current_user_name())]
            }
            Self::List => list_rows(session)?,
            Self::Select(row) => {
                session.select_row(row)?;
                vec![session.editor_text().to_string()]
            }
            Self::Show => {
                let selection = session.selection();
                vec![
                    session.editor_text().to_string(),
                    format!("[selection {}..{}]", selection.start, selection.end),
                ]
            }
            Self::Info => match session.selected_note() {
                Some(note) => vec![note.note_string()],
                None => vec!["No note selected".to_string()],
            },
            Self::New(text) => {
                session.new_note(&text)?;
                vec!["Created".to_string()]
            }
            Self::Edit(text) => {
                session.edit_selected(&text)?;
                vec!["Updated".to_string()]
            }
            Self::Delete => {
                session.delete_selected()?;
                vec!["Deleted".to_string()]
            }
            Self::Type(text) => {
                session.update_editor(text)?;
                Vec::new()
            }
            Self::Sel(start, end) => {
                session.set_selection(start, end)?;
                Vec::new()
            }
            Self::Bold => {
                session.toggle_bold()?;
                vec![session.editor_text().to_string()]
            }
            Self::Italic => {
                session.toggle_italic()?;
                vec![session.editor_text().to_string()]
            }
            Self::Font(family) => {
                session.apply_font_family(&family)?;
                vec![session.editor_text().to_string()]
            }
            Self::Size(points) => {
                session.apply_font_size(points)?;
                vec![session.editor_text().to_string()]
            }
            Self::Image(path) => {
                session.insert_image(&path)?;
                vec![format!("Embedded {}", path.display())]
            }
            Self::Save(path) => {
                let count = session.save(&path)?;
                vec![format!("Saved {count} notes to {}", path.display())]
            }
            Self::Load(path) => {
                let count = session.load(&path, LoadMode::Replace)?;
                vec![format!("Loaded {count} notes from {}", path.display())]
            }
            Self::Merge(path) => {
                let count = session.load(&path, LoadMode::Merge)?;
                vec![format!("Merged {count} notes from {}", path.display())]
            }
            Self::Version => vec![format!("notebox_core {}", notebox_core::core_version())],
            Self::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(lines))
    }
}

fn list_rows(session: &NoteSession) -> SessionResult<Vec<String>> {
    let rows = session.rows()?;
    if rows.is_empty() {
        return Ok(vec!["  No notes.".to_string()]);
    }
    let selected = session.selected_index();
    Ok(rows
        .iter()
        .enumerate()
        .map(|(row, entry)| {
            let marker = if Some(entry.index) == selected { "*" } else { " " };
            format!(
                "{marker} {row:>3}  {}  {}",
                format_epoch_ms(entry.created_at),
                entry.preview
            )
        })
        .collect())
}

fn required(rest: &str, what: &'static str) -> Result<String, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(what))
    } else {
        Ok(rest.to_string())
    }
}

fn number<T: std::str::FromStr>(raw: &str, what: &'static str) -> Result<T, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::MissingArgument(what));
    }
    raw.parse()
        .map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

fn font_size_choices() -> String {
    FONT_SIZES
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
