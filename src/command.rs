use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::editor;
use crate::error::{Result, TimerError};
use crate::formatter::{self, Report};
use crate::store::{self, Strictness};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    Create,
    Start,
    Stop,
    Delete,
    List,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Delete => "delete",
            Action::List => "list",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// One request against the store: what to do, and to which tracker.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Command {
    pub action: Action,
    pub label: Option<String>,
}

impl Command {
    pub fn new(action: Action, label: Option<String>) -> Command {
        Command { action, label }
    }

    fn require_label(&self) -> Result<&str> {
        self.label
            .as_deref()
            .ok_or(TimerError::MissingLabel(self.action.verb()))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// The store changed: `text` must be written back, `message` shown to the user.
    Updated { text: String, message: String },
    /// Nothing changed, there is a report to show.
    Report(Report),
}

/// Run `command` against the store contents in `text`, with `now` as the current instant.
pub fn execute(
    text: &str,
    command: &Command,
    strictness: Strictness,
    now: DateTime<Utc>,
) -> Result<Outcome> {
    let decoded = store::decode(text, strictness)?;
    let mut collection = decoded.collection;

    let past = match command.action {
        Action::List => {
            let report = match command.label.as_deref() {
                Some(label) => formatter::detail(collection.get(label)?, now)?,
                None => formatter::summary(&collection, now)?,
            };
            return Ok(Outcome::Report(report));
        }
        Action::Create => {
            editor::create(&mut collection, command.require_label()?, now)?;
            "created"
        }
        Action::Start => {
            editor::start(&mut collection, command.require_label()?, now)?;
            "started"
        }
        Action::Stop => {
            editor::stop(&mut collection, command.require_label()?, now)?;
            "stopped"
        }
        Action::Delete => {
            editor::delete(&mut collection, command.require_label()?)?;
            "deleted"
        }
    };

    if !decoded.skipped.is_empty() {
        warn!(
            dropped = decoded.skipped.len(),
            "lines that could not be decoded are not written back"
        );
    }

    Ok(Outcome::Updated {
        text: store::encode(&collection),
        message: format!("{past} tracker \"{}\"", command.require_label()?),
    })
}
