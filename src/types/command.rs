//! Event script commands.
//!
//! Every command is read as a [`RawCommand`]: its name and the untouched
//! text between the name and its terminator. Commands the codec knows can be
//! translated into a typed [`Command`]; everything else stays raw and is
//! written back exactly as read.

use std::fmt;

use serde::Serialize;

use crate::escape::escape_meta_chars;

/// Terminator of a plain command.
pub const COMMAND_END: &str = "#ED";

/// Terminator prefix of a select command, followed by its number.
pub const SELECT_END: &str = "#SELEND";

/// Name prefix of a select command.
pub const SELECT_PREFIX: &str = "SEL";

/// Name prefix of a select branch; branch `N` belongs to select `N`.
pub const BRANCH_PREFIX: &str = "BR";

/// Terminator prefix of a select branch.
pub const BRANCH_END: &str = "#BREND";

/// Trailing decimal digits of a chunk name (`"SEL12"` → `"12"`).
pub fn trailing_digits(name: &str) -> &str {
    let start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(name.len(), |(i, _)| i);
    &name[start..]
}

/// Terminator that closes a command with the given name.
pub fn command_terminator(name: &str) -> String {
    if name.starts_with(SELECT_PREFIX) {
        format!("{}{}", SELECT_END, trailing_digits(name))
    } else {
        COMMAND_END.to_string()
    }
}

/// Ordered `key:value` parameters, as written in `a:1,b:2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse comma-separated `key:value` pairs.
    ///
    /// Empty items are skipped, a missing `:` gives an empty value, and a
    /// repeated key replaces the earlier value in place.
    pub fn parse(input: &str) -> Self {
        let mut params = Params::new();
        for item in input.trim().split(',').filter(|p| !p.is_empty()) {
            let (key, value) = item.split_once(':').unwrap_or((item, ""));
            if key.is_empty() {
                continue;
            }
            params.set(key, value);
        }
        params
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        Ok(())
    }
}

/// A command exactly as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCommand {
    pub name: String,
    /// Everything between the name and the terminator, whitespace included.
    pub body: String,
}

impl RawCommand {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Parameters on the first line of the body.
    pub fn params(&self) -> Params {
        let first_line = self.body.trim_start_matches([' ', '\t']);
        let first_line = first_line.lines().next().unwrap_or("");
        Params::parse(first_line)
    }

    pub fn terminator(&self) -> String {
        command_terminator(&self.name)
    }
}

impl fmt::Display for RawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}{}{}", self.name, self.body, self.terminator())
    }
}

/// One labeled choice of a select command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub label: String,
    pub commands: Vec<Command>,
}

/// A numbered choice block.
///
/// Nested selects must use distinct numbers: a block is closed by the
/// first `#SELEND<number>` that follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Select {
    pub number: u32,
    pub params: Params,
    pub branches: Vec<Branch>,
}

impl Select {
    pub fn name(&self) -> String {
        format!("{}{}", SELECT_PREFIX, self.number)
    }

    fn body(&self) -> String {
        let mut body = String::new();
        if !self.params.is_empty() {
            body.push(' ');
            body.push_str(&self.params.to_string());
        }
        body.push('\n');
        for branch in &self.branches {
            body.push_str(&format!(
                "#{}{} {}\n",
                BRANCH_PREFIX,
                self.number,
                escape_meta_chars(&branch.label)
            ));
            for command in &branch.commands {
                body.push_str(&command.to_string());
                body.push('\n');
            }
            body.push_str(&format!("{}{}\n", BRANCH_END, self.number));
        }
        body
    }
}

/// A command of an event phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Command {
    /// `MSG m:<text>`: show a message window.
    Message { text: String },
    /// `GOLD g:<amount>`: add (or with a negative amount, take) gold.
    Gold { amount: Option<i32> },
    /// `SWON sw:<id>`
    SwitchOn { switch: Option<i32> },
    /// `SWOFF sw:<id>`
    SwitchOff { switch: Option<i32> },
    /// `SEL<n>`: let the player pick a branch.
    Select(Select),
    /// Anything else, kept verbatim.
    Raw(RawCommand),
}

fn number_text(value: Option<i32>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| v.to_string())
}

impl Command {
    pub fn name(&self) -> String {
        match self {
            Command::Message { .. } => "MSG".to_string(),
            Command::Gold { .. } => "GOLD".to_string(),
            Command::SwitchOn { .. } => "SWON".to_string(),
            Command::SwitchOff { .. } => "SWOFF".to_string(),
            Command::Select(select) => select.name(),
            Command::Raw(raw) => raw.name.clone(),
        }
    }

    /// Canonical raw form of this command.
    pub fn to_raw(&self) -> RawCommand {
        let single = |key: &str, value: String| format!(" {}", Params::new().with(key, value));
        match self {
            Command::Message { text } => RawCommand::new(self.name(), single("m", escape_meta_chars(text))),
            Command::Gold { amount } => RawCommand::new(self.name(), single("g", number_text(*amount))),
            Command::SwitchOn { switch } | Command::SwitchOff { switch } => {
                RawCommand::new(self.name(), single("sw", number_text(*switch)))
            }
            Command::Select(select) => RawCommand::new(select.name(), select.body()),
            Command::Raw(raw) => raw.clone(),
        }
    }
}

impl From<RawCommand> for Command {
    fn from(raw: RawCommand) -> Self {
        Command::Raw(raw)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_raw().fmt(f)
    }
}
