//! Line-oriented scenario script parser.
//!
//! One command per line; `#` starts a comment (whole-line or trailing);
//! blank lines are ignored. Commands mirror the core mutation and detection
//! surface:
//!
//! ```text
//! process <id>
//! resource <id> [instances]     # instances defaults to 1
//! edge <from> <to>              # kind is derived from the endpoint kinds
//! remove-edge <from> <to>
//! detect
//! clear
//! ```
use std::fmt;

/// A single parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// `process <id>`
    AddProcess {
        /// Node identifier.
        id: String,
    },
    /// `resource <id> [instances]`
    AddResource {
        /// Node identifier.
        id: String,
        /// Instance count (1 when omitted).
        instances: u32,
    },
    /// `edge <from> <to>`
    AddEdge {
        /// Source node identifier.
        from: String,
        /// Target node identifier.
        to: String,
    },
    /// `remove-edge <from> <to>`
    RemoveEdge {
        /// Source node identifier.
        from: String,
        /// Target node identifier.
        to: String,
    },
    /// `detect`
    Detect,
    /// `clear`
    Clear,
}

/// A parse failure, with the 1-based line number it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number of the offending line.
    pub line: usize,
    /// What was wrong with the line.
    pub detail: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.detail)
    }
}

impl std::error::Error for ScriptError {}

/// Parses a whole script into its command sequence.
///
/// # Errors
///
/// Returns the first [`ScriptError`] encountered; nothing after the failing
/// line is parsed.
pub fn parse_script(input: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        if let Some(cmd) = parse_line(raw).map_err(|detail| ScriptError {
            line: idx + 1,
            detail,
        })? {
            commands.push(cmd);
        }
    }
    Ok(commands)
}

/// Parses one line. Returns `Ok(None)` for blank and comment-only lines.
fn parse_line(raw: &str) -> Result<Option<ScriptCommand>, String> {
    let line = match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };

    let command = match keyword {
        "process" => ScriptCommand::AddProcess {
            id: required(&mut tokens, "process", "<id>")?,
        },
        "resource" => {
            let id = required(&mut tokens, "resource", "<id>")?;
            let instances = match tokens.next() {
                None => 1,
                Some(raw_count) => raw_count
                    .parse::<u32>()
                    .map_err(|_| format!("invalid instance count: {raw_count:?}"))?,
            };
            ScriptCommand::AddResource { id, instances }
        }
        "edge" => ScriptCommand::AddEdge {
            from: required(&mut tokens, "edge", "<from>")?,
            to: required(&mut tokens, "edge", "<to>")?,
        },
        "remove-edge" => ScriptCommand::RemoveEdge {
            from: required(&mut tokens, "remove-edge", "<from>")?,
            to: required(&mut tokens, "remove-edge", "<to>")?,
        },
        "detect" => ScriptCommand::Detect,
        "clear" => ScriptCommand::Clear,
        other => return Err(format!("unknown command: {other:?}")),
    };

    if let Some(extra) = tokens.next() {
        return Err(format!("unexpected argument: {extra:?}"));
    }
    Ok(Some(command))
}

/// Pulls the next token or reports which argument of `keyword` is missing.
fn required<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    keyword: &str,
    what: &str,
) -> Result<String, String> {
    tokens
        .next()
        .map(str::to_owned)
        .ok_or_else(|| format!("{keyword} is missing its {what} argument"))
}
