//! Line-oriented command protocol
//!
//! A small text protocol for driving an [`AddressableHeap`] with `i64` keys and
//! string values, one command token followed by its arguments. Tokens are
//! separated by any whitespace, so arguments may continue on following lines.
//!
//! | Command   | Args        | Success output             | Failure output |
//! |-----------|-------------|----------------------------|----------------|
//! | `add`     | key value   | nothing                    | `error`        |
//! | `set`     | key value   | nothing                    | `error`        |
//! | `delete`  | key         | nothing                    | `error`        |
//! | `search`  | key         | `1 <position> <value>`     | `0`            |
//! | `min`     |             | `<key> <position> <value>` | `error`        |
//! | `max`     |             | `<key> <position> <value>` | `error`        |
//! | `print`   |             | the tree rendering         |                |
//! | `extract` |             | `<key> <value>`            | `error`        |
//!
//! Every [`HeapError`] collapses into the single `error` line; the distinct kind
//! is still handed to the diagnostic callback of [`Session::run_with`].
//! Unknown command tokens are skipped without output. Input that ends in the
//! middle of a command ends the session.
//!
//! # Example
//!
//! ```rust
//! use indexed_heap::IndexedHeap;
//! use indexed_heap::protocol::Session;
//!
//! let input = "add 5 five\nadd 2 two\nmin\nsearch 9\nextract\n";
//! let mut output = Vec::new();
//!
//! let mut session = Session::new(IndexedHeap::<i64, String>::new());
//! session.run(input.as_bytes(), &mut output).unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "2 0 two\n0\n2 two\n");
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::traits::{AddressableHeap, HeapError};

/// Key type spoken by the protocol
pub type Key = i64;

/// Value type spoken by the protocol
pub type Value = String;

/// A parsed protocol command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { key: Key, value: Value },
    Set { key: Key, value: Value },
    Delete { key: Key },
    Search { key: Key },
    Min,
    Max,
    Print,
    Extract,
}

/// Error type for malformed protocol input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The token does not name a command
    UnknownCommand(String),
    /// A key argument is not a signed 64-bit integer
    InvalidKey { command: &'static str, token: String },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCommand(token) => write!(f, "unknown command `{token}`"),
            ProtocolError::InvalidKey { command, token } => {
                write!(f, "`{command}`: key `{token}` is not a 64-bit integer")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

fn parse_key(command: &'static str, token: String) -> Result<Key, ProtocolError> {
    token
        .parse()
        .map_err(|_| ProtocolError::InvalidKey { command, token })
}

impl Command {
    /// Reads the next command from a token stream
    ///
    /// Returns `None` once the tokens run out, including when they run out
    /// before all arguments of a command were read. All argument tokens of a
    /// known command are consumed even if the key turns out to be malformed.
    pub fn parse<I>(tokens: &mut I) -> Option<Result<Command, ProtocolError>>
    where
        I: Iterator<Item = String>,
    {
        let name = tokens.next()?;
        let command = match name.as_str() {
            "add" => {
                let (key, value) = (tokens.next()?, tokens.next()?);
                parse_key("add", key).map(|key| Command::Add { key, value })
            }
            "set" => {
                let (key, value) = (tokens.next()?, tokens.next()?);
                parse_key("set", key).map(|key| Command::Set { key, value })
            }
            "delete" => {
                let key = tokens.next()?;
                parse_key("delete", key).map(|key| Command::Delete { key })
            }
            "search" => {
                let key = tokens.next()?;
                parse_key("search", key).map(|key| Command::Search { key })
            }
            "min" => Ok(Command::Min),
            "max" => Ok(Command::Max),
            "print" => Ok(Command::Print),
            "extract" => Ok(Command::Extract),
            _ => Err(ProtocolError::UnknownCommand(name.clone())),
        };
        Some(command)
    }

    /// The command token this command is written with
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Set { .. } => "set",
            Command::Delete { .. } => "delete",
            Command::Search { .. } => "search",
            Command::Min => "min",
            Command::Max => "max",
            Command::Print => "print",
            Command::Extract => "extract",
        }
    }
}

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The command produces no output
    Silent,
    /// `search` hit
    Found { position: usize, value: Value },
    /// `search` miss
    Missing,
    /// `min` / `max`
    Entry {
        key: Key,
        position: usize,
        value: Value,
    },
    /// `extract`
    Extracted { key: Key, value: Value },
    /// `print`
    Tree(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Silent => Ok(()),
            Response::Found { position, value } => write!(f, "1 {position} {value}"),
            Response::Missing => write!(f, "0"),
            Response::Entry {
                key,
                position,
                value,
            } => write!(f, "{key} {position} {value}"),
            Response::Extracted { key, value } => write!(f, "{key} {value}"),
            Response::Tree(tree) => f.write_str(tree),
        }
    }
}

/// Something worth reporting that the protocol output does not show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Input that could not be turned into a command
    Protocol(ProtocolError),
    /// A command the heap rejected
    Heap {
        command: &'static str,
        error: HeapError,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Protocol(err) => write!(f, "{err}"),
            Diagnostic::Heap { command, error } => write!(f, "`{command}` failed: {error}"),
        }
    }
}

/// Counters over all commands a session has seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands answered, successfully or with `error`
    pub executed: usize,
    /// Commands answered with `error`
    pub failed: usize,
    /// Unknown command tokens
    pub skipped: usize,
}

/// Whitespace-separated tokens read lazily from a buffered reader
///
/// Lines are only read when the tokens of the previous one are used up, so
/// an interactive session sees each response as soon as its command is
/// complete. A read error ends the stream and is kept for [`Tokens::take_error`].
pub struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
    error: Option<io::Error>,
}

impl<R: BufRead> Tokens<R> {
    /// Wraps a reader; nothing is read until the first token is requested
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            error: None,
        }
    }

    /// Returns the read error that ended the stream, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.error.is_some() {
                return None;
            }

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_owned)),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.error = Some(err);
                    return None;
                }
            }
        }
    }
}

/// Executes protocol commands against a heap
#[derive(Debug)]
pub struct Session<H> {
    heap: H,
    summary: RunSummary,
}

impl<H> Session<H>
where
    H: AddressableHeap<Key, Value> + fmt::Display,
{
    /// Starts a session over `heap` with an empty summary
    pub fn new(heap: H) -> Self {
        Self {
            heap,
            summary: RunSummary::default(),
        }
    }

    /// Returns the heap the session drives
    pub fn heap(&self) -> &H {
        &self.heap
    }

    /// Ends the session and hands back the heap
    pub fn into_heap(self) -> H {
        self.heap
    }

    /// Returns the counts of executed, failed and skipped commands so far
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Applies one command to the heap without producing output
    pub fn apply(&mut self, command: Command) -> Result<Response, HeapError> {
        match command {
            Command::Add { key, value } => {
                self.heap.insert(key, value).map(|_| Response::Silent)
            }
            Command::Set { key, value } => {
                *self.heap.at_mut(&key)? = value;
                Ok(Response::Silent)
            }
            Command::Delete { key } => self.heap.erase(&key).map(|_| Response::Silent),
            Command::Search { key } => match self.heap.find(&key) {
                Ok((entry, position)) => Ok(Response::Found {
                    position,
                    value: entry.value,
                }),
                Err(HeapError::KeyNotFound) => Ok(Response::Missing),
                Err(err) => Err(err),
            },
            Command::Min => self.heap.min().map(|(entry, position)| Response::Entry {
                key: entry.key,
                position,
                value: entry.value.clone(),
            }),
            Command::Max => self.heap.max().map(|(entry, position)| Response::Entry {
                key: entry.key,
                position,
                value: entry.value.clone(),
            }),
            Command::Print => Ok(Response::Tree(self.heap.to_string())),
            Command::Extract => self.heap.extract_min().map(|entry| Response::Extracted {
                key: entry.key,
                value: entry.value,
            }),
        }
    }

    /// Applies one command and writes its response line
    ///
    /// Returns the heap error behind an `error` line, if there was one.
    pub fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> io::Result<Option<HeapError>> {
        self.summary.executed += 1;
        match self.apply(command) {
            Ok(Response::Silent) => Ok(None),
            Ok(response) => {
                writeln!(out, "{response}")?;
                Ok(None)
            }
            Err(err) => {
                self.summary.failed += 1;
                writeln!(out, "error")?;
                Ok(Some(err))
            }
        }
    }

    /// Runs every command from `input`, writing responses to `out`
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
    ) -> io::Result<RunSummary> {
        self.run_with(input, out, |_| {})
    }

    /// Like [`Session::run`], handing anything the output hides to `diagnose`
    pub fn run_with<R, W, F>(
        &mut self,
        input: R,
        out: &mut W,
        mut diagnose: F,
    ) -> io::Result<RunSummary>
    where
        R: BufRead,
        W: Write,
        F: FnMut(&Diagnostic),
    {
        let mut tokens = Tokens::new(input);
        while let Some(parsed) = Command::parse(&mut tokens) {
            match parsed {
                Ok(command) => {
                    let name = command.name();
                    if let Some(error) = self.execute(command, out)? {
                        diagnose(&Diagnostic::Heap {
                            command: name,
                            error,
                        });
                    }
                }
                Err(err @ ProtocolError::UnknownCommand(_)) => {
                    self.summary.skipped += 1;
                    diagnose(&Diagnostic::Protocol(err));
                }
                Err(err) => {
                    self.summary.executed += 1;
                    self.summary.failed += 1;
                    writeln!(out, "error")?;
                    diagnose(&Diagnostic::Protocol(err));
                }
            }
        }

        if let Some(err) = tokens.take_error() {
            return Err(err);
        }
        out.flush()?;
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> impl Iterator<Item = String> + '_ {
        input.split_whitespace().map(String::from)
    }

    #[test]
    fn test_parse_all_commands() {
        let mut stream = tokens("add 1 one set -2 two delete 3 search 4 min max print extract");
        let mut parsed = Vec::new();
        while let Some(command) = Command::parse(&mut stream) {
            parsed.push(command.unwrap());
        }
        assert_eq!(
            parsed,
            vec![
                Command::Add { key: 1, value: "one".to_string() },
                Command::Set { key: -2, value: "two".to_string() },
                Command::Delete { key: 3 },
                Command::Search { key: 4 },
                Command::Min,
                Command::Max,
                Command::Print,
                Command::Extract,
            ]
        );
    }

    #[test]
    fn test_parse_truncated_command() {
        let mut stream = tokens("add 1");
        assert_eq!(Command::parse(&mut stream), None);
    }

    #[test]
    fn test_parse_invalid_key_consumes_arguments() {
        let mut stream = tokens("add x value min");
        assert_eq!(
            Command::parse(&mut stream),
            Some(Err(ProtocolError::InvalidKey {
                command: "add",
                token: "x".to_string()
            }))
        );
        assert_eq!(Command::parse(&mut stream), Some(Ok(Command::Min)));
    }

    #[test]
    fn test_parse_unknown_command() {
        let mut stream = tokens("pop min");
        assert_eq!(
            Command::parse(&mut stream),
            Some(Err(ProtocolError::UnknownCommand("pop".to_string())))
        );
        assert_eq!(Command::parse(&mut stream), Some(Ok(Command::Min)));
    }

    #[test]
    fn test_tokens_span_lines() {
        let input = "add\n  7\n\nseven\n";
        let collected: Vec<String> = Tokens::new(input.as_bytes()).collect();
        assert_eq!(collected, vec!["add", "7", "seven"]);
    }

    #[test]
    fn test_response_lines() {
        assert_eq!(
            Response::Found { position: 3, value: "v".to_string() }.to_string(),
            "1 3 v"
        );
        assert_eq!(Response::Missing.to_string(), "0");
        assert_eq!(
            Response::Entry { key: -4, position: 0, value: "v".to_string() }.to_string(),
            "-4 0 v"
        );
        assert_eq!(
            Response::Extracted { key: 9, value: "v".to_string() }.to_string(),
            "9 v"
        );
    }
}
