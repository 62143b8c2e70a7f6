//! The parsing state machine.
//!
//! Tokens are consumed left to right against per-command lookup tables.
//! While no argument has been consumed yet, a token naming a subcommand
//! switches the active command; the first argument ends command selection
//! for good.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, InternalError, ParseError, ParseErrorKind};
use crate::tokenize::Token;
use crate::tree::{ArgumentId, CommandId, Declaration};
use crate::types::{ArgType, Nargs, SystemCallback, Value};

/// The result of a successful parse.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parsed {
    /// Every argument of the selected command by key, defaults included,
    /// plus any inherited argument that was supplied.
    pub arguments: BTreeMap<String, Value>,
    /// Labels of the selected command path.
    pub commands: Vec<String>,
    /// Defaults of the selected command's arguments.
    pub initial_state: BTreeMap<String, Value>,
    /// Keys of the arguments that appeared on the command line.
    pub supplied: Vec<String>,
    /// The words that were parsed.
    pub command_line: Vec<String>,
    /// Set when a usage or version argument was supplied.
    pub system_callback: Option<SystemCallback>,
    #[serde(skip)]
    pub command: CommandId,
}

impl Parsed {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Whether the argument appeared on the command line.
    pub fn is_present(&self, key: &str) -> bool {
        self.supplied.iter().any(|supplied| supplied == key)
    }

    /// Boolean value, `false` when unset.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Count or integer value, `0` when unset.
    pub fn count(&self, key: &str) -> i64 {
        self.int(key).unwrap_or(0)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// List value, empty when unset or not a list.
    pub fn list(&self, key: &str) -> &[Value] {
        self.get(key).and_then(Value::as_list).unwrap_or(&[])
    }
}

/// Output of a scan, before callbacks run.
#[derive(Clone, Debug)]
pub(crate) struct Scan {
    pub parsed: Parsed,
    /// The first system argument supplied.
    pub system: Option<ArgumentId>,
    /// Supplied arguments that carry a callback, in order of appearance.
    pub callbacks: Vec<ArgumentId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    SelectingCommand,
    ConsumingArguments,
}

/// Lookup tables for one command.
#[derive(Debug, Default)]
struct CommandTable {
    commands: HashMap<String, CommandId>,
    options: HashMap<String, ArgumentId>,
    positionals: VecDeque<ArgumentId>,
}

fn build_tables(decl: &Declaration) -> HashMap<CommandId, CommandTable> {
    let mut tables = HashMap::new();
    for scope in decl.argument_hierarchy(None) {
        let mut table = CommandTable::default();
        for id in &scope.arguments {
            let argument = &decl[*id];
            if argument.is_option {
                for code in &argument.codes {
                    table.options.insert(code.content.clone(), *id);
                }
            } else {
                table.positionals.push_back(*id);
            }
        }
        for id in &scope.commands {
            table.commands.insert(decl[*id].label().to_string(), *id);
        }
        // Help and version stay reachable from every subcommand.
        for ancestor in decl.ancestry(scope.command).into_iter().skip(1) {
            for argument in decl.arguments_of(ancestor) {
                if argument.arg_type().system_callback().is_none() {
                    continue;
                }
                for code in &argument.codes {
                    table
                        .options
                        .entry(code.content.clone())
                        .or_insert(argument.id);
                }
            }
        }
        tables.insert(scope.command, table);
    }
    tables
}

struct Machine<'a> {
    decl: &'a Declaration,
    tables: HashMap<CommandId, CommandTable>,
    active: CommandId,
    phase: Phase,
    positionals: VecDeque<ArgumentId>,
    values: BTreeMap<ArgumentId, Value>,
    raw: BTreeMap<ArgumentId, Vec<String>>,
    consumed: Vec<ArgumentId>,
    path: Vec<String>,
    system: Option<ArgumentId>,
    /// Bounded-arity argument whose values directly precede the current token.
    last_bounded: Option<ArgumentId>,
}

impl<'a> Machine<'a> {
    fn new(decl: &'a Declaration) -> Result<Self, Error> {
        let tables = build_tables(decl);
        let positionals = tables
            .get(&CommandId::ROOT)
            .map(|table| table.positionals.clone())
            .ok_or_else(|| InternalError("root command has no lookup table".into()))?;
        Ok(Self {
            decl,
            tables,
            active: CommandId::ROOT,
            phase: Phase::SelectingCommand,
            positionals,
            values: BTreeMap::new(),
            raw: BTreeMap::new(),
            consumed: Vec::new(),
            path: Vec::new(),
            system: None,
            last_bounded: None,
        })
    }

    fn table(&self) -> Result<&CommandTable, InternalError> {
        self.tables
            .get(&self.active)
            .ok_or_else(|| InternalError(format!("command {} has no lookup table", self.active)))
    }

    fn step(&mut self, token: Token, queue: &mut VecDeque<Token>) -> Result<(), Error> {
        trace!(token = %token.content, kind = ?token.kind, "scanning token");
        let previous = self.last_bounded.take();

        if self.phase == Phase::SelectingCommand && !token.is_option() {
            let command = self.table()?.commands.get(&token.content).copied();
            if let Some(command) = command {
                return self.switch(command);
            }
        }

        let argument = if token.is_option() {
            self.table()?.options.get(&token.content).copied()
        } else {
            self.positionals.pop_front()
        };
        let Some(argument) = argument else {
            return Err(self.unresolved(&token, previous).into());
        };

        self.phase = Phase::ConsumingArguments;
        self.consume(argument, token, queue)
    }

    fn switch(&mut self, command: CommandId) -> Result<(), Error> {
        if self.phase != Phase::SelectingCommand {
            return Err(InternalError(format!(
                "cannot switch to command {command} after arguments were consumed"
            ))
            .into());
        }
        self.active = command;
        self.path.push(self.decl[command].label().to_string());
        self.positionals = self.table()?.positionals.clone();
        debug!(command = %command, path = ?self.path, "switched command");
        Ok(())
    }

    fn unresolved(&self, token: &Token, previous: Option<ArgumentId>) -> ParseError {
        if token.is_option() {
            return ParseError::new(ParseErrorKind::UnknownOption, self.active).with_token(token);
        }
        match previous {
            Some(argument) => {
                let mut values = self.raw.get(&argument).cloned().unwrap_or_default();
                values.push(token.content.clone());
                ParseError::new(ParseErrorKind::IncorrectNumberOfValues, self.active)
                    .with_token(token)
                    .with_argument(argument)
                    .with_values(values)
            }
            None => {
                ParseError::new(ParseErrorKind::UnknownArgument, self.active).with_token(token)
            }
        }
    }

    fn consume(
        &mut self,
        id: ArgumentId,
        token: Token,
        queue: &mut VecDeque<Token>,
    ) -> Result<(), Error> {
        let decl = self.decl;
        let argument = &decl[id];
        if !self.consumed.contains(&id) {
            self.consumed.push(id);
        }

        if !argument.accepts_values() {
            if let Some(value) = queue.front().filter(|next| next.attached) {
                return Err(ParseError::new(ParseErrorKind::IncorrectNumberOfValues, self.active)
                    .with_token(&token)
                    .with_argument(id)
                    .with_values(vec![value.content.clone()])
                    .into());
            }
        }

        match argument.arg_type() {
            ArgType::Boolean => {
                self.values.insert(id, argument.settings.value.clone());
            }
            ArgType::Usage | ArgType::Version => {
                self.values.insert(id, Value::Bool(true));
                self.system.get_or_insert(id);
            }
            ArgType::Count => {
                let increment = argument.settings.value.as_int().unwrap_or(1);
                let current = self
                    .values
                    .get(&id)
                    .or(Some(&argument.settings.default_value))
                    .and_then(Value::as_int)
                    .unwrap_or(0);
                self.values.insert(id, Value::Int(current.saturating_add(increment)));
            }
            ArgType::Integer | ArgType::Path | ArgType::String => {
                self.consume_values(id, &token, queue)?;
            }
        }
        Ok(())
    }

    fn consume_values(
        &mut self,
        id: ArgumentId,
        token: &Token,
        queue: &mut VecDeque<Token>,
    ) -> Result<(), ParseError> {
        let decl = self.decl;
        let argument = &decl[id];
        let arity = argument.nargs().unwrap_or(Nargs::Exact(1));

        let mut raw = Vec::new();
        if !token.is_option() {
            raw.push(token.content.clone());
        }
        while arity.accepts_more(raw.len()) {
            match queue.front() {
                Some(next) if !next.is_option() => {
                    raw.extend(queue.pop_front().map(|next| next.content));
                }
                _ => break,
            }
        }
        trace!(argument = %argument.key, values = ?raw, "collected values");

        let active = self.active;
        let error = |kind| {
            ParseError::new(kind, active)
                .with_token(token)
                .with_argument(id)
        };

        if !arity.is_satisfied_by(raw.len()) {
            return Err(error(ParseErrorKind::IncorrectNumberOfValues).with_values(raw));
        }

        let arg_type = argument.arg_type();
        let mut coerced = Vec::with_capacity(raw.len());
        let mut invalid = Vec::new();
        for value in &raw {
            match arg_type.coerce(value) {
                Some(value) => coerced.push(value),
                None => invalid.push(value.clone()),
            }
        }
        if !invalid.is_empty() {
            return Err(error(ParseErrorKind::InvalidValueType).with_values(invalid));
        }

        if !argument.values.is_empty() {
            let accepted: Vec<Value> = argument
                .values
                .iter()
                .filter_map(|value| arg_type.coerce(&value.content))
                .collect();
            let rejected: Vec<String> = raw
                .iter()
                .zip(&coerced)
                .filter(|(_, value)| !accepted.contains(value))
                .map(|(raw, _)| raw.clone())
                .collect();
            if !rejected.is_empty() {
                let choices = argument
                    .values
                    .iter()
                    .map(|value| value.content.clone())
                    .collect();
                return Err(error(ParseErrorKind::InvalidValueOpts)
                    .with_values(rejected)
                    .with_accepted(choices));
            }
        }

        let value = match argument.nargs() {
            None => coerced.into_iter().next().unwrap_or(Value::Null),
            Some(_) => Value::List(coerced),
        };
        self.values.insert(id, value);
        self.raw.insert(id, raw);
        if arity.is_bounded() {
            self.last_bounded = Some(id);
        }
        Ok(())
    }

    fn finish(self, command_line: Vec<String>) -> Result<Scan, Error> {
        let decl = self.decl;
        let missing: Vec<ArgumentId> = decl
            .arguments_of(self.active)
            .filter(|argument| argument.is_required() && !self.consumed.contains(&argument.id))
            .map(|argument| argument.id)
            .collect();
        if !missing.is_empty() && self.system.is_none() {
            return Err(ParseError::new(ParseErrorKind::MissingArguments, self.active)
                .with_missing(missing)
                .into());
        }

        let initial_state: BTreeMap<String, Value> = decl
            .arguments_of(self.active)
            .map(|argument| (argument.key.clone(), argument.settings.initial_value()))
            .collect();
        let mut arguments = initial_state.clone();
        for (id, value) in self.values {
            arguments.insert(decl[id].key.clone(), value);
        }

        let supplied: Vec<String> = self
            .consumed
            .iter()
            .map(|id| decl[*id].key.clone())
            .collect();
        let callbacks = self
            .consumed
            .iter()
            .copied()
            .filter(|id| {
                let argument = &decl[*id];
                argument.settings.callback.is_some()
                    && argument.arg_type().system_callback().is_none()
            })
            .collect();
        let system_callback = self
            .system
            .and_then(|id| decl[id].arg_type().system_callback());

        debug!(
            command = %self.active,
            supplied = supplied.len(),
            system = ?system_callback,
            "parse finished"
        );

        Ok(Scan {
            parsed: Parsed {
                arguments,
                commands: self.path,
                initial_state,
                supplied,
                command_line,
                system_callback,
                command: self.active,
            },
            system: self.system,
            callbacks,
        })
    }
}

/// Runs the state machine over `tokens`.
pub(crate) fn scan(
    decl: &Declaration,
    tokens: Vec<Token>,
    command_line: Vec<String>,
) -> Result<Scan, Error> {
    let mut machine = Machine::new(decl)?;
    let mut queue: VecDeque<Token> = tokens.into();
    while let Some(token) = queue.pop_front() {
        machine.step(token, &mut queue)?;
    }
    machine.finish(command_line)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::lang::English;
    use crate::options::{ArgumentOptions, CodePreference};
    use crate::tokenize::{tokenize, DashStyle};
    use proptest::prelude::*;
    use std::rc::Rc;

    proptest! {
        #[test]
        fn repeated_short_flags_count_exactly(n in 1usize..20) {
            let mut decl =
                Declaration::new(DashStyle::Double, CodePreference::Long, Rc::new(English));
            decl.add_argument(CommandId::ROOT.into(), ["-c"], ArgumentOptions::of(ArgType::Count))
                .unwrap();
            let word = format!("-{}", "c".repeat(n));
            let tokens = tokenize([word.as_str()], DashStyle::Double);
            let parsed = scan(&decl, tokens, vec![word.clone()]).unwrap().parsed;
            prop_assert_eq!(parsed.count("c"), n as i64);
        }

        #[test]
        fn star_positionals_take_every_plain_word(words in prop::collection::vec("[a-z]{1,6}", 0..10)) {
            let mut decl =
                Declaration::new(DashStyle::Double, CodePreference::Long, Rc::new(English));
            decl.add_argument(
                CommandId::ROOT.into(),
                ["items"],
                ArgumentOptions::new().nargs(Nargs::ZeroOrMore),
            )
            .unwrap();
            let tokens = tokenize(&words, DashStyle::Double);
            let parsed = scan(&decl, tokens, words.clone()).unwrap().parsed;
            let expected: Vec<Value> = words.iter().map(|w| Value::from(w.as_str())).collect();
            prop_assert_eq!(parsed.list("items"), expected.as_slice());
        }
    }
}
