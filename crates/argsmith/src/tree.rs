//! The declaration tree: commands, sections, arguments and accepted values.
//!
//! Nodes live in id-indexed maps owned by a [`Declaration`]. Parents and
//! children refer to each other by id, so walking up (for command paths and
//! inherited options) and down (for parsing tables and help) needs no
//! shared ownership.
//!
//! Codes and keys are unique across the whole tree: an argument code used in
//! one command cannot be reused by any other command.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use tracing::debug;

use crate::error::ConfigError;
use crate::lang::Locale;
use crate::options::{
    resolve_argument, ArgumentOptions, ArgumentSettings, CodePreference, CommandOptions,
    SectionOptions, ValueOptions,
};
use crate::tokenize::{classify_code, DashStyle, TokenKind};
use crate::types::{ArgType, Nargs};

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Raw numeric id, unique across all node kinds.
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

node_id!(
    /// Id of a [`Command`].
    CommandId
);
node_id!(
    /// Id of a [`Section`].
    SectionId
);
node_id!(
    /// Id of an [`Argument`].
    ArgumentId
);

impl CommandId {
    /// The root command, created with every declaration.
    pub const ROOT: CommandId = CommandId(0);
}

/// Where a new argument or command is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The command's default section.
    Command(CommandId),
    /// A specific section, and through it its command.
    Section(SectionId),
}

impl From<CommandId> for Target {
    fn from(id: CommandId) -> Self {
        Target::Command(id)
    }
}

impl From<SectionId> for Target {
    fn from(id: SectionId) -> Self {
        Target::Section(id)
    }
}

/// One declared code of an argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Code {
    /// The code as declared, dashes included.
    pub content: String,
    pub kind: TokenKind,
}

impl Code {
    pub fn is_option(&self) -> bool {
        self.kind.is_option()
    }

    pub fn is_positional(&self) -> bool {
        self.kind == TokenKind::Positional
    }

    pub fn is_short(&self) -> bool {
        self.kind == TokenKind::ShortOption
    }

    pub fn is_long(&self) -> bool {
        self.kind == TokenKind::LongOption
    }

    /// The code without leading dashes.
    pub fn name(&self) -> &str {
        self.content.trim_start_matches('-')
    }
}

/// A value an argument accepts, with an optional description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedValue {
    pub content: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Argument {
    pub id: ArgumentId,
    pub command: CommandId,
    pub section: SectionId,
    pub key: String,
    pub codes: Vec<Code>,
    primary: usize,
    pub is_option: bool,
    pub settings: ArgumentSettings,
    /// Resolved metavars. Empty for arguments that take no values or hide them.
    pub metavars: Vec<String>,
    pub values: Vec<AcceptedValue>,
}

impl Argument {
    /// The code that names this argument when only one is shown.
    pub fn primary_code(&self) -> &Code {
        &self.codes[self.primary]
    }

    pub fn arg_type(&self) -> ArgType {
        self.settings.arg_type
    }

    pub fn nargs(&self) -> Option<Nargs> {
        self.settings.nargs
    }

    pub fn is_required(&self) -> bool {
        self.settings.required
    }

    pub fn accepts_values(&self) -> bool {
        self.settings.arg_type.accepts_values()
    }

    pub fn description(&self) -> &str {
        self.settings.description.as_deref().unwrap_or("")
    }

    pub fn short_codes(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter().filter(|code| code.is_short())
    }

    pub fn long_codes(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter().filter(|code| code.is_long())
    }

    /// How the argument is named in error messages: `-o/--out` for options,
    /// the metavar for positionals.
    pub fn display_name(&self) -> String {
        if self.is_option {
            self.codes
                .iter()
                .map(|code| code.content.as_str())
                .collect::<Vec<_>>()
                .join("/")
        } else {
            self.metavars
                .first()
                .cloned()
                .unwrap_or_else(|| self.key.clone())
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootSections {
    pub commands: SectionId,
    pub positional: SectionId,
    pub optional: SectionId,
}

#[derive(Clone, Debug)]
pub struct Command {
    pub id: CommandId,
    pub parent: Option<CommandId>,
    /// `None` for the root command.
    pub label: Option<String>,
    pub description: Option<String>,
    /// Section of the parent that lists this command.
    pub listed_in: Option<SectionId>,
    pub root_sections: RootSections,
    /// Caller-created sections in creation order.
    pub sections: Vec<SectionId>,
    /// Arguments in declaration order.
    pub arguments: Vec<ArgumentId>,
    /// Child commands in declaration order.
    pub commands: Vec<CommandId>,
    codes: BTreeSet<String>,
    keys: BTreeSet<String>,
}

impl Command {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Commands,
    Positional,
    Optional,
    Custom,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionItem {
    Argument(ArgumentId),
    Command(CommandId),
    /// Free text, one entry per paragraph.
    Text(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct Section {
    pub id: SectionId,
    pub command: CommandId,
    pub kind: SectionKind,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<SectionItem>,
}

/// One command's slice of the tree, see [`Declaration::argument_hierarchy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandScope {
    pub command: CommandId,
    pub depth: usize,
    pub arguments: Vec<ArgumentId>,
    pub commands: Vec<CommandId>,
}

/// Owner of every node.
///
/// Indexing with an id from another declaration panics.
#[derive(Clone, Debug)]
pub struct Declaration {
    next_id: u32,
    commands: BTreeMap<CommandId, Command>,
    sections: BTreeMap<SectionId, Section>,
    arguments: BTreeMap<ArgumentId, Argument>,
    style: DashStyle,
    preference: CodePreference,
    locale: Rc<dyn Locale>,
}

impl Declaration {
    /// An empty declaration holding only the root command.
    pub fn new(style: DashStyle, preference: CodePreference, locale: Rc<dyn Locale>) -> Self {
        let mut declaration = Self {
            next_id: 0,
            commands: BTreeMap::new(),
            sections: BTreeMap::new(),
            arguments: BTreeMap::new(),
            style,
            preference,
            locale,
        };
        declaration.insert_command(None, None, None, None);
        declaration
    }

    pub fn dash_style(&self) -> DashStyle {
        self.style
    }

    pub fn code_preference(&self) -> CodePreference {
        self.preference
    }

    pub fn locale(&self) -> &dyn Locale {
        self.locale.as_ref()
    }

    fn next_raw_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_section(
        &mut self,
        command: CommandId,
        kind: SectionKind,
        title: String,
        description: Option<String>,
    ) -> SectionId {
        let id = SectionId(self.next_raw_id());
        self.sections.insert(
            id,
            Section {
                id,
                command,
                kind,
                title,
                description,
                items: Vec::new(),
            },
        );
        id
    }

    fn insert_command(
        &mut self,
        parent: Option<CommandId>,
        listed_in: Option<SectionId>,
        label: Option<String>,
        description: Option<String>,
    ) -> CommandId {
        let id = CommandId(self.next_raw_id());
        let titles = [
            self.locale.section_commands().to_string(),
            self.locale.section_positional().to_string(),
            self.locale.section_optional().to_string(),
        ];
        let [commands, positional, optional] = titles;
        let root_sections = RootSections {
            commands: self.insert_section(id, SectionKind::Commands, commands, None),
            positional: self.insert_section(id, SectionKind::Positional, positional, None),
            optional: self.insert_section(id, SectionKind::Optional, optional, None),
        };
        self.commands.insert(
            id,
            Command {
                id,
                parent,
                label,
                description,
                listed_in,
                root_sections,
                sections: Vec::new(),
                arguments: Vec::new(),
                commands: Vec::new(),
                codes: BTreeSet::new(),
                keys: BTreeSet::new(),
            },
        );
        id
    }

    /// Splits a target into its command and explicit section.
    fn locate(&self, target: Target) -> (CommandId, Option<SectionId>) {
        match target {
            Target::Command(command) => (command, None),
            Target::Section(section) => (self[section].command, Some(section)),
        }
    }

    fn code_in_use(&self, code: &str) -> bool {
        self.commands.values().any(|command| command.codes.contains(code))
    }

    fn key_in_use(&self, key: &str) -> bool {
        self.commands.values().any(|command| command.keys.contains(key))
    }

    /// Declares an argument.
    ///
    /// Codes starting with a dash declare an option; a single plain word
    /// declares a positional argument.
    pub fn add_argument<I, S>(
        &mut self,
        target: Target,
        codes: I,
        options: ArgumentOptions,
    ) -> Result<ArgumentId, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (command, section) = self.locate(target);
        let raw: Vec<String> = codes
            .into_iter()
            .map(|code| code.as_ref().trim().to_string())
            .collect();
        if raw.is_empty() {
            return Err(ConfigError::EmptyCodes);
        }

        let codes = raw
            .iter()
            .map(|code| {
                classify_code(code, self.style).map(|token| Code {
                    content: token.content,
                    kind: token.kind,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let is_option = codes[0].is_option();
        if codes.iter().any(|code| code.is_option() != is_option) {
            return Err(ConfigError::MixedCodes { codes: raw });
        }
        if !is_option && codes.len() > 1 {
            return Err(ConfigError::InvalidCode {
                code: raw.join(" "),
                reason: "a positional argument has exactly one code",
            });
        }

        let distinct: BTreeSet<&str> = raw.iter().map(String::as_str).collect();
        if distinct.len() != raw.len() || raw.iter().any(|code| self.code_in_use(code)) {
            return Err(ConfigError::DuplicateCodes { codes: raw });
        }

        let explicit_key = options
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        let settings = resolve_argument(options, is_option, self.locale.as_ref())?;

        let key = explicit_key.unwrap_or_else(|| {
            codes
                .iter()
                .find(|code| code.is_long() || code.is_positional())
                .unwrap_or(&codes[0])
                .name()
                .to_string()
        });
        if self.key_in_use(&key) {
            return Err(ConfigError::DuplicateKey { key });
        }

        let primary = primary_index(&codes, self.preference);
        let metavars = match &settings.metavar {
            Some(metavars) => metavars.clone(),
            None if settings.arg_type.accepts_values() => {
                vec![self.locale.to_metavar(&codes[primary].content)]
            }
            None => Vec::new(),
        };

        let root_sections = self[command].root_sections;
        let section = section.unwrap_or(if is_option {
            root_sections.optional
        } else {
            root_sections.positional
        });

        let id = ArgumentId(self.next_raw_id());
        debug!(%id, %key, codes = ?raw, arg_type = %settings.arg_type, "declared argument");

        let owner = self.command_mut(command);
        owner.codes.extend(raw.iter().cloned());
        owner.keys.insert(key.clone());
        owner.arguments.push(id);
        self.section_mut(section).items.push(SectionItem::Argument(id));
        self.arguments.insert(
            id,
            Argument {
                id,
                command,
                section,
                key,
                codes,
                primary,
                is_option,
                settings,
                metavars,
                values: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Declares a subcommand.
    pub fn add_command(
        &mut self,
        target: Target,
        label: &str,
        options: CommandOptions,
    ) -> Result<CommandId, ConfigError> {
        let (parent, section) = self.locate(target);
        let label = label.trim();
        let invalid = |reason| ConfigError::InvalidCommandLabel {
            label: label.to_string(),
            reason,
        };
        if label.is_empty() {
            return Err(invalid("label is empty"));
        }
        if label.starts_with('-') {
            return Err(invalid("label looks like an option"));
        }
        if label.chars().any(char::is_whitespace) {
            return Err(invalid("label contains whitespace"));
        }
        if self[parent]
            .commands
            .iter()
            .any(|child| self[*child].label() == label)
        {
            return Err(ConfigError::DuplicateCommand {
                label: label.to_string(),
            });
        }

        let section = section.unwrap_or(self[parent].root_sections.commands);
        let id = self.insert_command(
            Some(parent),
            Some(section),
            Some(label.to_string()),
            options.description,
        );
        debug!(%id, %label, parent = %parent, "declared command");
        self.command_mut(parent).commands.push(id);
        self.section_mut(section).items.push(SectionItem::Command(id));
        Ok(id)
    }

    /// Adds a titled section to a command. Sections render between the
    /// command list and the positional arguments, in creation order.
    pub fn add_section(
        &mut self,
        command: CommandId,
        title: &str,
        options: SectionOptions,
    ) -> SectionId {
        let id = self.insert_section(
            command,
            SectionKind::Custom,
            title.to_string(),
            options.description,
        );
        self.command_mut(command).sections.push(id);
        id
    }

    /// Appends a block of free text paragraphs to a section.
    pub fn add_text<I, S>(&mut self, section: SectionId, paragraphs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paragraphs = paragraphs.into_iter().map(Into::into).collect();
        self.section_mut(section)
            .items
            .push(SectionItem::Text(paragraphs));
    }

    /// Restricts an argument to a set of values, one call per value.
    pub fn add_value(
        &mut self,
        argument: ArgumentId,
        value: &str,
        options: ValueOptions,
    ) -> Result<(), ConfigError> {
        let arg_type = self[argument].arg_type();
        if !arg_type.accepts_values() {
            return Err(ConfigError::ValuesNotAccepted { arg_type });
        }
        if arg_type.coerce(value).is_none() {
            return Err(ConfigError::InvalidOptionValue {
                option: "values",
                arg_type,
                expected: "valid for the argument type",
            });
        }
        self.argument_mut(argument).values.push(AcceptedValue {
            content: value.to_string(),
            description: options.description,
        });
        Ok(())
    }

    fn command_mut(&mut self, id: CommandId) -> &mut Command {
        self.commands
            .get_mut(&id)
            .unwrap_or_else(|| panic!("command {id} is not part of this declaration"))
    }

    fn section_mut(&mut self, id: SectionId) -> &mut Section {
        self.sections
            .get_mut(&id)
            .unwrap_or_else(|| panic!("section {id} is not part of this declaration"))
    }

    fn argument_mut(&mut self, id: ArgumentId) -> &mut Argument {
        self.arguments
            .get_mut(&id)
            .unwrap_or_else(|| panic!("argument {id} is not part of this declaration"))
    }

    pub fn root(&self) -> &Command {
        &self[CommandId::ROOT]
    }

    pub fn command(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(&id)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn argument(&self, id: ArgumentId) -> Option<&Argument> {
        self.arguments.get(&id)
    }

    /// Direct arguments of a command, in declaration order.
    pub fn arguments_of(&self, command: CommandId) -> impl Iterator<Item = &Argument> {
        self[command].arguments.iter().map(move |id| &self[*id])
    }

    /// Direct subcommands of a command, in declaration order.
    pub fn commands_of(&self, command: CommandId) -> impl Iterator<Item = &Command> {
        self[command].commands.iter().map(move |id| &self[*id])
    }

    /// Sections of a command in display order: commands, caller sections,
    /// positional arguments, optional arguments.
    pub fn sections_of(&self, command: CommandId) -> Vec<&Section> {
        let command = &self[command];
        std::iter::once(command.root_sections.commands)
            .chain(command.sections.iter().copied())
            .chain([command.root_sections.positional, command.root_sections.optional])
            .map(|id| &self[id])
            .collect()
    }

    /// Arguments of a command in display order.
    pub fn display_arguments(&self, command: CommandId) -> Vec<&Argument> {
        self.sections_of(command)
            .into_iter()
            .flat_map(|section| section.items.iter())
            .filter_map(|item| match item {
                SectionItem::Argument(id) => Some(&self[*id]),
                _ => None,
            })
            .collect()
    }

    /// The command followed by its ancestors up to the root.
    pub fn ancestry(&self, command: CommandId) -> Vec<CommandId> {
        let mut chain = vec![command];
        let mut current = command;
        while let Some(parent) = self[current].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Labels from the root's first child down to `command`.
    pub fn command_path(&self, command: CommandId) -> Vec<String> {
        let mut path: Vec<String> = self
            .ancestry(command)
            .into_iter()
            .filter_map(|id| self[id].label.clone())
            .collect();
        path.reverse();
        path
    }

    /// Follows child labels from the root.
    pub fn find_command<S: AsRef<str>>(&self, path: &[S]) -> Option<CommandId> {
        path.iter().try_fold(CommandId::ROOT, |current, label| {
            self.commands_of(current)
                .find(|child| child.label() == label.as_ref())
                .map(|child| child.id)
        })
    }

    pub fn argument_by_key(&self, key: &str) -> Option<&Argument> {
        self.arguments.values().find(|argument| argument.key == key)
    }

    /// Every command down to `max_depth` (root is depth 0, `None` walks the
    /// whole tree), each with its direct arguments and subcommands.
    pub fn argument_hierarchy(&self, max_depth: Option<usize>) -> Vec<CommandScope> {
        let mut scopes = Vec::new();
        let mut stack = vec![(CommandId::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            let command = &self[id];
            scopes.push(CommandScope {
                command: id,
                depth,
                arguments: command.arguments.clone(),
                commands: command.commands.clone(),
            });
            if max_depth.is_some_and(|max| depth >= max) {
                continue;
            }
            for child in command.commands.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        scopes
    }
}

fn primary_index(codes: &[Code], preference: CodePreference) -> usize {
    if let Some(index) = codes.iter().position(Code::is_positional) {
        return index;
    }
    let wanted = match preference {
        CodePreference::Long => TokenKind::LongOption,
        CodePreference::Short => TokenKind::ShortOption,
    };
    codes
        .iter()
        .position(|code| code.kind == wanted)
        .unwrap_or(0)
}

impl Index<CommandId> for Declaration {
    type Output = Command;

    fn index(&self, id: CommandId) -> &Command {
        self.commands
            .get(&id)
            .unwrap_or_else(|| panic!("command {id} is not part of this declaration"))
    }
}

impl Index<SectionId> for Declaration {
    type Output = Section;

    fn index(&self, id: SectionId) -> &Section {
        self.sections
            .get(&id)
            .unwrap_or_else(|| panic!("section {id} is not part of this declaration"))
    }
}

impl Index<ArgumentId> for Declaration {
    type Output = Argument;

    fn index(&self, id: ArgumentId) -> &Argument {
        self.arguments
            .get(&id)
            .unwrap_or_else(|| panic!("argument {id} is not part of this declaration"))
    }
}
