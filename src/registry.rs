use crate::command::{Handler, StackCommand};
use crate::error::StackxError;
use crate::flags::normalize_args;
use crate::subcommands::{Config, Deploy};
use argh::EarlyExit;
use std::fmt::Write as _;

type ParseFn = fn(&[&str]) -> Result<Box<dyn Handler>, EarlyExit>;

/// One row of the command table.
pub struct CommandEntry {
    pub name: &'static str,
    pub about: &'static str,
    parse: ParseFn,
}

/// Subcommands known to the plugin, sorted by name.
pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: Config::NAME,
        about: Config::ABOUT,
        parse: parse::<Config>,
    },
    CommandEntry {
        name: Deploy::NAME,
        about: Deploy::ABOUT,
        parse: parse::<Deploy>,
    },
];

fn parse<T: StackCommand>(args: &[&str]) -> Result<Box<dyn Handler>, EarlyExit> {
    let normalized = normalize_args(args, T::FLAGS);
    let refs: Vec<&str> = normalized.iter().map(String::as_str).collect();
    T::from_args(&["docker", "stackx", T::NAME], &refs).map(|cmd| Box::new(cmd) as Box<dyn Handler>)
}

/// Outcome of resolving the arguments handed over by the host.
pub enum Resolution {
    /// Nothing to run; show the top-level help.
    Help,
    Version,
    /// A subcommand was parsed and can be prepared.
    Command(Box<dyn Handler>),
    /// The flag parser stopped early, e.g. `deploy --help` or a bad flag.
    Exit { output: String, is_error: bool },
}

pub struct Registry {
    commands: &'static [CommandEntry],
}

impl Registry {
    pub fn new(commands: &'static [CommandEntry]) -> Self {
        Self { commands }
    }

    pub fn lookup(&self, name: &str) -> Option<&'static CommandEntry> {
        self.commands.iter().find(|entry| entry.name == name)
    }

    /// Select a subcommand from `args` and parse its flags.
    ///
    /// Unknown flags are reported by the flag parser as [`Resolution::Exit`];
    /// only an unknown subcommand name is an error here.
    pub fn resolve(&self, args: &[&str]) -> Result<Resolution, StackxError> {
        let Some((&first, rest)) = args.split_first() else {
            return Ok(Resolution::Help);
        };
        match first {
            "help" | "--help" | "-h" => return Ok(Resolution::Help),
            "--version" => return Ok(Resolution::Version),
            _ => {}
        }
        let entry = self
            .lookup(first)
            .ok_or_else(|| StackxError::UnknownCommand(first.to_string()))?;
        tracing::debug!(command = entry.name, "resolved subcommand");
        Ok(match (entry.parse)(rest) {
            Ok(handler) => Resolution::Command(handler),
            Err(EarlyExit { output, status }) => Resolution::Exit {
                output,
                is_error: status.is_err(),
            },
        })
    }

    /// Top-level usage text.
    pub fn help(&self) -> String {
        let width = self
            .commands
            .iter()
            .map(|entry| entry.name.len())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        out.push_str("Usage:  docker stackx COMMAND\n\n");
        out.push_str("Extended Docker Stack CLI plugin\n\n");
        out.push_str("Commands:\n");
        for entry in self.commands {
            let _ = writeln!(out, "  {:<width$}  {}", entry.name, entry.about);
        }
        out.push_str("\nRun 'docker stackx COMMAND --help' for more information on a command.\n");
        out
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(COMMANDS)
    }
}
