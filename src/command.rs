use crate::env::{Environment, build_environment};
use crate::flags::{FlagSet, FlagSpec, Namespace};
use crate::invocation::InvocationSpec;
use argh::FromArgs;
use std::path::PathBuf;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// A `docker stack` subcommand this plugin wraps.
///
/// Implementors are parsed with [`argh`] (`FromArgs`) and only describe what
/// they forward; turning them into a delegate call is shared through the
/// blanket [`Handler`] implementation.
pub trait StackCommand: FromArgs + Sized + 'static {
    /// Name of the subcommand, e.g. "deploy".
    const NAME: &'static str;

    /// One-line description shown in the top-level help.
    const ABOUT: &'static str;

    /// Flags accepted on the command line and forwarded to the delegate.
    const FLAGS: &'static [FlagSpec];

    /// Namespace given on the command line, or the default one.
    fn namespace(&self) -> Namespace;

    /// Parsed flag values, defaults included.
    fn flags(&self) -> FlagSet;

    /// Arguments for the delegate, without the program itself.
    fn argv(namespace: &Namespace, flags: &FlagSet) -> Vec<String>;
}

/// Object-safe view of a parsed subcommand, ready to be turned into an
/// [`InvocationSpec`].
pub trait Handler {
    fn name(&self) -> &'static str;

    /// Build the delegate call for `program` on top of `inherited`.
    ///
    /// `inherited` is only read; the returned spec owns its own environment.
    fn prepare(self: Box<Self>, program: PathBuf, inherited: &Environment) -> InvocationSpec;
}

impl<T: StackCommand> Handler for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn prepare(self: Box<Self>, program: PathBuf, inherited: &Environment) -> InvocationSpec {
        let namespace = self.namespace();
        let flags = self.flags();
        let args = T::argv(&namespace, &flags);
        let env = build_environment(&namespace, inherited);
        tracing::debug!(command = T::NAME, %namespace, ?args, "prepared invocation");
        InvocationSpec::new(program, args, env)
    }
}
