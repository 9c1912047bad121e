use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::StackxError;
use crate::flags::{FlagKind, FlagSet, FlagSpec, Namespace};
use crate::io_adapters::StreamWiring;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

/// Flags forwarded to `docker stack deploy`, in the order they are rendered.
pub const DEPLOY_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("compose-file", Some('c'), FlagKind::List),
    FlagSpec::new("detach", Some('d'), FlagKind::Bool),
    FlagSpec::new("prune", None, FlagKind::Bool),
    FlagSpec::new("quiet", Some('q'), FlagKind::Bool),
    FlagSpec::new("resolve-image", None, FlagKind::Str),
    FlagSpec::new("with-registry-auth", None, FlagKind::Bool),
];

/// Flags forwarded to `docker stack config`, in the order they are rendered.
pub const CONFIG_FLAGS: &[FlagSpec] = &[
    FlagSpec::new("compose-file", Some('c'), FlagKind::List),
    FlagSpec::new("skip-interpolation", None, FlagKind::Bool),
];

/// `stack deploy <flags> <namespace>`
pub fn deploy_argv(namespace: &Namespace, flags: &FlagSet) -> Vec<String> {
    let mut argv = vec!["stack".to_string(), "deploy".to_string()];
    argv.extend(flags.render(DEPLOY_FLAGS));
    argv.push(namespace.to_string());
    argv
}

/// `stack config <flags>`. The namespace only reaches the delegate through
/// its environment.
pub fn config_argv(flags: &FlagSet) -> Vec<String> {
    let mut argv = vec!["stack".to_string(), "config".to_string()];
    argv.extend(flags.render(CONFIG_FLAGS));
    argv
}

/// Fully resolved delegate call: program, arguments, environment and stream
/// wiring. Consumed by [`InvocationSpec::run`].
#[derive(Debug)]
pub struct InvocationSpec {
    program: PathBuf,
    args: Vec<String>,
    env: Environment,
    stdio: StreamWiring,
}

impl InvocationSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, env: Environment) -> Self {
        Self {
            program: program.into(),
            args,
            env,
            stdio: StreamWiring::inherit(),
        }
    }

    pub fn with_stdio(mut self, stdio: StreamWiring) -> Self {
        self.stdio = stdio;
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run the delegate to completion and report its exit status.
    ///
    /// A non-zero status is returned as
    /// [`StackxError::DelegateExecutionFailure`] carrying the same status.
    pub fn run(self) -> Result<ExitCode, StackxError> {
        let program = self.program.display().to_string();
        tracing::debug!(%program, args = ?self.args, "running delegate");

        let status = Command::new(&self.program)
            .args(&self.args)
            .env_clear()
            .envs(self.env.iter())
            .stdin(self.stdio.stdin.stdio())
            .stdout(self.stdio.stdout.stdio())
            .stderr(self.stdio.stderr.stdio())
            .status()
            .map_err(|source| StackxError::Spawn {
                program: program.clone(),
                source,
            })?;

        let code = exit_code(status);
        tracing::debug!(%program, code, "delegate exited");
        match code {
            0 => Ok(0),
            code => Err(StackxError::DelegateExecutionFailure { program, code }),
        }
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    1
}
