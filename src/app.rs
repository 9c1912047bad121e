use crate::command::{ExitCode, Handler};
use crate::config::Settings;
use crate::env::Environment;
use crate::error::StackxError;
use crate::external::locate_delegate;
use crate::invocation::InvocationSpec;
use crate::plugin::{self, HostRequest, Metadata};
use crate::registry::{Registry, Resolution};
use std::io::{self, Write};

/// The plugin entry point: resolves host arguments and runs the delegate.
///
/// The inherited environment is captured once and only read afterwards, so
/// running several commands on the same `Stackx` gives each of them the same
/// starting point.
///
/// Example
/// ```
/// use docker_stackx::Stackx;
/// let app = Stackx::from_process();
/// let code = app.run(&[]).unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Stackx {
    env: Environment,
    settings: Settings,
    registry: Registry,
}

impl Stackx {
    pub fn new(env: Environment) -> Self {
        let settings = Settings::from_env(&env);
        Self {
            env,
            settings,
            registry: Registry::default(),
        }
    }

    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self::new(Environment::capture())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run with the process' stdout and stderr.
    pub fn run(&self, args: &[&str]) -> anyhow::Result<ExitCode> {
        self.run_with(args, &mut io::stdout(), &mut io::stderr())
    }

    /// Run one invocation, writing help and parser output to the given
    /// streams. The delegate itself always inherits the process streams.
    pub fn run_with(
        &self,
        args: &[&str],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        let args = match plugin::classify(args) {
            HostRequest::Metadata => {
                Metadata::current().write_to(out)?;
                return Ok(0);
            }
            HostRequest::Commands(args) => args,
        };

        let resolution = match self.registry.resolve(args) {
            Ok(resolution) => resolution,
            Err(e) => {
                out.write_all(self.registry.help().as_bytes())?;
                return Err(e.into());
            }
        };

        match resolution {
            Resolution::Help => {
                out.write_all(self.registry.help().as_bytes())?;
                Ok(0)
            }
            Resolution::Version => {
                writeln!(out, "docker-stackx {}", env!("CARGO_PKG_VERSION"))?;
                Ok(0)
            }
            Resolution::Exit { output, is_error } => {
                if is_error {
                    writeln!(err, "{}", output.trim_end())?;
                    Ok(1)
                } else {
                    writeln!(out, "{}", output.trim_end())?;
                    Ok(0)
                }
            }
            Resolution::Command(handler) => Ok(self.prepare(handler)?.run()?),
        }
    }

    /// Locate the delegate and build the invocation for `handler`.
    pub fn prepare(&self, handler: Box<dyn Handler>) -> Result<InvocationSpec, StackxError> {
        let program = locate_delegate(&self.settings.delegate, &self.env)?;
        tracing::debug!(program = %program.display(), "resolved delegate");
        Ok(handler.prepare(program, &self.env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{NAMESPACE_KEY, RANDOM_KEY, REGISTRY_URL_KEY};
    use std::path::Path;

    #[cfg(unix)]
    fn app_with_docker_in(dir: &Path) -> Stackx {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        let docker = dir.join("docker");
        fs::write(&docker, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&docker, fs::Permissions::from_mode(0o755)).unwrap();
        Stackx::new([("PATH", dir.as_os_str())].into_iter().collect())
    }

    fn prepare(app: &Stackx, args: &[&str]) -> InvocationSpec {
        match app.registry().resolve(args).unwrap() {
            Resolution::Command(handler) => app.prepare(handler).unwrap(),
            _ => panic!("expected a command for {args:?}"),
        }
    }

    #[test]
    fn no_args_prints_help() {
        let app = Stackx::new(Environment::default());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(app.run_with(&[], &mut out, &mut err).unwrap(), 0);
        assert!(String::from_utf8(out).unwrap().contains("Commands:"));
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_command_prints_help_then_fails() {
        let app = Stackx::new(Environment::default());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let error = app
            .run_with(&["stackx", "bogus"], &mut out, &mut err)
            .unwrap_err();

        assert!(String::from_utf8(out).unwrap().contains("Usage:"));
        let stackx = error.downcast_ref::<StackxError>().unwrap();
        assert_eq!(stackx.exit_code(), 1);
        assert!(error.to_string().contains("bogus"));
    }

    #[test]
    fn metadata_request_is_answered() {
        let app = Stackx::new(Environment::default());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = app
            .run_with(&[plugin::METADATA_SUBCOMMAND], &mut out, &mut err)
            .unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(out).unwrap().contains("\"SchemaVersion\""));
    }

    #[test]
    fn bad_flag_goes_to_stderr() {
        let app = Stackx::new(Environment::default());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = app
            .run_with(&["deploy", "--bogus"], &mut out, &mut err)
            .unwrap();
        assert_eq!(code, 1);
        assert!(!err.is_empty());
    }

    #[test]
    fn missing_delegate_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let app = Stackx::new([("PATH", dir.path().as_os_str())].into_iter().collect());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let error = app
            .run_with(&["deploy", "prod"], &mut out, &mut err)
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<StackxError>(),
            Some(StackxError::DelegateNotFound { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn default_namespace_reaches_env_and_argv() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_docker_in(dir.path());

        let spec = prepare(&app, &["deploy"]);
        assert_eq!(spec.program(), dir.path().join("docker"));
        assert_eq!(spec.args().last().map(String::as_str), Some("default"));
        assert_eq!(spec.env().get_str(NAMESPACE_KEY), Some("default"));

        let spec = prepare(&app, &["config"]);
        assert_eq!(spec.env().get_str(NAMESPACE_KEY), Some("default"));
        assert!(!spec.args().iter().any(|a| a == "default"));
    }

    #[test]
    #[cfg(unix)]
    fn given_namespace_is_used_consistently() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_docker_in(dir.path());

        let spec = prepare(&app, &["deploy", "prod", "--prune"]);
        assert_eq!(spec.args().last().map(String::as_str), Some("prod"));
        assert_eq!(spec.env().get_str(NAMESPACE_KEY), Some("prod"));
        assert!(spec.args().iter().any(|a| a == "--prune=true"));

        let spec = prepare(&app, &["config", "prod"]);
        assert_eq!(spec.env().get_str(NAMESPACE_KEY), Some("prod"));
        assert!(!spec.args().iter().any(|a| a == "prod"));
    }

    #[test]
    #[cfg(unix)]
    fn repeated_invocations_do_not_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_docker_in(dir.path());

        let first = prepare(&app, &["deploy", "one"]);
        let second = prepare(&app, &["deploy", "two"]);
        assert_eq!(first.env().len(), second.env().len());
        assert_eq!(first.env().get(RANDOM_KEY), second.env().get(RANDOM_KEY));
        assert_eq!(second.env().get_str(NAMESPACE_KEY), Some("two"));
        assert_eq!(app.env.get(NAMESPACE_KEY), None);
        assert_eq!(app.env.get(REGISTRY_URL_KEY), None);
    }
}
