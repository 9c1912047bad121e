//! `docker stackx`: a Docker CLI plugin that wraps `docker stack`.
//!
//! Each subcommand derives extra context for the delegated `docker stack`
//! call before handing over: a namespace that is exported to the Compose
//! file as `DOCKER_STACK_NAMESPACE` and passed as the stack name, a
//! reproducible `RANDOM` value, and a default `DOCKER_REGISTRY_URL`.
//! Deployment itself is left entirely to `docker`.
//!
//! The main entry point is [`Stackx`]. The [`command`], [`env`] and
//! [`invocation`] modules expose the building blocks: the subcommand traits,
//! environment derivation and the delegate call.

mod app;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
pub mod flags;
pub mod invocation;
pub mod io_adapters;
pub mod logging;
pub mod plugin;
pub mod registry;
pub mod subcommands;

pub use app::Stackx;
pub use error::StackxError;
