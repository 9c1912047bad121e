use crate::command::StackCommand;
use crate::flags::{DEFAULT_COMPOSE_FILE, FlagSet, FlagSpec, FlagValue, Namespace, ResolveImage};
use crate::invocation::{CONFIG_FLAGS, DEPLOY_FLAGS, config_argv, deploy_argv};
use argh::FromArgs;

fn compose_files(given: &[String]) -> Vec<String> {
    if given.is_empty() {
        vec![DEFAULT_COMPOSE_FILE.to_string()]
    } else {
        given.to_vec()
    }
}

#[derive(FromArgs, Debug, PartialEq)]
/// Deploy a stack to the Docker Swarm cluster.
pub struct Deploy {
    #[argh(positional)]
    /// stack namespace; defaults to "default".
    pub namespace: Option<Namespace>,

    #[argh(option, short = 'c')]
    /// path to a Compose file, or "-" to read from stdin; repeatable. Defaults to docker-stack.yml.
    pub compose_file: Vec<String>,

    #[argh(option, short = 'd', default = "true")]
    /// exit immediately instead of waiting for the stack services to converge.
    pub detach: bool,

    #[argh(option, default = "false")]
    /// prune services that are no longer referenced.
    pub prune: bool,

    #[argh(option, short = 'q', default = "false")]
    /// suppress progress output.
    pub quiet: bool,

    #[argh(option, default = "ResolveImage::Always")]
    /// query the registry to resolve image digest and supported platforms ("always", "changed", "never").
    pub resolve_image: ResolveImage,

    #[argh(option, default = "false")]
    /// send registry authentication details to Swarm agents.
    pub with_registry_auth: bool,
}

impl StackCommand for Deploy {
    const NAME: &'static str = "deploy";
    const ABOUT: &'static str = "Deploy a stack to the Docker Swarm cluster";
    const FLAGS: &'static [FlagSpec] = DEPLOY_FLAGS;

    fn namespace(&self) -> Namespace {
        self.namespace.clone().unwrap_or_default()
    }

    fn flags(&self) -> FlagSet {
        FlagSet::new()
            .with("compose-file", FlagValue::List(compose_files(&self.compose_file)))
            .with("detach", FlagValue::Bool(self.detach))
            .with("prune", FlagValue::Bool(self.prune))
            .with("quiet", FlagValue::Bool(self.quiet))
            .with("resolve-image", FlagValue::Str(self.resolve_image.to_string()))
            .with("with-registry-auth", FlagValue::Bool(self.with_registry_auth))
    }

    fn argv(namespace: &Namespace, flags: &FlagSet) -> Vec<String> {
        deploy_argv(namespace, flags)
    }
}

#[derive(FromArgs, Debug, PartialEq)]
/// Output the final config file, after doing merges and interpolations.
pub struct Config {
    #[argh(positional)]
    /// namespace exported to the Compose file for interpolation; defaults to "default".
    pub namespace: Option<Namespace>,

    #[argh(option, short = 'c')]
    /// path to a Compose file, or "-" to read from stdin; repeatable. Defaults to docker-stack.yml.
    pub compose_file: Vec<String>,

    #[argh(option, default = "false")]
    /// skip interpolation and output only merged config.
    pub skip_interpolation: bool,
}

impl StackCommand for Config {
    const NAME: &'static str = "config";
    const ABOUT: &'static str = "Outputs the final config file, after doing merges and interpolations";
    const FLAGS: &'static [FlagSpec] = CONFIG_FLAGS;

    fn namespace(&self) -> Namespace {
        self.namespace.clone().unwrap_or_default()
    }

    fn flags(&self) -> FlagSet {
        FlagSet::new()
            .with("compose-file", FlagValue::List(compose_files(&self.compose_file)))
            .with("skip-interpolation", FlagValue::Bool(self.skip_interpolation))
    }

    fn argv(_namespace: &Namespace, flags: &FlagSet) -> Vec<String> {
        config_argv(flags)
    }
}
