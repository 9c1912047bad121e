use crate::flags::Namespace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env as stdenv;
use std::ffi::{OsStr, OsString};

/// Always set to the namespace resolved for the current invocation.
pub const NAMESPACE_KEY: &str = "DOCKER_STACK_NAMESPACE";
/// Only set when the caller's environment does not already define it.
pub const REGISTRY_URL_KEY: &str = "DOCKER_REGISTRY_URL";
pub const DEFAULT_REGISTRY_URL: &str = "docker.io";
pub const RANDOM_KEY: &str = "RANDOM";

/// Seed for the `RANDOM` value. Fixed so the value is the same on every run.
pub const RANDOM_SEED: u64 = 99;

/// Ordered view of a process environment.
///
/// Variables keep their insertion order so the environment handed to the
/// delegate is deterministic. Keys and values are kept as `OsString` so
/// variables that are not valid UTF-8 pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(OsString, OsString)>,
}

impl Environment {
    /// Snapshot the environment of the current process.
    pub fn capture() -> Self {
        stdenv::vars_os().collect()
    }

    /// Get the value of a variable.
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Get the value of a variable if it is valid UTF-8.
    pub fn get_str(&self, key: impl AsRef<OsStr>) -> Option<&str> {
        self.get(key).and_then(OsStr::to_str)
    }

    pub fn contains(&self, key: impl AsRef<OsStr>) -> bool {
        self.get(key).is_some()
    }

    /// Set or override a variable. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        let key = key.into();
        let val = val.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = val,
            None => self.vars.push((key, val)),
        }
    }

    /// Set a variable only when the key is not defined yet.
    pub fn set_if_absent(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        let key = key.into();
        if !self.contains(&key) {
            self.vars.push((key, val.into()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::default();
        for (k, v) in iter {
            env.set(k, v);
        }
        env
    }
}

/// Derive the environment for one delegate invocation.
///
/// `inherited` is never modified: every call starts from a fresh copy, so
/// repeated invocations in the same process cannot accumulate variables.
pub fn build_environment(namespace: &Namespace, inherited: &Environment) -> Environment {
    let mut env = inherited.clone();
    env.set(RANDOM_KEY, reproducible_random().to_string());
    env.set_if_absent(REGISTRY_URL_KEY, DEFAULT_REGISTRY_URL);
    env.set(NAMESPACE_KEY, namespace.as_str());
    env
}

/// First `u32` drawn from a generator seeded with [`RANDOM_SEED`].
pub fn reproducible_random() -> u32 {
    StdRng::seed_from_u64(RANDOM_SEED).random()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(name: &str) -> Namespace {
        name.parse().unwrap()
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::default();

        // initially absent
        assert_eq!(env.get("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set("KEY", "VALUE");
        assert_eq!(env.get_str("KEY"), Some("VALUE"));

        env.set("KEY", "OTHER");
        assert_eq!(env.get_str("KEY"), Some("OTHER"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::capture();
        assert!(env.get("PATH").is_some());
    }

    #[test]
    fn set_if_absent_keeps_existing_value() {
        let mut env: Environment = [("A", "1")].into_iter().collect();
        env.set_if_absent("A", "2");
        env.set_if_absent("B", "3");
        assert_eq!(env.get_str("A"), Some("1"));
        assert_eq!(env.get_str("B"), Some("3"));
    }

    #[test]
    fn registry_url_defaults_when_absent() {
        let env = build_environment(&ns("prod"), &Environment::default());
        assert_eq!(env.get_str(REGISTRY_URL_KEY), Some(DEFAULT_REGISTRY_URL));
    }

    #[test]
    fn registry_url_from_caller_survives() {
        let inherited: Environment = [(REGISTRY_URL_KEY, "registry.internal:5000")]
            .into_iter()
            .collect();
        let env = build_environment(&ns("prod"), &inherited);
        assert_eq!(env.get_str(REGISTRY_URL_KEY), Some("registry.internal:5000"));
    }

    #[test]
    fn namespace_is_always_overwritten() {
        let inherited: Environment = [(NAMESPACE_KEY, "stale")].into_iter().collect();
        let env = build_environment(&ns("prod"), &inherited);
        assert_eq!(env.get_str(NAMESPACE_KEY), Some("prod"));
    }

    #[test]
    fn inherited_variables_pass_through_in_order() {
        let inherited: Environment = [("PATH", "/bin"), ("HOME", "/root")].into_iter().collect();
        let env = build_environment(&ns("prod"), &inherited);
        let keys: Vec<_> = env.iter().map(|(k, _)| k.to_owned()).collect();
        assert_eq!(
            keys,
            ["PATH", "HOME", RANDOM_KEY, REGISTRY_URL_KEY, NAMESPACE_KEY]
        );
    }

    #[test]
    fn random_value_is_reproducible() {
        let first = build_environment(&ns("a"), &Environment::default());
        let second = build_environment(&ns("b"), &Environment::default());
        assert_eq!(first.get(RANDOM_KEY), second.get(RANDOM_KEY));
        assert_eq!(reproducible_random(), reproducible_random());
    }

    #[test]
    fn inherited_environment_is_not_mutated() {
        let inherited: Environment = [("PATH", "/bin")].into_iter().collect();
        let before = inherited.clone();
        let first = build_environment(&ns("one"), &inherited);
        let second = build_environment(&ns("two"), &inherited);
        assert_eq!(inherited, before);
        assert_eq!(first.len(), second.len());
        assert_eq!(second.get_str(NAMESPACE_KEY), Some("two"));
    }
}
