//! Parsed flag values and the Docker-style flag syntax accepted on the
//! command line.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_COMPOSE_FILE: &str = "docker-stack.yml";

/// Name of the deployment target. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace(DEFAULT_NAMESPACE.to_string())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Err("namespace must not be empty".to_string())
        } else {
            Ok(Namespace(s.to_string()))
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepted values of `--resolve-image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveImage {
    #[default]
    Always,
    Changed,
    Never,
}

impl FromStr for ResolveImage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ResolveImage::Always),
            "changed" => Ok(ResolveImage::Changed),
            "never" => Ok(ResolveImage::Never),
            other => Err(format!(
                "invalid resolve-image mode {other:?}, expected \"always\", \"changed\" or \"never\""
            )),
        }
    }
}

impl fmt::Display for ResolveImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResolveImage::Always => "always",
            ResolveImage::Changed => "changed",
            ResolveImage::Never => "never",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    Str,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Str(_) => FlagKind::Str,
            FlagValue::List(_) => FlagKind::List,
        }
    }

    /// Render as `--name=value` tokens. A list yields one token per entry.
    pub fn render(&self, name: &str) -> Vec<String> {
        match self {
            FlagValue::Bool(b) => vec![format!("--{name}={b}")],
            FlagValue::Str(s) => vec![format!("--{name}={s}")],
            FlagValue::List(items) => items.iter().map(|s| format!("--{name}={s}")).collect(),
        }
    }
}

/// Ordered flag name to value mapping, filled once at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    entries: Vec<(String, FlagValue)>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: FlagValue) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Value of `name` if it is present and of the requested kind.
    pub fn get_as(&self, name: &str, kind: FlagKind) -> Option<&FlagValue> {
        self.get(name).filter(|v| v.kind() == kind)
    }

    /// Render the flags named in `schema`, in schema order.
    ///
    /// Flags missing from the set, or holding a value of another kind than
    /// the schema declares, are left out.
    pub fn render(&self, schema: &[FlagSpec]) -> Vec<String> {
        schema
            .iter()
            .filter_map(|spec| self.get_as(spec.long, spec.kind).map(|v| v.render(spec.long)))
            .flatten()
            .collect()
    }
}

/// Declared flag of a subcommand as the delegate knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub long: &'static str,
    pub short: Option<char>,
    pub kind: FlagKind,
}

impl FlagSpec {
    pub const fn new(long: &'static str, short: Option<char>, kind: FlagKind) -> Self {
        Self { long, short, kind }
    }
}

/// Rewrite Docker-style flag syntax into the form argh expects.
///
/// - `--name=value` becomes `--name value`.
/// - A boolean flag given without a value (`--prune`, `-d`) becomes
///   `--prune true`, since booleans are declared as options with a default.
///
/// - Grouped shorthands are split the way pflag does: `-dq` becomes
///   `-d true -q true`, `-d=false` becomes `-d false` and `-ca.yml` becomes
///   `-c a.yml`.
///
/// Everything after a bare `--` is copied as is.
pub fn normalize_args(args: &[&str], schema: &[FlagSpec]) -> Vec<String> {
    let is_bool_long = |name: &str| {
        schema
            .iter()
            .any(|s| s.kind == FlagKind::Bool && s.long == name)
    };

    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        if arg == "--" {
            out.push(arg.to_string());
            out.extend(iter.by_ref().map(|s| s.to_string()));
            break;
        }
        if let Some(long) = arg.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, value)) => {
                    out.push(format!("--{name}"));
                    out.push(value.to_string());
                }
                None => {
                    out.push(arg.to_string());
                    if is_bool_long(long) {
                        out.push("true".to_string());
                    }
                }
            }
            continue;
        }
        match arg.strip_prefix('-').and_then(|shorts| expand_shorts(shorts, schema)) {
            Some(expanded) => out.extend(expanded),
            None => out.push(arg.to_string()),
        }
    }
    out
}

/// Split a shorthand group (without its leading `-`).
///
/// Returns `None` when the group holds a letter the schema does not know,
/// leaving the token for argh to report.
fn expand_shorts(shorts: &str, schema: &[FlagSpec]) -> Option<Vec<String>> {
    if shorts.is_empty() {
        return None;
    }
    let mut out = Vec::new();
    for (i, c) in shorts.char_indices() {
        let spec = schema.iter().find(|s| s.short == Some(c))?;
        let rest = &shorts[i + c.len_utf8()..];
        out.push(format!("-{c}"));
        if let Some(value) = rest.strip_prefix('=') {
            out.push(value.to_string());
            return Some(out);
        }
        if spec.kind != FlagKind::Bool {
            if !rest.is_empty() {
                out.push(rest.to_string());
            }
            return Some(out);
        }
        out.push("true".to_string());
    }
    Some(out)
}
