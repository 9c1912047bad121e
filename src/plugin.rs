//! Docker CLI plugin handshake.
//!
//! The Docker CLI discovers `docker-stackx` on its plugin path, asks it for
//! metadata with `docker-cli-plugin-metadata`, and then runs it as
//! `docker-stackx stackx <args>`.

use crate::error::StackxError;
use serde::Serialize;
use std::ffi::OsString;
use std::io::Write;

pub const METADATA_SUBCOMMAND: &str = "docker-cli-plugin-metadata";
pub const PLUGIN_NAME: &str = "stackx";
pub const SCHEMA_VERSION: &str = "0.1.0";
pub const VENDOR: &str = "github.com/socheatsok78/docker-stackx-cli-plugin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    pub schema_version: &'static str,
    pub vendor: &'static str,
    pub version: &'static str,
    pub short_description: &'static str,
}

impl Metadata {
    pub fn current() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            vendor: VENDOR,
            version: env!("CARGO_PKG_VERSION"),
            short_description: "Docker Stack Extended",
        }
    }

    pub fn write_to(&self, out: &mut dyn Write) -> Result<(), StackxError> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        out.write_all(b"\n").map_err(serde_json::Error::io)?;
        Ok(())
    }
}

/// What the host asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum HostRequest<'a> {
    Metadata,
    /// Arguments for the command registry, plugin name already stripped.
    Commands(&'a [&'a str]),
}

/// Classify the raw arguments (program name excluded).
///
/// Invoked through `docker stackx`, the first argument is the plugin name;
/// invoked directly it is not there.
pub fn classify<'a>(args: &'a [&'a str]) -> HostRequest<'a> {
    match args.split_first() {
        Some((&METADATA_SUBCOMMAND, _)) => HostRequest::Metadata,
        Some((&PLUGIN_NAME, rest)) => HostRequest::Commands(rest),
        _ => HostRequest::Commands(args),
    }
}

/// Convert the raw process arguments into strings.
///
/// Arguments that are not valid UTF-8 are rejected rather than altered, so
/// a path is never forwarded to the delegate in a lossy form.
pub fn decode_args<I>(args: I) -> Result<Vec<String>, StackxError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|raw| StackxError::InvalidArgument(raw.to_string_lossy().into_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_uses_docker_field_names() {
        let mut out = Vec::new();
        Metadata::current().write_to(&mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["SchemaVersion"], SCHEMA_VERSION);
        assert_eq!(json["Vendor"], VENDOR);
        assert_eq!(json["Version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["ShortDescription"], "Docker Stack Extended");
    }

    #[test]
    fn classify_strips_plugin_name() {
        assert_eq!(
            classify(&["stackx", "deploy", "prod"]),
            HostRequest::Commands(&["deploy", "prod"])
        );
        assert_eq!(
            classify(&["deploy", "prod"]),
            HostRequest::Commands(&["deploy", "prod"])
        );
        assert_eq!(classify(&[]), HostRequest::Commands(&[]));
    }

    #[test]
    fn decode_args_keeps_utf8_arguments() {
        let args = decode_args(["deploy", "prod"].map(OsString::from)).unwrap();
        assert_eq!(args, ["deploy", "prod"]);
    }

    #[test]
    #[cfg(unix)]
    fn decode_args_rejects_invalid_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"st\xffack.yml").to_owned();
        let err = decode_args([OsString::from("-c"), raw]).unwrap_err();
        assert!(matches!(err, StackxError::InvalidArgument(ref arg) if arg.starts_with("st")));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn classify_detects_metadata_request() {
        assert_eq!(classify(&[METADATA_SUBCOMMAND]), HostRequest::Metadata);
    }
}
