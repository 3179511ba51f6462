use std::{
    ffi::{OsStr, OsString},
    path::Path,
};

use crate::{
    build::Parser,
    errors::Result,
    from_args::Status,
};

/// Helper type for loading arguments from the environment.
///
/// This type exists to provide a convenient owned container for args
/// retrieved from [`std::env`], which outlives the parse, so that string
/// outputs can be [resolved][argot_parser::Span::resolve] against
/// [`tokens`][LoadedArguments::tokens].
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<OsString>,
}

impl LoadedArguments {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            arguments: std::env::args_os().collect(),
        }
    }

    /// Build from an explicit argument list, including the program name.
    #[must_use]
    pub fn new(arguments: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn argv0(&self) -> Option<&OsStr> {
        self.arguments.first().map(OsString::as_os_str)
    }

    /// The conventional program name: the file name of `argv[0]`.
    #[must_use]
    pub fn progname(&self) -> String {
        self.argv0()
            .map(Path::new)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Every argument after the program name, as raw bytes.
    #[must_use]
    pub fn tokens(&self) -> Vec<&[u8]> {
        self.arguments
            .get(1..)
            .unwrap_or(&[])
            .iter()
            .map(|arg| arg.as_encoded_bytes())
            .collect()
    }

    /// Parse these arguments with `parser`, writing messages to stdout and
    /// stderr.
    pub fn parse(&self, parser: &mut Parser) -> Result<Status> {
        parser.parse(&self.tokens())
    }
}
