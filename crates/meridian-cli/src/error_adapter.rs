//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! This module provides the bridge between the CLI's standard error type and
//! miette's rich diagnostic formatting. Incomplete layout configurations get a
//! help line naming the key to set.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use meridian::ConfigurationError;

use crate::error::CliError;

/// Adapter that renders a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Io(_) => "meridian::io",
            CliError::Json(_) => "meridian::json",
            CliError::ConfigParse(_) | CliError::MissingConfig(_) => "meridian::config",
            CliError::Layout(_) => "meridian::layout",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CliError::Layout(err) => Some(Box::new(layout_help(err))),
            CliError::MissingConfig(_) => Some(Box::new(
                "omit --config to fall back to meridian/config.toml or the defaults",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn layout_help(err: &ConfigurationError) -> String {
    match err {
        ConfigurationError::MissingKey { key, .. } => {
            format!("set `{key}` in the [layout] table of the configuration file")
        }
        ConfigurationError::UnknownRoot { .. } => format!(
            "set `{}` to the id of a node in the input graph, or remove it to derive one",
            err.key()
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use meridian::config::LayoutKind;

    use super::*;

    #[test]
    fn test_layout_error_help_names_key() {
        let err = CliError::from(ConfigurationError::missing_key(
            LayoutKind::SwimLane,
            "lane_key",
        ));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), "swim-lane layout requires `lane_key` to be set");
        assert_eq!(adapter.code().map(|c| c.to_string()).as_deref(), Some("meridian::layout"));

        let help = adapter.help().map(|h| h.to_string()).unwrap();
        assert!(help.contains("`lane_key`"), "unexpected help: {help}");
    }

    #[test]
    fn test_unknown_root_help() {
        let err = CliError::from(ConfigurationError::UnknownRoot {
            algorithm: LayoutKind::Tree,
            root: "ghost".to_string(),
        });
        let help = ErrorAdapter(&err).help().map(|h| h.to_string()).unwrap();
        assert!(help.contains("`root_node_id`"));
    }

    #[test]
    fn test_io_error_has_code_but_no_help() {
        let err = CliError::from(io::Error::new(io::ErrorKind::NotFound, "graph.json"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().map(|c| c.to_string()).as_deref(), Some("meridian::io"));
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = CliError::from(ConfigurationError::missing_key(
            LayoutKind::ClusteredForce,
            "cluster_key",
        ));
        let mut writer = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut writer, &ErrorAdapter(&err))
            .unwrap();

        assert!(writer.contains("cluster_key"));
    }
}
