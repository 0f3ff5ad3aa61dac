//! Construction of log dispatchers for `ghcli` components.
//!
//! Nothing here installs a global subscriber. A `Dispatch` built from a `LogConfig` is handed to
//! [`crate::github::ClientBuilder::dispatch`] or [`crate::gh_binary::GhBinary::with_dispatch`],
//! and may additionally be installed globally by a program that wants that.

use anyhow::{Context, Result};
use tracing::Dispatch;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;

/// How log records are rendered
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line of text per record, for humans
    #[default]
    Human,

    /// One JSON object per record, with timestamp, level, source location, current span, and
    /// message fields
    Json,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
    pub ansi: bool,

    /// An environment variable with additional `tracing-subscriber` filter directives
    pub env_var: Option<String>,
}

impl LogConfig {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            format: LogFormat::Human,
            ansi: false,
            env_var: None,
        }
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn env_var<S: Into<String>>(mut self, env_var: S) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_var {
            Some(var) => builder
                .with_env_var(var)
                .from_env()
                .with_context(|| format!("Failed to parse filters from {var} environment variable")),
            None => Ok(builder.parse_lossy("")),
        }
    }

    /// Build a dispatcher that writes to stderr.
    pub fn build_dispatch(&self) -> Result<Dispatch> {
        self.build_dispatch_with_writer(std::io::stderr)
    }

    /// Build a dispatcher that writes to the given writer.
    pub fn build_dispatch_with_writer<W>(&self, writer: W) -> Result<Dispatch>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter()?)
            .with_writer(writer)
            .with_file(true)
            .with_line_number(true);

        let dispatch = match self.format {
            LogFormat::Human => Dispatch::new(builder.with_ansi(self.ansi).finish()),
            LogFormat::Json => Dispatch::new(
                builder
                    .with_ansi(false)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .finish(),
            ),
        };
        Ok(dispatch)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(LevelFilter::WARN)
    }
}
