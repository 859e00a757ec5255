use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    fs::OpenOptions,
    path::PathBuf,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Where and how log records are written.
///
/// The Functions host captures the handler's stdout line by line, so the
/// default is a single-line formatter on stdout without ANSI colors.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: Option<PathBuf>,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default = "LogConfig::default_emit_stderr")]
    pub emit_stderr: bool,

    #[serde(default = "LogConfig::default_log_filters")]
    pub log_filters: String,

    #[serde(default = "LogConfig::default_log_formatter")]
    #[serde_as(as = "DisplayFromStr")]
    pub formatter: LogFormatter,

    #[serde(default = "LogConfig::default_ansi_colors")]
    pub ansi_colors: bool,

    // Emit a record when a span closes, carrying its busy/idle time
    #[serde(default = "LogConfig::default_show_fn_latency")]
    pub show_fn_latency: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: Self::default_file_path(),
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: Self::default_emit_stderr(),
            log_filters: Self::default_log_filters(),
            formatter: Self::default_log_formatter(),
            ansi_colors: Self::default_ansi_colors(),
            show_fn_latency: Self::default_show_fn_latency(),
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub fn default_log_filters() -> String { "info,lettre=warn,reqwest=warn".to_string() }

    #[inline]
    #[must_use]
    pub const fn default_file_path() -> Option<PathBuf> { None }

    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { true }

    #[inline]
    #[must_use]
    pub const fn default_emit_stderr() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_log_formatter() -> LogFormatter { LogFormatter::Compact }

    #[inline]
    #[must_use]
    pub const fn default_ansi_colors() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_show_fn_latency() -> bool { false }

    /// Installs the global `tracing` subscriber described by this
    /// configuration.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed.
    pub fn registry(&self) {
        let Self {
            file_path,
            emit_stdout,
            emit_stderr,
            log_filters,
            formatter,
            ansi_colors,
            show_fn_latency,
        } = self;

        let filter_layer = tracing_subscriber::filter::EnvFilter::new(log_filters.as_str());

        let span_events = if *show_fn_latency { FmtSpan::CLOSE } else { FmtSpan::NONE };

        let file_layer = file_path.as_ref().and_then(|path| {
            let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
            Some(LogDriver::File(file).layer(formatter, false, span_events.clone()))
        });

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(file_layer)
            .with(emit_stdout.then(|| {
                LogDriver::Stdout.layer(formatter, *ansi_colors, span_events.clone())
            }))
            .with(emit_stderr.then(|| LogDriver::Stderr.layer(formatter, *ansi_colors, span_events)))
            .init();
    }
}

#[derive(Debug)]
enum LogDriver {
    Stdout,
    Stderr,
    File(std::fs::File),
}

impl LogDriver {
    fn layer<S>(
        self,
        formatter: &LogFormatter,
        ansi: bool,
        span_events: FmtSpan,
    ) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        match self {
            Self::Stdout => format_layer(formatter, std::io::stdout, ansi, span_events),
            Self::Stderr => format_layer(formatter, std::io::stderr, ansi, span_events),
            Self::File(file) => format_layer(formatter, file, false, span_events),
        }
    }
}

fn format_layer<S, W>(
    formatter: &LogFormatter,
    writer: W,
    ansi: bool,
    span_events: FmtSpan,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_span_events(span_events);

    match formatter {
        LogFormatter::Pretty => layer.pretty().boxed(),
        LogFormatter::Compact => layer.compact().boxed(),
        LogFormatter::Json => layer.json().flatten_event(true).boxed(),
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogFormatter {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormatter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Ok(Self::Compact),
        }
    }
}

impl Display for LogFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_from_str() {
        assert_eq!("JSON".parse::<LogFormatter>(), Ok(LogFormatter::Json));
        assert_eq!("pretty".parse::<LogFormatter>(), Ok(LogFormatter::Pretty));
        assert_eq!("anything".parse::<LogFormatter>(), Ok(LogFormatter::Compact));
    }

    #[test]
    fn test_formatter_display_round_trips() {
        for formatter in [LogFormatter::Pretty, LogFormatter::Compact, LogFormatter::Json] {
            assert_eq!(formatter.to_string().parse::<LogFormatter>(), Ok(formatter));
        }
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: LogConfig = serde_yaml::from_str("{}").unwrap();

        assert!(config.emit_stdout);
        assert!(!config.emit_stderr);
        assert!(!config.ansi_colors);
        assert_eq!(config.formatter, LogFormatter::Compact);
        assert_eq!(config.log_filters, LogConfig::default_log_filters());
    }

    #[test]
    fn test_formatter_is_read_from_string() {
        let config: LogConfig = serde_yaml::from_str("formatter: json\nemit_stderr: true").unwrap();

        assert_eq!(config.formatter, LogFormatter::Json);
        assert!(config.emit_stderr);
    }
}
