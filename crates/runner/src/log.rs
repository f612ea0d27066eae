use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Where one log stream is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    Stderr,
    /// Appended to; created if missing.
    File(PathBuf),
}

/// Two log streams: info (INFO and more verbose) and errors (WARN, ERROR).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub info_sink: LogSink,
    pub error_sink: LogSink,
    pub silent_info: bool,
    pub silent_errors: bool,
    /// `EnvFilter` directives, e.g. `"info"` or `"simplegame_runner=debug"`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            info_sink: LogSink::Stdout,
            error_sink: LogSink::Stderr,
            silent_info: false,
            silent_errors: false,
            filter: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn with_info_sink(mut self, sink: LogSink) -> Self {
        self.info_sink = sink;
        self
    }

    pub fn with_error_sink(mut self, sink: LogSink) -> Self {
        self.error_sink = sink;
        self
    }

    pub fn with_silent_info(mut self, silent: bool) -> Self {
        self.silent_info = silent;
        self
    }

    pub fn with_silent_errors(mut self, silent: bool) -> Self {
        self.silent_errors = silent;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

fn stream_writer(sink: &LogSink, fallback: &LogSink, problems: &mut Vec<String>) -> BoxMakeWriter {
    match sink {
        LogSink::Stdout => BoxMakeWriter::new(io::stdout),
        LogSink::Stderr => BoxMakeWriter::new(io::stderr),
        LogSink::File(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(e) => {
                problems.push(format!("cannot open log file {}: {e}; using {fallback:?}", path.display()));
                stream_writer(fallback, fallback, problems)
            }
        },
    }
}

/// An injectable tracing subscriber built from a [`LogConfig`].
///
/// Building one never fails: an unusable file falls back to the stream's
/// default and an invalid filter falls back to `"info"`, each reported as
/// a warning through the new logger.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn new(config: &LogConfig) -> Self {
        let mut problems = Vec::new();

        let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
            problems.push(format!("invalid log filter {:?}: {e}; using \"info\"", config.filter));
            EnvFilter::new("info")
        });

        let info = (!config.silent_info)
            .then(|| stream_writer(&config.info_sink, &LogSink::Stdout, &mut problems));
        let errors = (!config.silent_errors)
            .then(|| stream_writer(&config.error_sink, &LogSink::Stderr, &mut problems));

        let writer = match (info, errors) {
            (Some(info), Some(errors)) => Some(BoxMakeWriter::new(
                info.with_min_level(Level::INFO)
                    .and(errors.with_max_level(Level::WARN)),
            )),
            (Some(info), None) => Some(BoxMakeWriter::new(info.with_min_level(Level::INFO))),
            (None, Some(errors)) => Some(BoxMakeWriter::new(errors.with_max_level(Level::WARN))),
            (None, None) => None,
        };

        let to_file = matches!(config.info_sink, LogSink::File(_)) || matches!(config.error_sink, LogSink::File(_));
        let layer = writer.map(|w| tracing_subscriber::fmt::layer().with_writer(w).with_ansi(!to_file));
        let dispatch = Dispatch::new(Registry::default().with(filter).with(layer));

        tracing::dispatcher::with_default(&dispatch, || {
            for problem in &problems {
                tracing::warn!("{problem}");
            }
        });

        Self { dispatch }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install as the process-wide default. Returns `false` if one was
    /// already set.
    pub fn install_global(&self) -> bool {
        tracing::dispatcher::set_global_default(self.dispatch.clone()).is_ok()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(&LogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_log(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("simplegame-{}-{name}.log", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn streams_are_split_by_level() {
        let info_path = temp_log("info");
        let error_path = temp_log("errors");
        let logger = Logger::new(
            &LogConfig::default()
                .with_info_sink(LogSink::File(info_path.clone()))
                .with_error_sink(LogSink::File(error_path.clone())),
        );

        logger.in_scope(|| {
            tracing::info!("surface created");
            tracing::error!("state failed");
        });

        let info = fs::read_to_string(&info_path).unwrap();
        let errors = fs::read_to_string(&error_path).unwrap();
        assert!(info.contains("surface created"));
        assert!(!info.contains("state failed"));
        assert!(errors.contains("state failed"));
        assert!(!errors.contains("surface created"));
    }

    #[test]
    fn silent_stream_writes_nothing() {
        let info_path = temp_log("silent-info");
        let error_path = temp_log("silent-errors");
        let logger = Logger::new(
            &LogConfig::default()
                .with_info_sink(LogSink::File(info_path.clone()))
                .with_error_sink(LogSink::File(error_path.clone()))
                .with_silent_info(true),
        );

        logger.in_scope(|| {
            tracing::info!("hidden");
            tracing::warn!("shown");
        });

        assert_eq!(fs::read_to_string(&info_path).unwrap_or_default(), "");
        assert!(fs::read_to_string(&error_path).unwrap().contains("shown"));
    }

    #[test]
    fn filter_drops_verbose_events() {
        let path = temp_log("filtered");
        let logger = Logger::new(
            &LogConfig::default()
                .with_info_sink(LogSink::File(path.clone()))
                .with_filter("info"),
        );
        logger.in_scope(|| {
            tracing::debug!("too verbose");
            tracing::info!("kept");
        });
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("kept"));
        assert!(!text.contains("too verbose"));
    }

    #[test]
    fn bad_file_and_filter_fall_back_without_failing() {
        let missing = std::env::temp_dir().join("simplegame-no-such-dir").join("x").join("log.txt");
        let logger = Logger::new(
            &LogConfig::default()
                .with_info_sink(LogSink::File(missing))
                .with_filter("=[not a filter"),
        );
        logger.in_scope(|| tracing::info!("still logging"));
    }

    #[test]
    fn fully_silent_logger_is_usable() {
        let logger = Logger::new(&LogConfig::default().with_silent_info(true).with_silent_errors(true));
        assert_eq!(logger.in_scope(|| 7), 7);
    }
}
