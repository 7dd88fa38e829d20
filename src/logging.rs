//! 日志：可注入的结构化日志接口、tracing 默认实现与订阅初始化。

use std::error::Error;
use std::path::Path;
use tracing::field::display;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化 tracing 日志订阅与默认过滤规则，重复调用时忽略。
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Debug,
}

/// 单条结构化日志事件，字段按需填写。
#[derive(Clone, Copy, Debug)]
pub struct LogEvent<'a> {
    pub level: LogLevel,
    pub message: &'static str,
    pub directory: Option<&'a Path>,
    pub path: Option<&'a Path>,
    pub size: Option<u64>,
    pub error: Option<&'a (dyn Error + 'static)>,
}

impl<'a> LogEvent<'a> {
    pub fn error(message: &'static str) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn debug(message: &'static str) -> Self {
        Self::new(LogLevel::Debug, message)
    }

    fn new(level: LogLevel, message: &'static str) -> Self {
        Self {
            level,
            message,
            directory: None,
            path: None,
            size: None,
            error: None,
        }
    }

    pub fn directory(mut self, directory: &'a Path) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_error(mut self, error: &'a (dyn Error + 'static)) -> Self {
        self.error = Some(error);
        self
    }
}

/// Sink for the uploader's diagnostic events.
pub trait UploadLogger: Send + Sync {
    fn log(&self, event: LogEvent<'_>);
}

/// 将事件转发到 tracing。
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl UploadLogger for TracingLogger {
    fn log(&self, event: LogEvent<'_>) {
        let directory = event.directory.map(|dir| display(dir.display()));
        let path = event.path.map(|path| display(path.display()));
        let err = event.error.map(display);
        match event.level {
            LogLevel::Error => error!(
                directory,
                path,
                size = event.size,
                error = err,
                "{}",
                event.message
            ),
            LogLevel::Debug => debug!(
                directory,
                path,
                size = event.size,
                error = err,
                "{}",
                event.message
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn builder_sets_fields() {
        let cause = io::Error::other("boom");
        let dir = Path::new("uploads");
        let event = LogEvent::error("failed")
            .directory(dir)
            .size(42)
            .with_error(&cause);
        assert_eq!(event.level, LogLevel::Error);
        assert_eq!(event.message, "failed");
        assert_eq!(event.directory, Some(dir));
        assert_eq!(event.path, None);
        assert_eq!(event.size, Some(42));
        assert_eq!(event.error.map(|err| err.to_string()).as_deref(), Some("boom"));
    }

    #[test]
    fn tracing_logger_accepts_events_after_repeated_init() {
        init_logging();
        init_logging();
        let cause = io::Error::other("boom");
        TracingLogger.log(LogEvent::error("failed").path(Path::new("a.png")).with_error(&cause));
        TracingLogger.log(LogEvent::debug("ok").path(Path::new("a.png")).size(1));
    }
}
