use crate::config::EnvConfig;
use std::io;
use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Installs the global `tracing` subscriber, routing formatted events to the
/// browser console at the matching console level.
pub(crate) fn init_logging(config: &EnvConfig) {
    let level = parse_level(&config.log_level);

    // Wall-clock time is unavailable on wasm32-unknown-unknown; the console
    // already timestamps entries.
    let result = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();

    if let Err(e) = result {
        web_sys::console::warn_1(&format!("logging already initialized: {e}").into());
    }
}

pub(crate) fn parse_level(value: &str) -> LevelFilter {
    let value = value.trim();
    // `LevelFilter` reads an empty string as ERROR.
    if value.is_empty() {
        return LevelFilter::INFO;
    }
    value.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO)
}

pub(crate) struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on drop.
pub(crate) struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let bytes = std::mem::take(&mut self.buf);
        let line = String::from_utf8_lossy(&bytes).trim_end().to_string();
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.take_line() else {
            return;
        };
        let msg = wasm_bindgen::JsValue::from_str(&line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&msg),
            Level::WARN => web_sys::console::warn_1(&msg),
            Level::INFO => web_sys::console::info_1(&msg),
            Level::DEBUG => web_sys::console::debug_1(&msg),
            Level::TRACE => web_sys::console::log_1(&msg),
        }
    }
}
