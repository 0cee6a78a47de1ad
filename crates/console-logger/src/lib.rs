//! Console Logger
//!
//! A `tracing` subscriber for the browser. Formatted lines go to the
//! devtools console at a matching severity and the most recent ones are kept
//! in a circular buffer so the UI can show them.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Default number of lines retained in memory
pub const DEFAULT_CAPACITY: usize = 200;

// ========================
// Line Buffer
// ========================

/// Bounded buffer of recent log lines (oldest dropped first)
#[derive(Debug)]
pub struct LineBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, line: String) {
        let Ok(mut lines) = self.lines.lock() else { return };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ========================
// Writer
// ========================

/// `MakeWriter` handing out one [`ConsoleWriter`] per event
#[derive(Clone)]
pub struct ConsoleMakeWriter {
    buffer: Arc<LineBuffer>,
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO, self.buffer.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level(), self.buffer.clone())
    }
}

/// Collects one formatted event and emits it on drop
pub struct ConsoleWriter {
    level: Level,
    bytes: Vec<u8>,
    buffer: Arc<LineBuffer>,
}

impl ConsoleWriter {
    fn new(level: Level, buffer: Arc<LineBuffer>) -> Self {
        Self { level, bytes: Vec::with_capacity(128), buffer }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.bytes).trim_end().to_string();
        if line.is_empty() {
            return;
        }
        emit(self.level, &line);
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

// ========================
// Timer
// ========================

/// Wall-clock time of day, `HH:MM:SS.mmm`
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

// ========================
// Init
// ========================

/// Handle to the installed logger
#[derive(Clone)]
pub struct LogHandle {
    buffer: Arc<LineBuffer>,
}

impl LogHandle {
    /// Most recent log lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.buffer.snapshot()
    }
}

/// Parse a level name, falling back to INFO
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::INFO)
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(level: &str, capacity: usize) -> Result<LogHandle, Box<dyn std::error::Error + Send + Sync>> {
    let buffer = Arc::new(LineBuffer::new(capacity));
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter { buffer: buffer.clone() })
        .with_timer(ClockTime)
        .with_max_level(parse_level(level))
        .with_target(true)
        .try_init()?;
    Ok(LogHandle { buffer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_buffer_drops_oldest() {
        let buffer = LineBuffer::new(2);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        buffer.push("c".to_string());
        assert_eq!(buffer.snapshot(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let buffer = LineBuffer::new(0);
        buffer.push("x".to_string());
        buffer.push("y".to_string());
        assert_eq!(buffer.snapshot(), vec!["y".to_string()]);
    }

    #[test]
    fn test_writer_pushes_trimmed_line_on_drop() {
        let buffer = Arc::new(LineBuffer::new(4));
        {
            let mut writer = ConsoleWriter::new(Level::INFO, buffer.clone());
            writer.write_all(b"hello ").unwrap();
            writer.write_all(b"world\n").unwrap();
        }
        {
            let _empty = ConsoleWriter::new(Level::WARN, buffer.clone());
        }
        assert_eq!(buffer.snapshot(), vec!["hello world".to_string()]);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN "), LevelFilter::WARN);
        assert_eq!(parse_level("nonsense"), LevelFilter::INFO);
    }
}
