//! Machine-readable status lines
//!
//! A host process reading stdout gets one line per event:
//!
//! ```text
//! STATUS stage=POLISH mode="polish-vi"
//! PROGRESS percent=40 chapter=2 part=1/3
//! LOG message="Found 12 chapter headings"
//! DONE outdir="out" output="out/polished.md"
//! ERROR code=20 message="transformer failed"
//! ```

use chuong_core::Chunk;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Escape a value for use inside double quotes on one line
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `STATUS stage=<STAGE> key="value" ...`
pub fn format_status(stage: &str, fields: &[(&str, &str)]) -> String {
    let mut line = format!("STATUS stage={stage}");
    for (key, value) in fields {
        line.push_str(&format!(" {key}=\"{}\"", escape(value)));
    }
    line
}

/// `PROGRESS percent=<n> chapter=<n> part=<p>/<t>`
pub fn format_progress(percent: usize, chunk: &Chunk) -> String {
    format!(
        "PROGRESS percent={percent} chapter={} part={}/{}",
        chunk.chapter_number, chunk.part_number, chunk.total_parts
    )
}

/// `LOG message="<escaped>"`
pub fn format_log(message: &str) -> String {
    format!("LOG message=\"{}\"", escape(message))
}

/// `DONE outdir="<dir>" output="<file>"`
pub fn format_done(outdir: &Path, output: &Path) -> String {
    format!(
        "DONE outdir=\"{}\" output=\"{}\"",
        escape(&outdir.display().to_string()),
        escape(&output.display().to_string())
    )
}

/// `ERROR code=<n> message="<escaped>"`
pub fn format_error(code: u8, message: &str) -> String {
    format!("ERROR code={code} message=\"{}\"", escape(message))
}

/// Shared writer for status lines
pub struct StatusLines {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StatusLines {
    /// Write to the given sink
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write to stdout
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Announce a stage
    pub fn status(&self, stage: &str, fields: &[(&str, &str)]) {
        self.emit(&format_status(stage, fields));
    }

    /// Report a finished chunk
    pub fn progress(&self, percent: usize, chunk: &Chunk) {
        self.emit(&format_progress(percent, chunk));
    }

    /// Forward a log message
    pub fn log(&self, message: &str) {
        self.emit(&format_log(message));
    }

    /// Report the final output location
    pub fn done(&self, outdir: &Path, output: &Path) {
        self.emit(&format_done(outdir, output));
    }

    /// Report a fatal error
    pub fn error(&self, code: u8, message: &str) {
        self.emit(&format_error(code, message));
    }

    fn emit(&self, line: &str) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            log::debug!("Status line dropped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn chunk() -> Chunk {
        Chunk {
            chapter_number: 2,
            chapter_title: "Hai".into(),
            part_number: 1,
            total_parts: 3,
            text: String::new(),
            chunk_id: Chunk::make_id(2, 1),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"nói "xin chào""#), r#"nói \"xin chào\""#);
        assert_eq!(escape("a\nb"), "a b");
        assert_eq!(escape(r"C:\truyen"), r"C:\\truyen");
    }

    #[test]
    fn test_line_formats() {
        assert_eq!(
            format_status("POLISH", &[("mode", "polish-vi"), ("chunks", "12")]),
            r#"STATUS stage=POLISH mode="polish-vi" chunks="12""#
        );
        assert_eq!(
            format_progress(40, &chunk()),
            "PROGRESS percent=40 chapter=2 part=1/3"
        );
        assert_eq!(format_log(r#"say "hi""#), r#"LOG message="say \"hi\"""#);
        assert_eq!(
            format_done(Path::new("out"), Path::new("out/polished.md")),
            r#"DONE outdir="out" output="out/polished.md""#
        );
        assert_eq!(format_error(20, "boom"), r#"ERROR code=20 message="boom""#);
    }

    #[test]
    fn test_lines_are_written_in_order() {
        let buffer = SharedBuffer::default();
        let lines = StatusLines::new(Box::new(buffer.clone()));
        lines.status("LOAD", &[]);
        lines.progress(100, &chunk());
        lines.error(2, "bad config");

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            output,
            "STATUS stage=LOAD\nPROGRESS percent=100 chapter=2 part=1/3\nERROR code=2 message=\"bad config\"\n"
        );
    }
}
