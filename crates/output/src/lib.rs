use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Placeholder printed for fields a response did not include.
pub const MISSING: &str = "Missing";

/// One line of a `key: value` summary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub key: &'static str,
}

impl Field {
    pub const fn new(key: &'static str) -> Self {
        Self { label: key, key }
    }

    /// Printed as `label` but read from `key`.
    pub const fn renamed(label: &'static str, key: &'static str) -> Self {
        Self { label, key }
    }
}

#[derive(Debug, Default)]
pub struct OutputRenderer;

impl OutputRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-prints `value` on stdout.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = to_pretty_json(value)?;
        let mut out = io::stdout().lock();
        writeln!(out, "{rendered}")?;
        Ok(())
    }

    pub fn summary(&self, heading: Option<&str>, record: &Value, fields: &[Field]) -> Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "{}", format_summary(heading, record, fields))?;
        Ok(())
    }

    pub fn line(&self, text: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        Ok(())
    }

    /// Forwards an unparseable response body to stderr untouched.
    pub fn raw_error(&self, text: &str) -> Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            err.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn pass_through(&self, chunk_size: usize) -> PassThrough<io::StdoutLock<'static>> {
        PassThrough::new(io::stdout().lock(), chunk_size)
    }
}

/// JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Renders the value of `key` for a summary line.
pub fn field_value(record: &Value, key: &str) -> String {
    match record.get(key) {
        None => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn format_summary(heading: Option<&str>, record: &Value, fields: &[Field]) -> String {
    let mut rendered = String::new();
    if let Some(heading) = heading {
        rendered.push_str(heading);
        rendered.push('\n');
    }
    for field in fields {
        rendered.push_str(field.label);
        rendered.push_str(": ");
        rendered.push_str(&field_value(record, field.key));
        rendered.push('\n');
    }
    rendered
}

/// Copies bytes to a writer in slices of at most `chunk_size`, unchanged.
pub struct PassThrough<W: Write> {
    writer: W,
    chunk_size: usize,
    written: u64,
}

impl<W: Write> PassThrough<W> {
    pub fn new(writer: W, chunk_size: usize) -> Self {
        Self {
            writer,
            chunk_size: chunk_size.max(1),
            written: 0,
        }
    }

    pub fn write_chunk(&mut self, bytes: &[u8]) -> io::Result<()> {
        for slice in bytes.chunks(self.chunk_size) {
            self.writer.write_all(slice)?;
            self.written += slice.len() as u64;
        }
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and returns the writer with the number of bytes forwarded.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        self.writer.flush()?;
        Ok((self.writer, self.written))
    }
}
