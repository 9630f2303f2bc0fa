// src/csv.rs
//
// Record codec for the local cache. Comma separated, RFC 4180 quoting.

use std::io::{self, Write};
use std::mem::take;

pub const SEP: char = ',';

/// Split cache text into records. Quotes and CRLF tolerant; blank lines are
/// dropped.
pub fn read_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = s!();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => quoted = !quoted,
            c if c == SEP && !quoted => record.push(take(&mut field)),
            '\r' | '\n' if !quoted => {
                if ch == '\r' && chars.peek() == Some(&'\n') { chars.next(); }
                record.push(take(&mut field));
                if !(record.len() == 1 && record[0].is_empty()) {
                    records.push(take(&mut record));
                }
                record.clear();
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

pub fn write_record<W: Write>(mut w: W, record: &[String]) -> io::Result<()> {
    for (i, field) in record.iter().enumerate() {
        if i > 0 { write!(w, "{}", SEP)?; }
        if needs_quotes(field) {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            w.write_all(field.as_bytes())?;
        }
    }
    writeln!(w)
}
