//! Minimal RFC4180 reader and writer.

use crate::error::{CriticalityError, Result};

/// Quotes `field` when it contains a comma, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

pub fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field.as_ref()));
    }
    out.push('\n');
}

/// Splits `input` into rows of fields. Blank lines are skipped. Each row is
/// returned with the 1-based line it started on.
pub fn parse(input: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut line = 1usize;
    let mut row_line = 1usize;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            '"' => {
                return Err(CriticalityError::Csv {
                    line,
                    message: "quote inside unquoted field".to_owned(),
                });
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_row(&mut rows, &mut row, &mut field, field_started, row_line);
                field_started = false;
                line += 1;
                row_line = line;
            }
            _ => {
                field.push(ch);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(CriticalityError::Csv {
            line: row_line,
            message: "unterminated quoted field".to_owned(),
        });
    }
    finish_row(&mut rows, &mut row, &mut field, field_started, row_line);

    Ok(rows)
}

fn finish_row(
    rows: &mut Vec<(usize, Vec<String>)>,
    row: &mut Vec<String>,
    field: &mut String,
    field_started: bool,
    row_line: usize,
) {
    if row.is_empty() && field.is_empty() && !field_started {
        return;
    }
    row.push(std::mem::take(field));
    rows.push((row_line, std::mem::take(row)));
}
