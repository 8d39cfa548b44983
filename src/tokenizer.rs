//! Block 4 tokenizer.
//!
//! Turns the text block into ordered `(tag, value)` pairs. A field starts
//! with `:<tag>:` at the beginning of a line and runs until the next such
//! line, so multi-line values (50F, 70, 72, 77B...) are captured whole.

use crate::error::{Error, Result};
use tracing::debug;

/// One field occurrence as found in block 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Tag code including its letter option, e.g. `32A`.
    pub tag: String,
    /// Everything after `:<tag>:` up to the next tag line, lines joined with `\n`.
    pub value: String,
    /// 1-based line within block 4 where the field starts.
    pub line: usize,
}

/// Split a block 4 body into fields.
///
/// A line that starts with `:` followed by a digit claims to be a tag
/// marker; if it is not `:NN:` or `:NNa:` the whole block is rejected with
/// [`Error::TextBlockParse`]. Text before the first tag is skipped and
/// unknown tags are not an error here.
pub fn tokenize(text: &str) -> Result<Vec<RawField>> {
    let mut fields: Vec<RawField> = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let line_no = idx + 1;

        if let Some((tag, rest)) = tag_marker(line, line_no)? {
            fields.push(RawField {
                tag: tag.to_string(),
                value: rest.to_string(),
                line: line_no,
            });
            continue;
        }

        match fields.last_mut() {
            Some(field) => {
                field.value.push('\n');
                field.value.push_str(line);
            }
            None if line.trim().is_empty() => {}
            None => debug!(line = line_no, "skipping text before the first tag"),
        }
    }

    for field in &mut fields {
        let trimmed = field.value.trim_end_matches(['\n', ' ', '\t']).len();
        field.value.truncate(trimmed);
    }

    debug!(fields = fields.len(), "tokenized text block");
    Ok(fields)
}

/// Recognize `:NN:` / `:NNa:` at the start of a line.
fn tag_marker(line: &str, line_no: usize) -> Result<Option<(&str, &str)>> {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&b':') || !bytes.get(1).is_some_and(u8::is_ascii_digit) {
        return Ok(None);
    }

    let malformed = |message: String| Error::TextBlockParse {
        line: line_no,
        message,
    };

    if !bytes.get(2).is_some_and(u8::is_ascii_digit) {
        return Err(malformed(format!("tag in '{}' needs two digits", line)));
    }
    let tag_end = match bytes.get(3) {
        Some(b':') => 3,
        Some(b) if b.is_ascii_uppercase() => {
            if bytes.get(4) != Some(&b':') {
                return Err(malformed(format!("tag in '{}' is missing its closing ':'", line)));
            }
            4
        }
        _ => {
            return Err(malformed(format!("tag in '{}' is missing its closing ':'", line)));
        }
    };

    Ok(Some((&line[1..tag_end], &line[tag_end + 1..])))
}
