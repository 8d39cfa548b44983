//! Splitting a raw message into its top-level blocks.
//!
//! A message is a run of `{n:...}` blocks. Blocks 1, 2, 3 and 5 end at the
//! brace that balances their opening brace, so nested `{108:...}` style
//! sub-blocks stay inside them. Block 4 ends at a line starting with `-}`
//! and may contain stray braces.

use crate::error::{Error, Result};
use tracing::debug;

/// Borrowed bodies of the five blocks, without their `{n:` and closing delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlocks<'a> {
    pub basic: &'a str,
    pub application: &'a str,
    pub user: Option<&'a str>,
    pub text: &'a str,
    pub trailer: Option<&'a str>,
}

/// Split `raw` into block bodies.
///
/// Whitespace between blocks is ignored. Anything else outside a block,
/// an unknown or repeated block number, or a block that never closes is a
/// [`Error::MalformedMessage`], as is the absence of block 1, 2 or 4.
pub fn split_blocks(raw: &str) -> Result<RawBlocks<'_>> {
    let bytes = raw.as_bytes();
    let mut found: [Option<&str>; 5] = [None; 5];
    let mut pos = 0;

    loop {
        while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        let Some(&b) = bytes.get(pos) else { break };
        if b != b'{' {
            return Err(Error::MalformedMessage(format!(
                "unexpected content outside a block at offset {}",
                pos
            )));
        }

        let id = match bytes.get(pos + 1) {
            Some(d @ b'1'..=b'5') => usize::from(d - b'0'),
            _ => {
                return Err(Error::MalformedMessage(format!(
                    "unknown block identifier at offset {}",
                    pos
                )))
            }
        };
        if bytes.get(pos + 2) != Some(&b':') {
            return Err(Error::MalformedMessage(format!(
                "block {} is missing ':' after its identifier",
                id
            )));
        }

        let body_start = pos + 3;
        let (body, next) = if id == 4 {
            text_block_body(raw, body_start)?
        } else {
            braced_body(raw, body_start, id)?
        };

        let slot = &mut found[id - 1];
        if slot.is_some() {
            return Err(Error::MalformedMessage(format!("block {} appears twice", id)));
        }
        *slot = Some(body);
        pos = next;
    }

    let [basic, application, user, text, trailer] = found;
    let missing = |n: u8| Error::MalformedMessage(format!("block {} is missing", n));

    let blocks = RawBlocks {
        basic: basic.ok_or_else(|| missing(1))?,
        application: application.ok_or_else(|| missing(2))?,
        user,
        text: text.ok_or_else(|| missing(4))?,
        trailer,
    };
    debug!(
        user_header = blocks.user.is_some(),
        trailer = blocks.trailer.is_some(),
        "split message into blocks"
    );
    Ok(blocks)
}

/// Body of a brace-balanced block starting at `start`, and the offset after its closing brace.
fn braced_body(raw: &str, start: usize, id: usize) -> Result<(&str, usize)> {
    let mut depth = 1usize;
    for (i, b) in raw.bytes().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&raw[start..i], i + 1));
                }
            }
            _ => {}
        }
    }
    Err(Error::MalformedMessage(format!(
        "block {} has unbalanced braces",
        id
    )))
}

/// Body of block 4: everything up to a line that starts with `-}`.
fn text_block_body(raw: &str, start: usize) -> Result<(&str, usize)> {
    let rest = &raw[start..];
    for (idx, _) in rest.match_indices("-}") {
        if idx == 0 || rest.as_bytes().get(idx - 1) == Some(&b'\n') {
            return Ok((&rest[..idx], start + idx + 2));
        }
    }
    Err(Error::MalformedMessage(
        "block 4 has no closing '-}' line".to_string(),
    ))
}

/// Parse the `{key:value}{key:value}` sequence found in blocks 3 and 5.
///
/// Values may themselves contain balanced braces. Keys are kept verbatim.
pub fn parse_sub_blocks(body: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let bytes = body.as_bytes();
    let mut entries = Vec::new();
    let mut pos = 0;

    loop {
        while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        let Some(&b) = bytes.get(pos) else { break };
        if b != b'{' {
            return Err(format!("expected '{{' at offset {}", pos));
        }
        let key_start = pos + 1;
        let colon = body[key_start..]
            .find(':')
            .map(|i| key_start + i)
            .ok_or_else(|| format!("sub-block at offset {} has no ':'", pos))?;
        let key = &body[key_start..colon];
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(format!("invalid sub-block key '{}'", key));
        }

        let value_start = colon + 1;
        let mut depth = 1usize;
        let mut end = None;
        for (i, b) in bytes.iter().enumerate().skip(value_start) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or_else(|| format!("sub-block '{}' is not closed", key))?;
        entries.push((key.to_string(), body[value_start..end].to_string()));
        pos = end + 1;
    }

    Ok(entries)
}
