//! Blocks 1, 2, 3 and 5.
//!
//! Blocks 1 and 2 have rigid layouts and are cut by position. Blocks 3 and
//! 5 are sequences of `{key:value}` sub-blocks kept in source order.

use crate::blocks::parse_sub_blocks;
use crate::error::{Error, Result};
use std::fmt;
use std::ops::Range;

/// The only message type this crate handles.
pub const MESSAGE_TYPE: &str = "103";

/// Cut a fixed-width span out of a header body and check its characters.
fn span<'a>(
    body: &'a str,
    block: u8,
    range: Range<usize>,
    what: &str,
    valid: fn(u8) -> bool,
) -> Result<&'a str> {
    let value = body
        .get(range)
        .ok_or_else(|| Error::header(block, format!("{} is truncated", what)))?;
    if !value.bytes().all(valid) {
        return Err(Error::header(
            block,
            format!("{} has unexpected characters: '{}'", what, value),
        ));
    }
    Ok(value)
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_address(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

fn is_upper(b: u8) -> bool {
    b.is_ascii_uppercase()
}

fn require_ascii(body: &str, block: u8) -> Result<()> {
    if body.is_ascii() {
        Ok(())
    } else {
        Err(Error::header(block, "contains non-ASCII characters"))
    }
}

/// Block 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicHeader {
    /// `F` (FIN), `A` (GPA) or `L` (login).
    pub application_id: char,
    /// Two digits, `01` for FIN user-to-user messages.
    pub service_id: String,
    /// 12-character logical terminal address.
    pub lt_address: String,
    pub session_number: String,
    pub sequence_number: String,
}

impl BasicHeader {
    const LEN: usize = 25;

    pub fn parse(body: &str) -> Result<Self> {
        require_ascii(body, 1)?;
        if body.len() != Self::LEN {
            return Err(Error::header(
                1,
                format!("expected {} characters, found {}", Self::LEN, body.len()),
            ));
        }

        let application_id = match body.as_bytes().first() {
            Some(b @ (b'F' | b'A' | b'L')) => char::from(*b),
            _ => {
                return Err(Error::header(
                    1,
                    format!("unknown application id '{}'", &body[..1]),
                ))
            }
        };

        Ok(Self {
            application_id,
            service_id: span(body, 1, 1..3, "service id", is_digit)?.to_string(),
            lt_address: span(body, 1, 3..15, "LT address", is_address)?.to_string(),
            session_number: span(body, 1, 15..19, "session number", is_digit)?.to_string(),
            sequence_number: span(body, 1, 19..25, "sequence number", is_digit)?.to_string(),
        })
    }
}

impl fmt::Display for BasicHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.application_id,
            self.service_id,
            self.lt_address,
            self.session_number,
            self.sequence_number
        )
    }
}

/// Block 2, selected by its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationHeader {
    /// `I`: a message sent to SWIFT.
    Input(InputHeader),
    /// `O`: a message delivered by SWIFT.
    Output(OutputHeader),
}

impl ApplicationHeader {
    pub fn parse(body: &str) -> Result<Self> {
        match body.as_bytes().first() {
            Some(b'I') => InputHeader::parse(body).map(ApplicationHeader::Input),
            Some(b'O') => OutputHeader::parse(body).map(ApplicationHeader::Output),
            Some(_) => Err(Error::header(
                2,
                format!("unexpected direction flag '{}'", body.chars().next().unwrap_or(' ')),
            )),
            None => Err(Error::header(2, "block is empty")),
        }
    }

    /// `'I'` or `'O'`.
    pub fn direction(&self) -> char {
        match self {
            ApplicationHeader::Input(_) => 'I',
            ApplicationHeader::Output(_) => 'O',
        }
    }

    pub fn message_type(&self) -> &str {
        match self {
            ApplicationHeader::Input(h) => &h.message_type,
            ApplicationHeader::Output(h) => &h.message_type,
        }
    }

    pub fn priority(&self) -> Option<char> {
        match self {
            ApplicationHeader::Input(h) => h.priority,
            ApplicationHeader::Output(h) => h.priority,
        }
    }
}

impl fmt::Display for ApplicationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationHeader::Input(h) => h.fmt(f),
            ApplicationHeader::Output(h) => h.fmt(f),
        }
    }
}

fn message_type(body: &str) -> Result<String> {
    let mt = span(body, 2, 1..4, "message type", is_digit)?;
    if mt != MESSAGE_TYPE {
        return Err(Error::header(2, format!("unsupported message type MT{}", mt)));
    }
    Ok(mt.to_string())
}

/// Input layout: `I` + type + receiver address + priority + delivery monitoring + obsolescence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputHeader {
    pub message_type: String,
    pub receiver: String,
    pub priority: Option<char>,
    pub delivery_monitoring: Option<char>,
    pub obsolescence_period: Option<String>,
}

impl InputHeader {
    pub fn parse(body: &str) -> Result<Self> {
        require_ascii(body, 2)?;
        if !body.starts_with('I') {
            return Err(Error::header(2, "input layout requires direction flag 'I'"));
        }
        if !matches!(body.len(), 16 | 17 | 18 | 21) {
            return Err(Error::header(
                2,
                format!("input header has invalid length {}", body.len()),
            ));
        }

        let message_type = message_type(body)?;
        let receiver = span(body, 2, 4..16, "receiver address", is_address)?.to_string();
        let priority = body.get(16..17).map(|p| span(p, 2, 0..1, "priority", is_upper)).transpose()?;
        let delivery_monitoring = body
            .get(17..18)
            .map(|d| span(d, 2, 0..1, "delivery monitoring", |b| matches!(b, b'1'..=b'3')))
            .transpose()?;
        let obsolescence_period = body
            .get(18..21)
            .map(|o| span(o, 2, 0..3, "obsolescence period", is_digit))
            .transpose()?;

        Ok(Self {
            message_type,
            receiver,
            priority: priority.and_then(|p| p.chars().next()),
            delivery_monitoring: delivery_monitoring.and_then(|d| d.chars().next()),
            obsolescence_period: obsolescence_period.map(str::to_string),
        })
    }
}

impl fmt::Display for InputHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}{}", self.message_type, self.receiver)?;
        if let Some(p) = self.priority {
            write!(f, "{}", p)?;
        }
        if let Some(d) = self.delivery_monitoring {
            write!(f, "{}", d)?;
        }
        if let Some(ref o) = self.obsolescence_period {
            write!(f, "{}", o)?;
        }
        Ok(())
    }
}

/// Message Input Reference: input date, sender LT address, session and sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInputReference {
    pub date: String,
    pub lt_address: String,
    pub session_number: String,
    pub sequence_number: String,
}

impl fmt::Display for MessageInputReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.date, self.lt_address, self.session_number, self.sequence_number
        )
    }
}

/// Output layout: `O` + type + input time + MIR + output date + output time + priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputHeader {
    pub message_type: String,
    /// HHMM, sender's local time.
    pub input_time: String,
    pub mir: MessageInputReference,
    /// YYMMDD, receiver's local date.
    pub output_date: String,
    /// HHMM, receiver's local time.
    pub output_time: String,
    pub priority: Option<char>,
}

impl OutputHeader {
    pub fn parse(body: &str) -> Result<Self> {
        require_ascii(body, 2)?;
        if !body.starts_with('O') {
            return Err(Error::header(2, "output layout requires direction flag 'O'"));
        }
        if !matches!(body.len(), 46 | 47) {
            return Err(Error::header(
                2,
                format!("output header has invalid length {}", body.len()),
            ));
        }

        let message_type = message_type(body)?;
        let input_time = span(body, 2, 4..8, "input time", is_digit)?.to_string();
        let mir = MessageInputReference {
            date: span(body, 2, 8..14, "MIR date", is_digit)?.to_string(),
            lt_address: span(body, 2, 14..26, "MIR LT address", is_address)?.to_string(),
            session_number: span(body, 2, 26..30, "MIR session", is_digit)?.to_string(),
            sequence_number: span(body, 2, 30..36, "MIR sequence", is_digit)?.to_string(),
        };
        let output_date = span(body, 2, 36..42, "output date", is_digit)?.to_string();
        let output_time = span(body, 2, 42..46, "output time", is_digit)?.to_string();
        let priority = body
            .get(46..47)
            .map(|p| span(p, 2, 0..1, "priority", is_upper))
            .transpose()?
            .and_then(|p| p.chars().next());

        Ok(Self {
            message_type,
            input_time,
            mir,
            output_date,
            output_time,
            priority,
        })
    }
}

impl fmt::Display for OutputHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "O{}{}{}{}{}",
            self.message_type, self.input_time, self.mir, self.output_date, self.output_time
        )?;
        if let Some(p) = self.priority {
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

fn write_sub_blocks(f: &mut fmt::Formatter<'_>, entries: &[(String, String)]) -> fmt::Result {
    for (key, value) in entries {
        write!(f, "{{{}:{}}}", key, value)?;
    }
    Ok(())
}

fn lookup<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Block 3: ordered sub-tag/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserHeader {
    pub entries: Vec<(String, String)>,
}

impl UserHeader {
    pub fn parse(body: &str) -> Result<Self> {
        let entries = parse_sub_blocks(body).map_err(|reason| Error::header(3, reason))?;
        Ok(Self { entries })
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        lookup(&self.entries, key)
    }

    /// `103`: FINCopy service identifier.
    pub fn service_identifier(&self) -> Option<&str> {
        self.get("103")
    }

    /// `113`: banking priority.
    pub fn bank_priority_code(&self) -> Option<&str> {
        self.get("113")
    }

    /// `108`: message user reference (MUR).
    pub fn message_user_reference(&self) -> Option<&str> {
        self.get("108")
    }

    /// `111`: service type identifier.
    pub fn service_type_identifier(&self) -> Option<&str> {
        self.get("111")
    }

    /// `119`: validation flag (e.g. `STP`, `REMIT`).
    pub fn validation_flag(&self) -> Option<&str> {
        self.get("119")
    }

    /// `121`: unique end-to-end transaction reference (UETR).
    pub fn unique_end_to_end_transaction_reference(&self) -> Option<&str> {
        self.get("121")
    }
}

impl fmt::Display for UserHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sub_blocks(f, &self.entries)
    }
}

/// Block 5: checksum and authentication sub-tags in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trailer {
    pub entries: Vec<(String, String)>,
}

impl Trailer {
    pub fn parse(body: &str) -> Result<Self> {
        let entries = parse_sub_blocks(body)
            .map_err(|reason| Error::MalformedMessage(format!("block 5: {}", reason)))?;
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        lookup(&self.entries, key)
    }

    pub fn checksum(&self) -> Option<&str> {
        self.get("CHK")
    }

    pub fn mac(&self) -> Option<&str> {
        self.get("MAC")
    }
}

impl fmt::Display for Trailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sub_blocks(f, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_header() {
        let header = BasicHeader::parse("F01PTSBCHSSAXXX0001000001").unwrap();
        assert_eq!(header.application_id, 'F');
        assert_eq!(header.service_id, "01");
        assert_eq!(header.lt_address, "PTSBCHSSAXXX");
        assert_eq!(header.session_number, "0001");
        assert_eq!(header.sequence_number, "000001");
        assert_eq!(header.to_string(), "F01PTSBCHSSAXXX0001000001");
    }

    #[test]
    fn test_basic_header_wrong_length() {
        let err = BasicHeader::parse("F01PTSBCHSSAXXX000100000").unwrap_err();
        assert!(matches!(err, Error::HeaderParse { block: 1, .. }));
    }

    #[test]
    fn test_basic_header_bad_session() {
        assert!(BasicHeader::parse("F01PTSBCHSSAXXX00A1000001").is_err());
        assert!(BasicHeader::parse("X01PTSBCHSSAXXX0001000001").is_err());
    }

    #[test]
    fn test_parse_input_application_header() {
        let header = ApplicationHeader::parse("I103PTSBCHSSXXXXN").unwrap();
        assert_eq!(header.direction(), 'I');
        assert_eq!(header.message_type(), "103");
        assert_eq!(header.priority(), Some('N'));
        match header {
            ApplicationHeader::Input(ref h) => {
                assert_eq!(h.receiver, "PTSBCHSSXXXX");
                assert_eq!(h.delivery_monitoring, None);
            }
            ApplicationHeader::Output(_) => panic!("expected input layout"),
        }
    }

    #[test]
    fn test_input_header_with_monitoring() {
        let header = InputHeader::parse("I103PTSBCHSSXXXXU3003").unwrap();
        assert_eq!(header.priority, Some('U'));
        assert_eq!(header.delivery_monitoring, Some('3'));
        assert_eq!(header.obsolescence_period.as_deref(), Some("003"));
        assert_eq!(header.to_string(), "I103PTSBCHSSXXXXU3003");
    }

    #[test]
    fn test_parse_output_application_header() {
        let body = "O1030919010321BBBBGRA0AXXX00570001710103210920N";
        let header = ApplicationHeader::parse(body).unwrap();
        assert_eq!(header.direction(), 'O');
        match header {
            ApplicationHeader::Output(ref h) => {
                assert_eq!(h.input_time, "0919");
                assert_eq!(h.mir.to_string(), "010321BBBBGRA0AXXX0057000171");
                assert_eq!(h.mir.lt_address, "BBBBGRA0AXXX");
                assert_eq!(h.output_date, "010321");
                assert_eq!(h.output_time, "0920");
                assert_eq!(h.priority, Some('N'));
            }
            ApplicationHeader::Input(_) => panic!("expected output layout"),
        }
        assert_eq!(header.to_string(), body);
    }

    #[test]
    fn test_output_body_rejected_by_input_layout() {
        let body = "O1030919010321BBBBGRA0AXXX00570001710103210920N";
        assert!(matches!(
            InputHeader::parse(body),
            Err(Error::HeaderParse { block: 2, .. })
        ));
        assert!(OutputHeader::parse("I103PTSBCHSSXXXXN").is_err());
    }

    #[test]
    fn test_unexpected_direction_flag() {
        assert!(matches!(
            ApplicationHeader::parse("X103PTSBCHSSXXXXN"),
            Err(Error::HeaderParse { block: 2, .. })
        ));
    }

    #[test]
    fn test_other_message_type_rejected() {
        assert!(ApplicationHeader::parse("I202PTSBCHSSXXXXN").is_err());
    }

    #[test]
    fn test_parse_user_header() {
        let header =
            UserHeader::parse("{108:10-103-NVR-0033}{121:cc0e4a2e-0473-4574-be3b-de639be5252e}")
                .unwrap();
        assert_eq!(header.message_user_reference(), Some("10-103-NVR-0033"));
        assert_eq!(
            header.unique_end_to_end_transaction_reference(),
            Some("cc0e4a2e-0473-4574-be3b-de639be5252e")
        );
        assert_eq!(header.bank_priority_code(), None);
    }

    #[test]
    fn test_user_header_keeps_unknown_tags() {
        let header = UserHeader::parse("{113:URGT}{433:/AOK}{108:X}").unwrap();
        assert_eq!(header.bank_priority_code(), Some("URGT"));
        assert_eq!(header.get("433"), Some("/AOK"));
        assert_eq!(header.entries[1].0, "433");
        assert_eq!(header.to_string(), "{113:URGT}{433:/AOK}{108:X}");
    }

    #[test]
    fn test_user_header_malformed() {
        assert!(matches!(
            UserHeader::parse("108:X"),
            Err(Error::HeaderParse { block: 3, .. })
        ));
    }

    #[test]
    fn test_parse_trailer() {
        let trailer = Trailer::parse("{MAC:FFFFFFFF}{CHK:AAAAAAAAAAAA}").unwrap();
        assert_eq!(trailer.mac(), Some("FFFFFFFF"));
        assert_eq!(trailer.checksum(), Some("AAAAAAAAAAAA"));
    }
}
