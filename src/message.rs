//! The parsed MT103 message.
//!
//! A [`Message`] is built in one pass from raw text and never changes
//! afterwards. Field values keep their SWIFT notation (`YYMMDD` dates,
//! comma decimals); see [`crate::canonical`] for the normalized view.

use crate::blocks::split_blocks;
use crate::error::Result;
use crate::fields::{Field, FieldValue, TimeIndication};
use crate::header::{ApplicationHeader, BasicHeader, Trailer, UserHeader};
use crate::tokenizer::tokenize;
use std::fmt;
use std::io::{Read, Write};
use tracing::debug;

/// Block 4: fields in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBlock {
    fields: Vec<Field>,
}

impl TextBlock {
    /// Tokenize and dispatch every field of a block 4 body.
    pub fn parse(body: &str) -> Result<Self> {
        let fields = tokenize(body)?
            .into_iter()
            .map(Field::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    /// All fields in source order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First occurrence of `tag`.
    pub fn get(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Every occurrence of `tag`, in source order.
    pub fn occurrences<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    /// All 13C occurrences, in source order.
    pub fn time_indications(&self) -> Vec<&TimeIndication> {
        self.occurrences("13C")
            .filter_map(|f| match &f.value {
                FieldValue::TimeIndication(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// All 71F occurrences, in source order.
    pub fn senders_charges(&self) -> Vec<&Field> {
        self.occurrences("71F").collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A complete MT103 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    raw: String,
    basic_header: BasicHeader,
    application_header: ApplicationHeader,
    user_header: Option<UserHeader>,
    text: TextBlock,
    trailer: Option<Trailer>,
}

impl Message {
    /// Parse a message from its raw text.
    ///
    /// # Examples
    ///
    /// ```
    /// use mt103_system::message::Message;
    ///
    /// let raw = "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:\n:20:REF\n-}";
    /// let message = Message::parse(raw)?;
    /// assert_eq!(message.text().get("20").unwrap().raw, "REF");
    /// # Ok::<(), mt103_system::Error>(())
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let blocks = split_blocks(raw.trim())?;

        let basic_header = BasicHeader::parse(blocks.basic)?;
        let application_header = ApplicationHeader::parse(blocks.application)?;
        let user_header = blocks.user.map(UserHeader::parse).transpose()?;
        let text = TextBlock::parse(blocks.text)?;
        let trailer = blocks.trailer.map(Trailer::parse).transpose()?;

        debug!(
            direction = %application_header.direction(),
            fields = text.len(),
            "parsed MT103 message"
        );

        Ok(Self {
            raw: raw.to_string(),
            basic_header,
            application_header,
            user_header,
            text,
            trailer,
        })
    }

    /// Parse a message from any source implementing `Read`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use mt103_system::message::Message;
    ///
    /// let mut file = File::open("mt103.txt")?;
    /// let message = Message::from_read(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Self::parse(&raw)
    }

    /// Write the message back as SWIFT text, rebuilt from the parsed blocks.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)?;
        Ok(())
    }

    /// The rebuilt SWIFT text as a string.
    pub fn to_swift_string(&self) -> String {
        self.to_string()
    }

    /// The text the message was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn basic_header(&self) -> &BasicHeader {
        &self.basic_header
    }

    pub fn application_header(&self) -> &ApplicationHeader {
        &self.application_header
    }

    pub fn user_header(&self) -> Option<&UserHeader> {
        self.user_header.as_ref()
    }

    pub fn text(&self) -> &TextBlock {
        &self.text
    }

    pub fn trailer(&self) -> Option<&Trailer> {
        self.trailer.as_ref()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{1:{}}}", self.basic_header)?;
        write!(f, "{{2:{}}}", self.application_header)?;
        if let Some(ref user) = self.user_header {
            write!(f, "{{3:{}}}", user)?;
        }
        writeln!(f, "{{4:")?;
        for field in self.text.fields() {
            writeln!(f, ":{}:{}", field.tag, field.raw)?;
        }
        write!(f, "-}}")?;
        if let Some(ref trailer) = self.trailer {
            write!(f, "{{5:{}}}", trailer)?;
        }
        Ok(())
    }
}
