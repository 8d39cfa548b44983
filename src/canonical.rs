//! Canonical view of a parsed message.
//!
//! Dates become calendar dates (`century_base + YY`), amounts become
//! dot-decimal strings with every digit kept, and 13C times become
//! `HH:MM:SS`. The [`Message`] itself is left untouched, so its SWIFT
//! notation stays available alongside the canonical values.

use crate::config::CanonicalConfig;
use crate::error::{Error, Result};
use crate::fields::{lookup, Component, UNPARSED_LABEL};
use crate::header::{ApplicationHeader, OutputHeader};
use crate::message::Message;
use crate::types::NumberedLine;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// A normalized leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalValue {
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Dot-decimal amount, scale as written.
    Amount(String),
    Lines(Vec<NumberedLine>),
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CanonicalValue::Text(s) | CanonicalValue::Amount(s) => serializer.serialize_str(s),
            CanonicalValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            CanonicalValue::Time(t) => serializer.collect_str(&t.format("%H:%M:%S")),
            CanonicalValue::Lines(lines) => lines.serialize(serializer),
        }
    }
}

/// One field occurrence with labelled canonical components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalField {
    pub tag: String,
    pub repeatable: bool,
    pub components: Vec<(&'static str, CanonicalValue)>,
}

/// Dates and times of an output application header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalOutputHeader {
    pub input_time: NaiveTime,
    pub output_date: NaiveDate,
    pub output_time: NaiveTime,
}

/// Canonical fields of a message, in source order, next to the message they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalMessage<'a> {
    pub message: &'a Message,
    /// Present for output (`O`) messages only.
    pub output_header: Option<CanonicalOutputHeader>,
    pub fields: Vec<CanonicalField>,
}

/// `YYMMDD` to a calendar date in the configured century.
pub fn canonical_date(yymmdd: &str, config: &CanonicalConfig) -> Result<NaiveDate> {
    if yymmdd.len() != 6 || !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidDate(yymmdd.to_string()));
    }
    let number = |range: std::ops::Range<usize>| -> Result<u32> {
        yymmdd[range]
            .parse::<u32>()
            .map_err(|_| Error::InvalidDate(yymmdd.to_string()))
    };
    let yy = yymmdd[0..2]
        .parse::<i32>()
        .map_err(|_| Error::InvalidDate(yymmdd.to_string()))?;
    NaiveDate::from_ymd_opt(config.century_base + yy, number(2..4)?, number(4..6)?)
        .ok_or_else(|| Error::InvalidDate(yymmdd.to_string()))
}

/// `HHMM` to a time of day.
pub fn canonical_time(hhmm: &str) -> Result<NaiveTime> {
    if hhmm.len() != 4 || !hhmm.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidTime(hhmm.to_string()));
    }
    let hours = hhmm[0..2].parse::<u32>().map_err(|_| Error::InvalidTime(hhmm.to_string()))?;
    let minutes = hhmm[2..4].parse::<u32>().map_err(|_| Error::InvalidTime(hhmm.to_string()))?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| Error::InvalidTime(hhmm.to_string()))
}

/// Comma-decimal amount to a dot-decimal string, without rounding.
pub fn canonical_amount(amount: &str) -> Result<String> {
    let dotted = amount.trim_end_matches(',').replace(',', ".");
    let decimal =
        Decimal::from_str(&dotted).map_err(|_| Error::InvalidAmount(amount.to_string()))?;

    let written_scale = dotted.split_once('.').map_or(0, |(_, frac)| frac.len());
    if decimal.scale() as usize != written_scale {
        return Err(Error::InvalidAmount(format!(
            "{} has more digits than can be kept exactly",
            amount
        )));
    }
    Ok(decimal.to_string())
}

fn canonical_component(component: Component<'_>, config: &CanonicalConfig) -> Result<CanonicalValue> {
    Ok(match component {
        Component::Text(s) => CanonicalValue::Text(s.into_owned()),
        Component::Date(d) => CanonicalValue::Date(canonical_date(d.as_str(), config)?),
        Component::Amount(a) => CanonicalValue::Amount(canonical_amount(a.as_str())?),
        Component::Time(t) => CanonicalValue::Time(canonical_time(t)?),
        Component::Lines(lines) => CanonicalValue::Lines(lines.to_vec()),
    })
}

fn canonical_output_header(header: &OutputHeader, config: &CanonicalConfig) -> Result<CanonicalOutputHeader> {
    Ok(CanonicalOutputHeader {
        input_time: canonical_time(&header.input_time)?,
        output_date: canonical_date(&header.output_date, config)?,
        output_time: canonical_time(&header.output_time)?,
    })
}

/// Build the canonical view of the output header dates and of every block 4 field.
pub fn canonicalize<'a>(message: &'a Message, config: &CanonicalConfig) -> Result<CanonicalMessage<'a>> {
    let output_header = match message.application_header() {
        ApplicationHeader::Output(header) => Some(canonical_output_header(header, config)?),
        ApplicationHeader::Input(_) => None,
    };

    let mut fields = Vec::with_capacity(message.text().len());

    for field in message.text().fields() {
        let spec = lookup(&field.tag);
        let components = match spec {
            Some(spec) if !field.value.is_unparsed() => spec
                .components
                .iter()
                .zip(field.value.components())
                .filter_map(|(label, component)| component.map(|c| (*label, c)))
                .map(|(label, c)| canonical_component(c, config).map(|v| (label, v)))
                .collect::<Result<Vec<_>>>()?,
            _ => vec![(UNPARSED_LABEL, CanonicalValue::Text(field.raw.clone()))],
        };

        fields.push(CanonicalField {
            tag: field.tag.clone(),
            repeatable: spec.is_some_and(|s| s.repeatable),
            components,
        });
    }

    Ok(CanonicalMessage {
        message,
        output_header,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_amount() {
        assert_eq!(canonical_amount("15000,11").unwrap(), "15000.11");
        assert_eq!(canonical_amount("1234567,89").unwrap(), "1234567.89");
        assert_eq!(canonical_amount("100,00").unwrap(), "100.00");
        assert_eq!(canonical_amount("100,").unwrap(), "100");
        assert_eq!(canonical_amount("999999999,99").unwrap(), "999999999.99");
    }

    #[test]
    fn test_canonical_amount_rejects_garbage() {
        assert!(matches!(canonical_amount("12a,00"), Err(Error::InvalidAmount(_))));
        assert!(matches!(
            canonical_amount("1,12345678901234567890123456789"),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_canonical_date() {
        let config = CanonicalConfig::default();
        assert_eq!(
            canonical_date("240101", &config).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            canonical_date("091120", &config).unwrap(),
            NaiveDate::from_ymd_opt(2009, 11, 20).unwrap()
        );
        assert_eq!(
            canonical_date("991231", &config).unwrap(),
            NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
        );
        assert_eq!(
            canonical_date("240229", &config).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_canonical_date_century_override() {
        let config = CanonicalConfig { century_base: 1900 };
        assert_eq!(
            canonical_date("991231", &config).unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_canonical_date_invalid() {
        let config = CanonicalConfig::default();
        assert!(matches!(canonical_date("230229", &config), Err(Error::InvalidDate(_))));
        assert!(matches!(canonical_date("241301", &config), Err(Error::InvalidDate(_))));
        assert!(canonical_date("2401", &config).is_err());
    }

    #[test]
    fn test_canonical_time() {
        assert_eq!(
            canonical_time("0945").unwrap(),
            NaiveTime::from_hms_opt(9, 45, 0).unwrap()
        );
        assert!(matches!(canonical_time("0975"), Err(Error::InvalidTime(_))));
        assert!(canonical_time("2400").is_err());
    }

    #[test]
    fn test_canonicalize_labels_and_values() {
        let raw = "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:\n\
:32A:240101EUR1000,00\n:13C:/CLSTIME/0945+0100\n:99Z:RAW\n-}";
        let message = Message::parse(raw).unwrap();
        let canonical = canonicalize(&message, &CanonicalConfig::default()).unwrap();

        assert_eq!(
            canonical.fields[0].components,
            vec![
                ("Date", CanonicalValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
                ("Curr", CanonicalValue::Text("EUR".into())),
                ("Amount", CanonicalValue::Amount("1000.00".into())),
            ]
        );
        assert!(canonical.fields[1].repeatable);
        assert_eq!(
            canonical.fields[1].components[1],
            ("Time", CanonicalValue::Time(NaiveTime::from_hms_opt(9, 45, 0).unwrap()))
        );
        assert_eq!(
            canonical.fields[2].components,
            vec![(UNPARSED_LABEL, CanonicalValue::Text("RAW".into()))]
        );
    }

    #[test]
    fn test_canonicalize_invalid_calendar_date() {
        let raw = "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:\n:32A:241340EUR1,00\n-}";
        let message = Message::parse(raw).unwrap();
        assert!(matches!(
            canonicalize(&message, &CanonicalConfig::default()),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn test_canonicalize_output_header() {
        let raw = "{1:F01TESTBANK0XXX0001000001}\
{2:O1030919010321BBBBGRA0AXXX00570001710103210920N}{4:\n:20:X\n-}";
        let message = Message::parse(raw).unwrap();
        let canonical = canonicalize(&message, &CanonicalConfig::default()).unwrap();
        assert_eq!(
            canonical.output_header,
            Some(CanonicalOutputHeader {
                input_time: NaiveTime::from_hms_opt(9, 19, 0).unwrap(),
                output_date: NaiveDate::from_ymd_opt(2001, 3, 21).unwrap(),
                output_time: NaiveTime::from_hms_opt(9, 20, 0).unwrap(),
            })
        );
    }

    #[test]
    fn test_canonicalize_output_header_invalid_time() {
        let raw = "{1:F01TESTBANK0XXX0001000001}\
{2:O1032519010321BBBBGRA0AXXX00570001710103210920N}{4:\n:20:X\n-}";
        let message = Message::parse(raw).unwrap();
        assert!(matches!(
            canonicalize(&message, &CanonicalConfig::default()),
            Err(Error::InvalidTime(_))
        ));
    }

    #[test]
    fn test_canonicalize_input_header_has_no_output_dates() {
        let raw = "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:\n:20:X\n-}";
        let message = Message::parse(raw).unwrap();
        let canonical = canonicalize(&message, &CanonicalConfig::default()).unwrap();
        assert!(canonical.output_header.is_none());
    }
}
