//! Block 4 field shapes and the tag dispatch table.
//!
//! Every recognized tag maps to one [`FieldSpec`] in [`FIELD_SPECS`], which
//! names its parser and the output labels of its components. Parsers for
//! amount, date and time shapes are strict and fail with
//! [`Error::FieldFormat`]. Parsers for party and narrative shapes fall back
//! to [`FieldValue::Unparsed`] when the sub-structure does not fit, so the
//! text is never dropped.

use crate::error::{Error, Result};
use crate::tokenizer::RawField;
use crate::types::{is_bic, Amount, Currency, NumberedLine, Sign, SwiftDate};
use std::borrow::Cow;
use tracing::warn;

/// Parser for one field occurrence: `(tag, raw value)`.
pub type FieldParser = fn(&str, &str) -> Result<FieldValue>;

/// Dispatch entry for a recognized tag.
pub struct FieldSpec {
    pub tag: &'static str,
    pub name: &'static str,
    /// May legitimately occur more than once in a message.
    pub repeatable: bool,
    /// Output labels, positionally matching [`FieldValue::components`].
    pub components: &'static [&'static str],
    pub parse: FieldParser,
}

/// Label used for a value that did not fit its tag's shape, or an unknown tag.
pub const UNPARSED_LABEL: &str = "Unparsed";

const ACCOUNT_BIC: &[&str] = &["AccountId", "BIC"];
const ACCOUNT_LOCATION: &[&str] = &["AccountId", "Location"];
const ACCOUNT_ONLY: &[&str] = &["AccountId"];
const ACCOUNT_NAME: &[&str] = &["AccountId", "NameAddr"];
const STRUCTURED: &[&str] = &["PartyIdentifier", "NameAddr", "Lines"];
const CURRENCY_AMOUNT: &[&str] = &["Curr", "Amount"];

macro_rules! spec {
    ($tag:literal, $name:literal, $components:expr, $parse:expr) => {
        spec!($tag, $name, false, $components, $parse)
    };
    ($tag:literal, $name:literal, $repeatable:literal, $components:expr, $parse:expr) => {
        FieldSpec {
            tag: $tag,
            name: $name,
            repeatable: $repeatable,
            components: $components,
            parse: $parse,
        }
    };
}

/// All recognized tags. Anything else passes through as [`FieldValue::Unparsed`].
pub static FIELD_SPECS: &[FieldSpec] = &[
    spec!("13C", "Time Indication", true, &["Code", "Time", "Sign", "Offset"], parse_time_indication),
    spec!("20", "Sender's Reference", &["TRN"], parse_code),
    spec!("23B", "Bank Operation Code", &["BankOpCode"], parse_code),
    spec!("23E", "Instruction Code", &["InstructionCode", "AdditionalInfo"], parse_instruction_code),
    spec!("26T", "Transaction Type Code", &["TransType"], parse_code),
    spec!("32A", "Value Date/Currency/Interbank Settled Amount", &["Date", "Curr", "Amount"], parse_date_currency_amount),
    spec!("33B", "Currency/Instructed Amount", CURRENCY_AMOUNT, parse_currency_amount),
    spec!("36", "Exchange Rate", &["ExchangeRate"], parse_exchange_rate),
    spec!("50A", "Ordering Customer", ACCOUNT_BIC, parse_option_a),
    spec!("50F", "Ordering Customer", STRUCTURED, parse_structured_party),
    spec!("50K", "Ordering Customer", ACCOUNT_NAME, parse_name_address),
    spec!("51A", "Sending Institution", ACCOUNT_BIC, parse_option_a),
    spec!("52A", "Ordering Institution", ACCOUNT_BIC, parse_option_a),
    spec!("52D", "Ordering Institution", ACCOUNT_NAME, parse_name_address),
    spec!("53A", "Sender's Correspondent", ACCOUNT_BIC, parse_option_a),
    spec!("53B", "Sender's Correspondent", ACCOUNT_LOCATION, parse_option_b),
    spec!("53D", "Sender's Correspondent", ACCOUNT_NAME, parse_name_address),
    spec!("54A", "Receiver's Correspondent", ACCOUNT_BIC, parse_option_a),
    spec!("54B", "Receiver's Correspondent", ACCOUNT_LOCATION, parse_option_b),
    spec!("54D", "Receiver's Correspondent", ACCOUNT_NAME, parse_name_address),
    spec!("55A", "Third Reimbursement Institution", ACCOUNT_BIC, parse_option_a),
    spec!("55B", "Third Reimbursement Institution", ACCOUNT_LOCATION, parse_option_b),
    spec!("55D", "Third Reimbursement Institution", ACCOUNT_NAME, parse_name_address),
    spec!("56A", "Intermediary Institution", ACCOUNT_BIC, parse_option_a),
    spec!("56C", "Intermediary Institution", ACCOUNT_ONLY, parse_option_c),
    spec!("56D", "Intermediary Institution", ACCOUNT_NAME, parse_name_address),
    spec!("57A", "Account With Institution", ACCOUNT_BIC, parse_option_a),
    spec!("57B", "Account With Institution", ACCOUNT_LOCATION, parse_option_b),
    spec!("57C", "Account With Institution", ACCOUNT_ONLY, parse_option_c),
    spec!("57D", "Account With Institution", ACCOUNT_NAME, parse_name_address),
    spec!("59", "Beneficiary Customer", &["ACC_ID_Party", "Name_addr_Party"], parse_name_address),
    spec!("59A", "Beneficiary Customer", &["ACC_ID_Party", "BIC"], parse_option_a),
    spec!("59F", "Beneficiary Customer", STRUCTURED, parse_structured_party),
    spec!("70", "Remittance Information", &["PaymentDetails"], parse_narrative),
    spec!("71A", "Details of Charges", &["ChargesCode"], parse_code),
    spec!("71F", "Sender's Charges", true, CURRENCY_AMOUNT, parse_currency_amount),
    spec!("71G", "Receiver's Charges", CURRENCY_AMOUNT, parse_currency_amount),
    spec!("72", "Sender to Receiver Information", &["General"], parse_narrative),
    spec!("77B", "Regulatory Reporting", &["Narrative"], parse_narrative),
    spec!("77T", "Envelope Contents", &["Narrative"], parse_narrative),
];

/// Find the dispatch entry for `tag`.
pub fn lookup(tag: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.tag == tag)
}

/// Whether `tag` is declared repeatable.
pub fn is_repeatable(tag: &str) -> bool {
    lookup(tag).is_some_and(|spec| spec.repeatable)
}

/// 13C occurrence: `/CODE/HHMM±HHMM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeIndication {
    pub code: String,
    /// HHMM as written.
    pub time: String,
    pub sign: Sign,
    /// HHMM as written.
    pub offset: String,
}

/// Structured content of one field, one variant per field shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single-line code or reference (20, 23B, 26T, 71A).
    Code(String),
    /// Free text kept line by line (70, 72, 77B).
    Narrative(Vec<String>),
    /// 23E: a 4-letter code with optional `/` additional information.
    InstructionCode {
        code: String,
        additional_info: Option<String>,
    },
    TimeIndication(TimeIndication),
    /// 32A.
    DateCurrencyAmount {
        date: SwiftDate,
        currency: Currency,
        amount: Amount,
    },
    /// 33B, 71F, 71G.
    CurrencyAmount { currency: Currency, amount: Amount },
    /// 36, kept in SWIFT notation.
    ExchangeRate(Amount),
    /// Option A: optional party identifier, then a BIC.
    Institution {
        party_identifier: Option<String>,
        bic: String,
    },
    /// Option B: optional party identifier, then an optional location.
    Location {
        party_identifier: Option<String>,
        location: Option<String>,
    },
    /// Option C: a party identifier only.
    ClearingCode(String),
    /// Options D and K, and 59 without letter: optional account, then name and address lines.
    NameAddress {
        account: Option<String>,
        lines: Vec<String>,
    },
    /// Option F: party identifier, then numbered lines.
    StructuredParty {
        party_identifier: String,
        lines: Vec<NumberedLine>,
    },
    /// Raw text of an unknown tag or of a value that did not fit its shape.
    Unparsed(String),
}

/// One output component of a field, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component<'a> {
    Text(Cow<'a, str>),
    Date(&'a SwiftDate),
    Amount(&'a Amount),
    /// HHMM.
    Time(&'a str),
    Lines(&'a [NumberedLine]),
}

impl FieldValue {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, FieldValue::Unparsed(_))
    }

    /// Components in the order their labels appear in the field's [`FieldSpec`].
    /// `None` marks an optional component that is absent.
    pub fn components(&self) -> Vec<Option<Component<'_>>> {
        fn text(s: &str) -> Option<Component<'_>> {
            Some(Component::Text(Cow::Borrowed(s)))
        }
        fn opt_text(s: &Option<String>) -> Option<Component<'_>> {
            s.as_deref().map(|s| Component::Text(Cow::Borrowed(s)))
        }

        match self {
            FieldValue::Code(s) | FieldValue::ClearingCode(s) | FieldValue::Unparsed(s) => {
                vec![text(s)]
            }
            FieldValue::Narrative(lines) => vec![Some(Component::Text(Cow::Owned(lines.join("\n"))))],
            FieldValue::InstructionCode {
                code,
                additional_info,
            } => vec![text(code), opt_text(additional_info)],
            FieldValue::TimeIndication(t) => vec![
                text(&t.code),
                Some(Component::Time(&t.time)),
                text(t.sign.as_str()),
                Some(Component::Time(&t.offset)),
            ],
            FieldValue::DateCurrencyAmount {
                date,
                currency,
                amount,
            } => vec![
                Some(Component::Date(date)),
                text(currency.as_str()),
                Some(Component::Amount(amount)),
            ],
            FieldValue::CurrencyAmount { currency, amount } => {
                vec![text(currency.as_str()), Some(Component::Amount(amount))]
            }
            FieldValue::ExchangeRate(rate) => vec![text(rate.as_str())],
            FieldValue::Institution {
                party_identifier,
                bic,
            } => vec![opt_text(party_identifier), text(bic)],
            FieldValue::Location {
                party_identifier,
                location,
            } => vec![opt_text(party_identifier), opt_text(location)],
            FieldValue::NameAddress { account, lines } => {
                let name = (!lines.is_empty())
                    .then(|| Component::Text(Cow::Owned(lines.join("\n"))));
                vec![opt_text(account), name]
            }
            FieldValue::StructuredParty {
                party_identifier,
                lines,
            } => {
                let joined = lines
                    .iter()
                    .map(|l| format!("{}/{}", l.number, l.details))
                    .collect::<Vec<_>>()
                    .join("\n");
                vec![
                    text(party_identifier),
                    Some(Component::Text(Cow::Owned(joined))),
                    Some(Component::Lines(lines)),
                ]
            }
        }
    }
}

/// A block 4 field: tag, raw value and its structured interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub tag: String,
    pub raw: String,
    pub value: FieldValue,
}

impl Field {
    /// Dispatch a tokenized field to its parser.
    pub fn from_raw(raw: RawField) -> Result<Self> {
        let value = parse_field(&raw.tag, &raw.value)?;
        Ok(Self {
            tag: raw.tag,
            raw: raw.value,
            value,
        })
    }

    pub fn spec(&self) -> Option<&'static FieldSpec> {
        lookup(&self.tag)
    }
}

/// Parse one value for `tag`. Unknown tags pass through unparsed.
pub fn parse_field(tag: &str, value: &str) -> Result<FieldValue> {
    match lookup(tag) {
        Some(spec) => (spec.parse)(tag, value),
        None => {
            warn!(tag, "unknown tag passed through unparsed");
            Ok(FieldValue::Unparsed(value.to_string()))
        }
    }
}

fn unparsed(tag: &str, value: &str, reason: &str) -> FieldValue {
    warn!(tag, reason, "field kept as raw text");
    FieldValue::Unparsed(value.to_string())
}

fn split_lines(value: &str) -> Vec<&str> {
    value.lines().collect()
}

/// Split off a leading `/...` party identifier line.
fn split_party_identifier(lines: &[&str]) -> (Option<String>, Vec<String>) {
    match lines.split_first() {
        Some((first, rest)) if first.starts_with('/') => (
            Some(first.to_string()),
            rest.iter().map(|l| l.to_string()).collect(),
        ),
        _ => (None, lines.iter().map(|l| l.to_string()).collect()),
    }
}

fn parse_code(tag: &str, value: &str) -> Result<FieldValue> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return Ok(unparsed(tag, value, "expected a single-line code"));
    }
    Ok(FieldValue::Code(trimmed.to_string()))
}

fn parse_narrative(_tag: &str, value: &str) -> Result<FieldValue> {
    Ok(FieldValue::Narrative(
        value.lines().map(|l| l.trim_end().to_string()).collect(),
    ))
}

fn parse_instruction_code(tag: &str, value: &str) -> Result<FieldValue> {
    let value = value.trim();
    let (code, additional_info) = match value.split_once('/') {
        Some((code, rest)) => (code, Some(rest.to_string())),
        None => (value, None),
    };
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Ok(unparsed(tag, value, "expected a 4-letter instruction code"));
    }
    Ok(FieldValue::InstructionCode {
        code: code.to_string(),
        additional_info,
    })
}

fn parse_time_indication(tag: &str, value: &str) -> Result<FieldValue> {
    let value = value.trim();
    let rest = value
        .strip_prefix('/')
        .ok_or_else(|| Error::field(tag, format!("'{}' must start with '/'", value)))?;
    let (code, time_part) = rest
        .split_once('/')
        .ok_or_else(|| Error::field(tag, format!("'{}' has no closing '/' after the code", value)))?;
    if code.is_empty() || code.len() > 8 {
        return Err(Error::field(tag, format!("invalid time code '{}'", code)));
    }
    let bytes = time_part.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        time_part
            .get(range)
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
    };
    let (Some(time), Some(offset)) = (digits(0..4), digits(5..9)) else {
        return Err(Error::field(tag, format!("'{}' is not HHMM±HHMM", time_part)));
    };
    if bytes.len() != 9 {
        return Err(Error::field(tag, format!("'{}' is not HHMM±HHMM", time_part)));
    }
    let sign = time_part[4..5]
        .parse::<Sign>()
        .map_err(|message| Error::field(tag, message))?;

    Ok(FieldValue::TimeIndication(TimeIndication {
        code: code.to_string(),
        time: time.to_string(),
        sign,
        offset: offset.to_string(),
    }))
}

fn currency_amount(tag: &str, value: &str) -> Result<(Currency, Amount)> {
    let currency = value
        .get(0..3)
        .and_then(Currency::parse)
        .ok_or_else(|| Error::field(tag, format!("'{}' does not start with a 3-letter currency", value)))?;
    let amount_str = &value[3..];
    let amount = Amount::parse(amount_str)
        .ok_or_else(|| Error::field(tag, format!("invalid amount '{}'", amount_str)))?;
    Ok((currency, amount))
}

fn parse_date_currency_amount(tag: &str, value: &str) -> Result<FieldValue> {
    let value = value.trim();
    let date = value
        .get(0..6)
        .and_then(SwiftDate::parse)
        .ok_or_else(|| Error::field(tag, format!("'{}' does not start with a 6-digit date", value)))?;
    let (currency, amount) = currency_amount(tag, &value[6..])?;
    Ok(FieldValue::DateCurrencyAmount {
        date,
        currency,
        amount,
    })
}

fn parse_currency_amount(tag: &str, value: &str) -> Result<FieldValue> {
    let (currency, amount) = currency_amount(tag, value.trim())?;
    Ok(FieldValue::CurrencyAmount { currency, amount })
}

fn parse_exchange_rate(tag: &str, value: &str) -> Result<FieldValue> {
    let value = value.trim();
    Amount::parse(value)
        .map(FieldValue::ExchangeRate)
        .ok_or_else(|| Error::field(tag, format!("invalid exchange rate '{}'", value)))
}

fn parse_option_a(tag: &str, value: &str) -> Result<FieldValue> {
    let lines = split_lines(value.trim());
    let (party_identifier, rest) = split_party_identifier(&lines);
    match rest.as_slice() {
        [bic] if is_bic(bic.trim()) => Ok(FieldValue::Institution {
            party_identifier,
            bic: bic.trim().to_string(),
        }),
        _ => Ok(unparsed(tag, value, "expected an optional account line and a BIC")),
    }
}

fn parse_option_b(tag: &str, value: &str) -> Result<FieldValue> {
    let lines = split_lines(value.trim());
    let (party_identifier, rest) = split_party_identifier(&lines);
    match rest.as_slice() {
        [] if party_identifier.is_some() => Ok(FieldValue::Location {
            party_identifier,
            location: None,
        }),
        [location] => Ok(FieldValue::Location {
            party_identifier,
            location: Some(location.clone()),
        }),
        _ => Ok(unparsed(tag, value, "expected an optional account line and a location")),
    }
}

fn parse_option_c(tag: &str, value: &str) -> Result<FieldValue> {
    let value = value.trim();
    if value.starts_with('/') && !value.contains('\n') {
        Ok(FieldValue::ClearingCode(value.to_string()))
    } else {
        Ok(unparsed(tag, value, "expected a single '/' party identifier"))
    }
}

fn parse_name_address(tag: &str, value: &str) -> Result<FieldValue> {
    let lines = split_lines(value.trim());
    let (account, lines) = split_party_identifier(&lines);
    if account.is_none() && lines.is_empty() {
        return Ok(unparsed(tag, value, "empty party"));
    }
    Ok(FieldValue::NameAddress { account, lines })
}

fn parse_structured_party(tag: &str, value: &str) -> Result<FieldValue> {
    let lines = split_lines(value.trim());
    let Some((first, rest)) = lines.split_first() else {
        return Ok(unparsed(tag, value, "empty party"));
    };

    let mut numbered = Vec::with_capacity(rest.len());
    for line in rest {
        let parsed = line
            .split_once('/')
            .and_then(|(n, details)| n.parse::<u8>().ok().map(|n| (n, details)))
            .filter(|(n, _)| (1..=8).contains(n));
        match parsed {
            Some((number, details)) => numbered.push(NumberedLine {
                number,
                details: details.to_string(),
            }),
            None => return Ok(unparsed(tag, value, "line without a 1-8 number prefix")),
        }
    }

    Ok(FieldValue::StructuredParty {
        party_identifier: first.to_string(),
        lines: numbered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_covers_spec_tags() {
        for tag in [
            "13C", "20", "23B", "23E", "26T", "32A", "33B", "36", "50F", "50K", "51A", "52A",
            "52D", "53A", "53B", "53D", "54A", "54B", "54D", "56A", "56C", "56D", "57A", "57B",
            "57C", "57D", "59", "59A", "70", "71A", "71F", "71G", "72", "77B",
        ] {
            assert!(lookup(tag).is_some(), "missing parser for {}", tag);
        }
        assert!(FIELD_SPECS.len() >= 30);
    }

    #[test]
    fn test_registry_tags_unique() {
        for (i, spec) in FIELD_SPECS.iter().enumerate() {
            assert!(
                FIELD_SPECS[i + 1..].iter().all(|other| other.tag != spec.tag),
                "duplicate entry for {}",
                spec.tag
            );
        }
    }

    #[test]
    fn test_component_labels_match_parsed_shapes() {
        let samples = [
            ("13C", "/CLSTIME/0945+0100"),
            ("20", "REF"),
            ("23B", "CRED"),
            ("23E", "PHOB/123"),
            ("26T", "K90"),
            ("32A", "240101EUR1,00"),
            ("33B", "EUR1,00"),
            ("36", "0,91"),
            ("50A", "/123\nDEUTDEFF"),
            ("50F", "/123\n1/NAME"),
            ("50K", "/123\nNAME"),
            ("51A", "DEUTDEFF"),
            ("52A", "DEUTDEFF"),
            ("52D", "NAME"),
            ("53A", "DEUTDEFF"),
            ("53B", "/123"),
            ("53D", "NAME"),
            ("54A", "DEUTDEFF"),
            ("54B", "LOC"),
            ("54D", "NAME"),
            ("55A", "DEUTDEFF"),
            ("55B", "LOC"),
            ("55D", "NAME"),
            ("56A", "DEUTDEFF"),
            ("56C", "//SC1"),
            ("56D", "NAME"),
            ("57A", "DEUTDEFF"),
            ("57B", "LOC"),
            ("57C", "//SC1"),
            ("57D", "NAME"),
            ("59", "/1\nNAME"),
            ("59A", "DEUTDEFF"),
            ("59F", "/1\n1/NAME"),
            ("70", "TEXT"),
            ("71A", "SHA"),
            ("71F", "EUR1,00"),
            ("71G", "EUR1,00"),
            ("72", "/REC/X"),
            ("77B", "/ORDERRES/US"),
            ("77T", "ENVELOPE"),
        ];
        assert_eq!(samples.len(), FIELD_SPECS.len());
        for (tag, value) in samples {
            let spec = lookup(tag).unwrap();
            let parsed = (spec.parse)(tag, value).unwrap();
            assert!(!parsed.is_unparsed(), "{} sample fell back to raw", tag);
            assert_eq!(parsed.components().len(), spec.components.len(), "tag {}", tag);
        }
    }

    #[test]
    fn test_parse_32a() {
        let value = parse_field("32A", "091120EUR15000,11").unwrap();
        assert_eq!(
            value,
            FieldValue::DateCurrencyAmount {
                date: SwiftDate::parse("091120").unwrap(),
                currency: Currency::parse("EUR").unwrap(),
                amount: Amount::parse("15000,11").unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_32a_bad_shapes() {
        assert!(matches!(
            parse_field("32A", "0911EUR15000,11"),
            Err(Error::FieldFormat { .. })
        ));
        assert!(matches!(
            parse_field("32A", "091120EU15000,11"),
            Err(Error::FieldFormat { .. })
        ));
        assert!(parse_field("32A", "091120EUR").is_err());
    }

    #[test]
    fn test_parse_13c() {
        let value = parse_field("13C", "/RNCTIME/1030-0500").unwrap();
        assert_eq!(
            value,
            FieldValue::TimeIndication(TimeIndication {
                code: "RNCTIME".into(),
                time: "1030".into(),
                sign: Sign::Minus,
                offset: "0500".into(),
            })
        );
        assert!(parse_field("13C", "CLSTIME/0945+0100").is_err());
        assert!(parse_field("13C", "/CLSTIME/0945*0100").is_err());
        assert!(parse_field("13C", "/CLSTIME/0945+01").is_err());
    }

    #[test]
    fn test_parse_50f() {
        let value = parse_field("50F", "/123456\n1/Name of customer\n6/US/Issuer/123456").unwrap();
        assert_eq!(
            value,
            FieldValue::StructuredParty {
                party_identifier: "/123456".into(),
                lines: vec![
                    NumberedLine {
                        number: 1,
                        details: "Name of customer".into()
                    },
                    NumberedLine {
                        number: 6,
                        details: "US/Issuer/123456".into()
                    },
                ],
            }
        );
    }

    #[test]
    fn test_50f_without_numbers_kept_raw() {
        let value = parse_field("50F", "/123456\nJOHN DOE").unwrap();
        assert_eq!(value, FieldValue::Unparsed("/123456\nJOHN DOE".into()));
    }

    #[test]
    fn test_parse_59_account_and_name() {
        let value = parse_field("59", "/123456\nJOHN DOE\nLONDON").unwrap();
        assert_eq!(
            value,
            FieldValue::NameAddress {
                account: Some("/123456".into()),
                lines: vec!["JOHN DOE".into(), "LONDON".into()],
            }
        );
        let value = parse_field("59", "JOHN DOE").unwrap();
        assert_eq!(
            value,
            FieldValue::NameAddress {
                account: None,
                lines: vec!["JOHN DOE".into()],
            }
        );
    }

    #[test]
    fn test_parse_54a() {
        let value = parse_field("54A", "/C/111222333\nRCVRUS44XXX").unwrap();
        assert_eq!(
            value,
            FieldValue::Institution {
                party_identifier: Some("/C/111222333".into()),
                bic: "RCVRUS44XXX".into(),
            }
        );
        assert!(parse_field("54A", "NOT A BIC AT ALL").unwrap().is_unparsed());
    }

    #[test]
    fn test_parse_23e() {
        let value = parse_field("23E", "PHOB/123.456").unwrap();
        assert_eq!(
            value,
            FieldValue::InstructionCode {
                code: "PHOB".into(),
                additional_info: Some("123.456".into()),
            }
        );
        assert_eq!(
            parse_field("23E", "SDVA").unwrap(),
            FieldValue::InstructionCode {
                code: "SDVA".into(),
                additional_info: None
            }
        );
    }

    #[test]
    fn test_parse_option_b_and_c() {
        assert_eq!(
            parse_field("53B", "/98765432109876543210").unwrap(),
            FieldValue::Location {
                party_identifier: Some("/98765432109876543210".into()),
                location: None,
            }
        );
        assert_eq!(
            parse_field("57C", "//SC999999").unwrap(),
            FieldValue::ClearingCode("//SC999999".into())
        );
    }

    #[test]
    fn test_unknown_tag_passthrough() {
        assert_eq!(
            parse_field("99Z", "ANYTHING\nGOES").unwrap(),
            FieldValue::Unparsed("ANYTHING\nGOES".into())
        );
    }

    #[test]
    fn test_repeatable_tags() {
        assert!(is_repeatable("13C"));
        assert!(is_repeatable("71F"));
        assert!(!is_repeatable("32A"));
        assert!(!is_repeatable("99Z"));
    }

    #[test]
    fn test_exchange_rate_kept_in_swift_notation() {
        let value = parse_field("36", "0,91").unwrap();
        assert_eq!(value.components(), vec![Some(Component::Text(Cow::Borrowed("0,91")))]);
        assert!(parse_field("36", "ABC").is_err());
    }
}
