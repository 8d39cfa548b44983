//! Projection of a canonical message into the `{"MT103": {...}}` JSON schema.
//!
//! Header scalars sit at the top level, block 4 fields live under `"A"`
//! keyed `F<tag>` with leaves named `F<tag>_<component>`. Repeatable tags
//! are always arrays. Nothing is parsed or validated here.

use crate::canonical::{canonicalize, CanonicalField, CanonicalMessage, CanonicalValue};
use crate::config::CanonicalConfig;
use crate::error::Result;
use crate::header::ApplicationHeader;
use crate::message::Message;
use chrono::NaiveTime;
use serde_json::{json, Map, Value};
use std::io::Write;

/// Top-level key of the emitted document.
pub const ROOT_KEY: &str = "MT103";

/// Key of the user header's UETR.
pub const UETR_KEY: &str = "UniqueEndToEndTransactionReference_121";

/// An emitted JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct Mt103Json {
    pub value: Value,
}

impl Mt103Json {
    /// Canonicalize `message` and project it.
    pub fn from_message(message: &Message, config: &CanonicalConfig) -> Result<Self> {
        let canonical = canonicalize(message, config)?;
        Ok(Self {
            value: emit(&canonical),
        })
    }

    /// Write the document as JSON, pretty-printed or compact.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, &self.value)?;
        } else {
            serde_json::to_writer(&mut *writer, &self.value)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    /// The `"MT103"` object.
    pub fn body(&self) -> Option<&Map<String, Value>> {
        self.value.get(ROOT_KEY).and_then(Value::as_object)
    }
}

/// Build the output document for a canonical message.
pub fn emit(canonical: &CanonicalMessage<'_>) -> Value {
    let message = canonical.message;
    let mut body = Map::new();

    let basic = message.basic_header();
    body.insert("Application_Id".into(), json!(basic.application_id.to_string()));
    body.insert("Service_Id".into(), json!(basic.service_id));
    body.insert("LT_Address".into(), json!(basic.lt_address));
    body.insert("Session".into(), json!(basic.session_number));
    body.insert("Sequence_No".into(), json!(basic.sequence_number));

    let app = message.application_header();
    body.insert("IO_ID".into(), json!(app.direction().to_string()));
    body.insert("MT".into(), json!(app.message_type()));
    match app {
        ApplicationHeader::Input(h) => {
            body.insert("Recipient".into(), json!(h.receiver));
            if let Some(d) = h.delivery_monitoring {
                body.insert("Delivery_Monitoring".into(), json!(d.to_string()));
            }
            if let Some(ref o) = h.obsolescence_period {
                body.insert("Obsolescence_Period".into(), json!(o));
            }
        }
        ApplicationHeader::Output(h) => {
            let times = canonical.output_header;
            let time = |t: Option<NaiveTime>| json!(t.map(CanonicalValue::Time));
            body.insert("Input_Time".into(), time(times.map(|t| t.input_time)));
            body.insert("MIR".into(), json!(h.mir.to_string()));
            body.insert("Sender".into(), json!(h.mir.lt_address));
            body.insert(
                "Output_Date".into(),
                json!(times.map(|t| CanonicalValue::Date(t.output_date))),
            );
            body.insert("Output_Time".into(), time(times.map(|t| t.output_time)));
        }
    }
    body.insert(
        "Message_Priority".into(),
        json!(app.priority().map(|p| p.to_string())),
    );

    let user = message.user_header();
    body.insert(
        "MUR".into(),
        json!(user.and_then(|u| u.message_user_reference())),
    );
    if let Some(user) = user {
        let named = [
            ("Service_Identifier", user.service_identifier()),
            ("Bank_Priority_Code", user.bank_priority_code()),
            ("Service_Type_Identifier", user.service_type_identifier()),
            ("Validation_Flag", user.validation_flag()),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                body.insert(key.into(), json!(value));
            }
        }
    }
    body.insert(
        UETR_KEY.into(),
        json!(user.and_then(|u| u.unique_end_to_end_transaction_reference())),
    );
    if let Some(user) = user {
        body.insert("User_Header".into(), entries_object(&user.entries));
    }

    body.insert("A".into(), Value::Object(text_block(&canonical.fields)));

    if let Some(trailer) = message.trailer() {
        body.insert("Trailer".into(), entries_object(&trailer.entries));
    }

    let mut root = Map::new();
    root.insert(ROOT_KEY.into(), Value::Object(body));
    Value::Object(root)
}

/// Sub-block entries keyed by sub-tag. A repeated sub-tag becomes an array.
fn entries_object(entries: &[(String, String)]) -> Value {
    let mut object = Map::new();
    for (key, value) in entries {
        push_grouped(&mut object, key.clone(), json!(value));
    }
    Value::Object(object)
}

fn push_grouped(object: &mut Map<String, Value>, key: String, value: Value) {
    match object.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            object.insert(key, value);
        }
    }
}

fn field_object(field: &CanonicalField) -> Value {
    let mut object = Map::new();
    for (label, value) in &field.components {
        object.insert(format!("F{}_{}", field.tag, label), json!(value));
    }
    Value::Object(object)
}

/// Group fields by tag in order of first appearance.
fn text_block(fields: &[CanonicalField]) -> Map<String, Value> {
    let mut block = Map::new();

    for field in fields {
        let key = format!("F{}", field.tag);
        let record = field_object(field);

        if field.repeatable && !block.contains_key(&key) {
            block.insert(key, Value::Array(vec![record]));
        } else {
            push_grouped(&mut block, key, record);
        }
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit_raw(raw: &str) -> Value {
        let message = Message::parse(raw).unwrap();
        Mt103Json::from_message(&message, &CanonicalConfig::default())
            .unwrap()
            .value
    }

    #[test]
    fn test_header_scalars() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}\
{3:{108:TEST-REF-001}{113:URGT}}{4:\n:20:X\n-}",
        );
        let body = &value["MT103"];
        assert_eq!(body["Application_Id"], "F");
        assert_eq!(body["Service_Id"], "01");
        assert_eq!(body["LT_Address"], "TESTBANK0XXX");
        assert_eq!(body["Session"], "0001");
        assert_eq!(body["Sequence_No"], "000001");
        assert_eq!(body["IO_ID"], "I");
        assert_eq!(body["MT"], "103");
        assert_eq!(body["Recipient"], "TESTBANK1XXX");
        assert_eq!(body["Message_Priority"], "N");
        assert_eq!(body["MUR"], "TEST-REF-001");
        assert_eq!(body["Bank_Priority_Code"], "URGT");
        assert_eq!(body[UETR_KEY], Value::Null);
        assert_eq!(body["User_Header"]["113"], "URGT");
    }

    #[test]
    fn test_output_header_keys() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}\
{2:O1030919010321BBBBGRA0AXXX00570001710103210920N}{4:\n:20:X\n-}",
        );
        let body = &value["MT103"];
        assert_eq!(body["IO_ID"], "O");
        assert_eq!(body["MIR"], "010321BBBBGRA0AXXX0057000171");
        assert_eq!(body["Sender"], "BBBBGRA0AXXX");
        assert_eq!(body["Input_Time"], "09:19:00");
        assert_eq!(body["Output_Date"], "2001-03-21");
        assert_eq!(body["Output_Time"], "09:20:00");
        assert!(body.get("Recipient").is_none());
        assert_eq!(body["MUR"], Value::Null);
    }

    #[test]
    fn test_single_repeatable_is_array() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}\
{4:\n:13C:/CLSTIME/0945+0100\n:71F:EUR1,50\n-}",
        );
        let a = &value["MT103"]["A"];
        assert_eq!(
            a["F13C"],
            json!([{
                "F13C_Code": "CLSTIME",
                "F13C_Time": "09:45:00",
                "F13C_Sign": "+",
                "F13C_Offset": "01:00:00"
            }])
        );
        assert_eq!(a["F71F"], json!([{"F71F_Curr": "EUR", "F71F_Amount": "1.50"}]));
    }

    #[test]
    fn test_duplicate_non_repeatable_becomes_array() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}\
{4:\n:23E:PHOB\n:23E:SDVA\n-}",
        );
        let items = value["MT103"]["A"]["F23E"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["F23E_InstructionCode"], "SDVA");
    }

    #[test]
    fn test_structured_party_lines() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}\
{4:\n:50F:/123456\n1/Customer Name\n6/US/Issuer/789\n-}",
        );
        let f50f = &value["MT103"]["A"]["F50F"];
        assert_eq!(f50f["F50F_PartyIdentifier"], "/123456");
        assert_eq!(f50f["F50F_NameAddr"], "1/Customer Name\n6/US/Issuer/789");
        assert_eq!(
            f50f["F50F_Lines"],
            json!([
                {"Line": 1, "Details": "Customer Name"},
                {"Line": 6, "Details": "US/Issuer/789"}
            ])
        );
    }

    #[test]
    fn test_trailer_mapping() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:\n:20:X\n-}\
{5:{MAC:FFFFFFFF}{CHK:AAAAAAAAAAAA}}",
        );
        assert_eq!(
            value["MT103"]["Trailer"],
            json!({"MAC": "FFFFFFFF", "CHK": "AAAAAAAAAAAA"})
        );
    }

    #[test]
    fn test_compact_write() {
        let message = Message::parse(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}{4:\n:20:X\n-}",
        )
        .unwrap();
        let doc = Mt103Json::from_message(&message, &CanonicalConfig::default()).unwrap();
        let mut out = Vec::new();
        doc.write_to(&mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("{\"MT103\":{\"Application_Id\":\"F\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_repeated_sub_tags_become_arrays() {
        let value = emit_raw(
            "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}\
{3:{433:A}{108:REF}{433:B}}{4:\n:20:X\n-}{5:{CHK:1}{CHK:2}{MAC:3}}",
        );
        let body = &value["MT103"];
        assert_eq!(body["User_Header"], json!({"433": ["A", "B"], "108": "REF"}));
        assert_eq!(body["Trailer"], json!({"CHK": ["1", "2"], "MAC": "3"}));
        assert_eq!(body["MUR"], "REF");
    }
}
