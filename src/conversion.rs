//! Conversion entry points.
//!
//! [`mt103_to_json`] is the single-message contract. The file and
//! directory helpers wrap it for the converter binary: one message per
//! `.txt` file, one output file per input, and a per-file report where a
//! failure never stops the rest of a batch.

use crate::config::{CanonicalConfig, ConvertOptions};
use crate::emitter::Mt103Json;
use crate::error::Result;
use crate::message::Message;
use crate::Format;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Convert one raw MT103 message into the canonical JSON document.
///
/// # Examples
///
/// ```
/// use mt103_system::config::CanonicalConfig;
/// use mt103_system::conversion::mt103_to_json;
///
/// let raw = "{1:F01TESTBANK0XXX0001000001}{2:I103TESTBANK1XXXN}\
/// {4:\n:20:REF\n:32A:240101EUR1000,00\n-}";
/// let json = mt103_to_json(raw, &CanonicalConfig::default())?;
/// assert_eq!(json["MT103"]["A"]["F32A"]["F32A_Date"], "2024-01-01");
/// assert_eq!(json["MT103"]["A"]["F32A"]["F32A_Amount"], "1000.00");
/// # Ok::<(), mt103_system::Error>(())
/// ```
pub fn mt103_to_json(raw: &str, config: &CanonicalConfig) -> Result<Value> {
    let message = Message::parse(raw)?;
    Ok(Mt103Json::from_message(&message, config)?.value)
}

/// Default output path: a `.txt` extension is replaced, anything else gets one appended.
pub fn output_path_for(input: &Path, format: Format) -> PathBuf {
    let is_txt = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if is_txt {
        input.with_extension(format.extension())
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }
}

/// Convert one file and return the path written.
pub fn convert_file(input: &Path, output: Option<&Path>, options: &ConvertOptions) -> Result<PathBuf> {
    let mut file = File::open(input)?;
    let message = Message::from_read(&mut file)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path_for(input, options.format));
    let mut writer = BufWriter::new(File::create(&output)?);
    write_message(&message, &mut writer, options)?;
    writer.flush()?;

    info!(input = %input.display(), output = %output.display(), "converted");
    Ok(output)
}

/// Write a parsed message in the requested output format.
pub fn write_message<W: Write>(message: &Message, writer: &mut W, options: &ConvertOptions) -> Result<()> {
    match options.format {
        Format::Json => Mt103Json::from_message(message, &options.canonical)?.write_to(writer, options.pretty),
        Format::Swift => {
            message.write_to(writer)?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

/// `*.txt` files directly inside `dir`, sorted by name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_txt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if path.is_file() && is_txt {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Result of converting one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Path written, or the error message.
    pub result: std::result::Result<PathBuf, String>,
}

/// Per-file results of a batch conversion, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    file: String,
    status: &'a str,
    output: String,
    error: &'a str,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Write the report as CSV: `file,status,output,error`.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for outcome in &self.outcomes {
            let record = match &outcome.result {
                Ok(output) => ReportRecord {
                    file: outcome.input.display().to_string(),
                    status: "ok",
                    output: output.display().to_string(),
                    error: "",
                },
                Err(message) => ReportRecord {
                    file: outcome.input.display().to_string(),
                    status: "error",
                    output: String::new(),
                    error: message,
                },
            };
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Convert every `*.txt` file in `dir` in parallel, next to its input.
pub fn convert_directory(dir: &Path, options: &ConvertOptions) -> Result<BatchReport> {
    let inputs = discover_inputs(dir)?;
    info!(dir = %dir.display(), files = inputs.len(), "starting batch conversion");

    let outcomes = inputs
        .into_par_iter()
        .map(|input| {
            let result = convert_file(&input, None, options).map_err(|e| {
                warn!(input = %input.display(), error = %e, "conversion failed");
                e.to_string()
            });
            FileOutcome { input, result }
        })
        .collect();

    Ok(BatchReport { outcomes })
}
