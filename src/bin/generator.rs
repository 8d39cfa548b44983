//! MT103 Generate - CLI tool for writing synthetic MT103 test samples.

use clap::Parser;
use mt103_system::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "mt103_generate")]
#[command(about = "Generate random and edge-case MT103 sample messages", long_about = None)]
struct Cli {
    /// Directory to write samples into
    #[arg(short, long, default_value = "test_samples")]
    output_dir: PathBuf,

    /// Number of random samples
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "SGD", "HKD", "NOK"];
const COUNTRIES: &[&str] = &["US", "GB", "FR", "DE", "JP", "CH", "CA", "AU", "SG", "HK", "NO", "SE", "DK", "NL", "BE"];
const CITIES: &[&str] = &[
    "NEW YORK", "LONDON", "PARIS", "FRANKFURT", "TOKYO", "ZURICH", "TORONTO", "SYDNEY",
    "SINGAPORE", "HONG KONG", "OSLO", "STOCKHOLM", "COPENHAGEN", "AMSTERDAM", "BRUSSELS",
];
const FIRST_NAMES: &[&str] = &["JOHN", "JANE", "ROBERT", "MARIA", "DAVID", "SARAH", "MICHAEL", "EMMA"];
const LAST_NAMES: &[&str] = &["SMITH", "JOHNSON", "WILLIAMS", "BROWN", "JONES", "GARCIA", "MILLER", "DAVIS"];
const COMPANIES: &[&str] = &["ACME CORP", "GLOBAL TECH INC", "INTERNATIONAL TRADE LLC", "PRIME INDUSTRIES"];

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&cli.output_dir)?;

    for i in 1..=cli.count {
        // First half carries optional fields, second half only mandatory ones.
        let include_optional = i <= cli.count / 2;
        let sample = Generator { rng: &mut rng }.message(i, include_optional);
        let path = cli.output_dir.join(format!("sample_{:03}.txt", i));
        fs::write(&path, sample)?;
        info!(
            "Created {} ({} fields)",
            path.display(),
            if include_optional { "full" } else { "minimal" }
        );
    }

    for (name, sample) in edge_cases() {
        let path = cli.output_dir.join(format!("sample_{}.txt", name));
        fs::write(&path, sample)?;
        info!("Created {} (edge case)", path.display());
    }

    info!(
        "Generated {} samples in {}",
        cli.count + edge_cases().len(),
        cli.output_dir.display()
    );
    Ok(())
}

struct Generator<'a> {
    rng: &'a mut StdRng,
}

impl Generator<'_> {
    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items.choose(self.rng).copied().unwrap_or_default()
    }

    fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn letters(&mut self, len: usize) -> String {
        (0..len).map(|_| char::from(self.rng.gen_range(b'A'..=b'Z'))).collect()
    }

    fn alphanumerics(&mut self, len: usize) -> String {
        const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        (0..len)
            .map(|_| char::from(CHARS[self.rng.gen_range(0..CHARS.len())]))
            .collect()
    }

    fn hex(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from_digit(self.rng.gen_range(0..16), 16).unwrap_or('0'))
            .collect()
    }

    fn bic(&mut self) -> String {
        let branch = self.pick(&["XXX", "AXX", "BXX"]);
        format!("{}{}", self.letters(8), branch)
    }

    fn lt_address(&mut self) -> String {
        format!("{}AXXX", self.letters(8))
    }

    fn amount(&mut self, low: f64, high: f64) -> String {
        format!("{:.2}", self.rng.gen_range(low..high)).replace('.', ",")
    }

    fn date(&mut self) -> String {
        let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
        let date = base + chrono::Duration::days(self.rng.gen_range(0..1000));
        date.format("%y%m%d").to_string()
    }

    fn name(&mut self) -> String {
        if self.flip() {
            format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
        } else {
            self.pick(COMPANIES).to_string()
        }
    }

    fn uetr(&mut self) -> String {
        let variant = self.pick(&["8", "9", "a", "b"]);
        format!(
            "{}-{}-4{}-{}{}-{}",
            self.hex(8),
            self.hex(4),
            self.hex(3),
            variant,
            self.hex(3),
            self.hex(12)
        )
    }

    fn message(&mut self, id: usize, include_optional: bool) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{{1:F01{}{:04}{:06}}}",
            self.lt_address(),
            self.rng.gen_range(1..=9999),
            self.rng.gen_range(1..=999_999)
        ));
        let priority = self.pick(&["N", "U"]);
        out.push_str(&format!("{{2:I103{}{}}}", self.lt_address(), priority));

        if include_optional && self.flip() {
            let mut user = String::new();
            if self.flip() {
                user.push_str(&format!("{{108:REF-{:04}-{}}}", id, self.letters(6)));
            }
            if self.flip() {
                user.push_str(&format!("{{113:{}}}", self.letters(4)));
            }
            if self.flip() {
                user.push_str(&format!("{{111:{:03}}}", self.rng.gen_range(1..=999)));
            }
            user.push_str(&format!("{{121:{}}}", self.uetr()));
            out.push_str(&format!("{{3:{}}}", user));
        }

        let mut fields: Vec<String> = Vec::new();
        fields.push(format!(":20:TX{:04}-{}", id, self.alphanumerics(8)));

        if include_optional && self.flip() {
            for _ in 0..self.rng.gen_range(1..=2) {
                let code = self.pick(&["CLSTIME", "RNCTIME", "SNDTIME"]);
                let sign = self.pick(&["+", "-"]);
                fields.push(format!(
                    ":13C:/{}/{:02}{:02}{}{:02}{:02}",
                    code,
                    self.rng.gen_range(0..24),
                    self.rng.gen_range(0..60),
                    sign,
                    self.rng.gen_range(0..13),
                    [0u8, 30, 45].choose(self.rng).copied().unwrap_or(0)
                ));
            }
        }

        let bank_op = self.pick(&["SPRI", "SSTD", "SPAY", "CRED", "CRTS", "HOLD"]);
        fields.push(format!(":23B:{}", bank_op));

        if include_optional && self.flip() {
            let code = self.pick(&["PHOB", "PHON", "PHOI", "TELI", "TELE"]);
            fields.push(format!(":23E:{}/INSTRUCTION", code));
        }
        if include_optional && self.flip() {
            fields.push(format!(":26T:{}", self.pick(&["K90", "K91", "K92"])));
        }

        let (date, currency, amount) = (self.date(), self.pick(CURRENCIES), self.amount(100.0, 1_000_000.0));
        fields.push(format!(":32A:{}{}{}", date, currency, amount));

        if include_optional && self.flip() {
            let (currency, amount) = (self.pick(CURRENCIES), self.amount(100.0, 1_000_000.0));
            fields.push(format!(":33B:{}{}", currency, amount));
            fields.push(format!(":36:{}", format!("{:.4}", self.rng.gen_range(0.5..2.0)).replace('.', ",")));
        }

        let customer = self.name();
        let (city, country) = (self.pick(CITIES), self.pick(COUNTRIES));
        if self.flip() {
            fields.push(format!(
                ":50K:/{}\n{}\n{}\n{}",
                self.rng.gen_range(100_000..999_999_999),
                customer,
                city,
                country
            ));
        } else {
            let issuer_country = self.pick(COUNTRIES);
            fields.push(format!(
                ":50F:/{}\n1/{}\n6/{}/ISSUER/{}",
                self.rng.gen_range(100_000..999_999),
                customer,
                issuer_country,
                self.rng.gen_range(100_000..999_999)
            ));
        }

        if include_optional && self.flip() {
            if self.flip() {
                fields.push(format!(":52A:{}", self.bic()));
            } else {
                let bank = self.name();
                let (city, country) = (self.pick(CITIES), self.pick(COUNTRIES));
                fields.push(format!(
                    ":52D://ACC{}\n{} BANK\n{}\n{}",
                    self.rng.gen_range(100_000..999_999),
                    bank,
                    city,
                    country
                ));
            }
        }
        if include_optional && self.flip() {
            fields.push(format!(
                ":53B:/{}",
                self.rng.gen_range(10_000_000_000_000u64..99_999_999_999_999)
            ));
        }
        if include_optional && self.flip() {
            fields.push(format!(
                ":54A:/C/{}\n{}",
                self.rng.gen_range(100_000_000..999_999_999),
                self.bic()
            ));
        }
        if include_optional && self.flip() {
            match self.pick(&["A", "C", "D"]) {
                "A" => fields.push(format!(":56A:{}", self.bic())),
                "C" => fields.push(format!(":56C://SC{}", self.rng.gen_range(100_000..999_999))),
                _ => {
                    let (bank, city) = (self.name(), self.pick(CITIES));
                    fields.push(format!(":56D:{} BANK\n{}", bank, city));
                }
            }
        }
        if include_optional && self.flip() {
            match self.pick(&["A", "B", "C", "D"]) {
                "A" => fields.push(format!(":57A:{}", self.bic())),
                "B" => fields.push(format!(":57B:{}", self.pick(CITIES))),
                "C" => fields.push(format!(":57C://SC{}", self.rng.gen_range(100_000..999_999))),
                _ => {
                    let (bank, city) = (self.name(), self.pick(CITIES));
                    fields.push(format!(":57D:{} BANK\n{}", bank, city));
                }
            }
        }

        let beneficiary = self.name();
        let (city, country) = (self.pick(CITIES), self.pick(COUNTRIES));
        fields.push(format!(
            ":59:/{}\n{}\n{}\n{}",
            self.rng.gen_range(100_000..999_999_999),
            beneficiary,
            city,
            country
        ));

        let invoices: Vec<String> = (0..self.rng.gen_range(1..=5))
            .map(|_| self.rng.gen_range(10_000..99_999).to_string())
            .collect();
        fields.push(format!(
            ":70:/INV/{}, INVOICE\nNUMBERS {}",
            self.date(),
            invoices.join(", ")
        ));

        fields.push(format!(":71A:{}", self.pick(&["BEN", "OUR", "SHA"])));

        if include_optional && self.flip() {
            for _ in 0..self.rng.gen_range(1..=3) {
                let (currency, amount) = (self.pick(CURRENCIES), self.amount(10.0, 500.0));
                fields.push(format!(":71F:{}{}", currency, amount));
            }
        }
        if include_optional && self.flip() {
            let (currency, amount) = (self.pick(CURRENCIES), self.amount(10.0, 200.0));
            fields.push(format!(":71G:{}{}", currency, amount));
        }
        if include_optional && self.flip() {
            let code = self.pick(&["/REC/", "/INS/", "/ACC/"]);
            fields.push(format!(
                ":72:{}INSTRUCTIONS FOR\n//PROCESSING THIS PAYMENT\n//AS REQUESTED",
                code
            ));
        }
        if include_optional && self.flip() {
            fields.push(format!(
                ":77B:/ORDERRES/{}//REGULATORY INFO\n//ADDITIONAL DETAILS",
                self.pick(COUNTRIES)
            ));
        }

        out.push_str(&format!("{{4:\n{}\n-}}", fields.join("\n")));

        // Trailers are rarer than the other optional blocks.
        if include_optional && self.rng.gen_bool(1.0 / 3.0) {
            let (mac, chk) = (self.hex(8).to_uppercase(), self.hex(12).to_uppercase());
            out.push_str(&format!("{{5:{{MAC:{}}}{{CHK:{}}}}}", mac, chk));
        }

        out
    }
}

fn edge_cases() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "minimal",
            "{1:F01MINIMAL0AXXX0001000001}{2:I103MINIMAL0XXXXN}{4:
:20:MINIMAL-001
:23B:SSTD
:32A:240101EUR1000,00
:59:/123456
JOHN DOE
:71A:SHA
-}",
        ),
        (
            "maximal",
            "{1:F01MAXIMAL0AXXX9999999999}{2:I103MAXIMAL0XXXXU}\
{3:{108:MAX-REF-001}{113:URGT}{111:999}{121:aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee}}{4:
:20:MAXIMAL-REFERENCE-001
:13C:/CLSTIME/0800+0100
:13C:/RNCTIME/0900+0100
:13C:/SNDTIME/1000+0100
:23B:SPRI
:23E:PHOB/123.456.789
:26T:K90
:32A:240101USD999999999,99
:33B:EUR888888888,88
:36:1,1234
:50F:/123456789
1/MAXIMUM CORPORATION INTERNATIONAL
2/HEADQUARTERS BUILDING SUITE 1000
3/US/NEW YORK/10001
4/1980-01-01
5/US
6/US/PASSPORT/A12345678
:51A:SENDUS33XXX
:52D://CH987654321
ORDERING BANK NAME
123 MAIN STREET
ZURICH
SWITZERLAND
:53B:/98765432109876543210
:54A:/C/111222333
RCVRUS44XXX
:56A:INTRUS55XXX
:57C://SC999999
:59:/999888777
BENEFICIARY MAXIMUM NAME
999 END STREET
LONDON
UNITED KINGDOM
:70:/INV/240101, MAXIMUM INVOICE
NUMBERS 11111, 22222, 33333,
44444, 55555, 66666, 77777,
88888, 99999, 00000
:71A:OUR
:71F:USD100,00
:71F:EUR50,00
:71F:GBP25,00
:71G:CHF75,50
:72:/REC/MAXIMUM INSTRUCTIONS
//FOR PROCESSING THIS
//VERY IMPORTANT PAYMENT
//WITH MULTIPLE LINES
//OF DETAILED INSTRUCTIONS
:77B:/ORDERRES/US//MAXIMUM REGULATORY
//REPORTING INFORMATION
//WITH MULTIPLE LINES
//OF COMPLIANCE DATA
-}{5:{MAC:FFFFFFFF}{CHK:AAAAAAAAAAAA}}",
        ),
        (
            "special_chars",
            "{1:F01SPECIAL0AXXX0000000001}{2:I103SPECIAL0XXXXN}{4:
:20:SPEC-001/2024
:23B:CRED
:32A:240229EUR12345,67
:50K:/ACC-123/456
O'MALLEY & SONS, LTD.
123 RUE DE LA PAIX
PARIS, FRANCE
:59:/789-ABC-XYZ
MÜLLER-SCHMIDT GMBH & CO.
STRAßE 456
MÜNCHEN
:70:/RFB/2024-SP-ÄÖÜ
:71A:SHA
-}",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt103_system::{mt103_to_json, CanonicalConfig, Message};

    #[test]
    fn test_edge_cases_parse_and_convert() {
        for (name, sample) in edge_cases() {
            let message = Message::parse(sample)
                .unwrap_or_else(|e| panic!("edge case {} does not parse: {}", name, e));
            assert_eq!(message.to_swift_string(), sample, "edge case {}", name);
            mt103_to_json(sample, &CanonicalConfig::default())
                .unwrap_or_else(|e| panic!("edge case {} does not convert: {}", name, e));
        }
    }

    #[test]
    fn test_random_samples_parse_and_convert() {
        for seed in 0..5u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for id in 1..=20 {
                for include_optional in [true, false] {
                    let sample = Generator { rng: &mut rng }.message(id, include_optional);
                    let message = Message::parse(&sample)
                        .unwrap_or_else(|e| panic!("seed {} sample {}: {}\n{}", seed, id, e, sample));
                    assert_eq!(message.to_swift_string(), sample);
                    mt103_to_json(&sample, &CanonicalConfig::default())
                        .unwrap_or_else(|e| panic!("seed {} sample {}: {}\n{}", seed, id, e, sample));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_sample() {
        let first = Generator { rng: &mut StdRng::seed_from_u64(7) }.message(1, true);
        let second = Generator { rng: &mut StdRng::seed_from_u64(7) }.message(1, true);
        assert_eq!(first, second);
    }
}
