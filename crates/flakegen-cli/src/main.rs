//! `flakegen`: generate and decode 64-bit Snowflake IDs from the shell.
//!
//! ```bash
//! flakegen generate -n 3
//! flakegen decode 515396079617 --format json
//! FLAKEGEN_MACHINE_ID=7 flakegen machine-id
//! ```

mod config;
mod telemetry;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Command, Config, DecodeFormat, GenerateFormat};
use flakegen::{DecodedId, DefaultMachineId, IdGenerator, MachineIdSource, SnowflakeId, decode_str};
use serde::Serialize;
use telemetry::init_telemetry;

/// A generated ID as printed by `generate --format json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRecord {
    #[serde(with = "flakegen::as_decimal_str")]
    id: SnowflakeId,
    #[serde(flatten)]
    decoded: DecodedId,
}

/// A decoded ID as printed by `decode --format json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedRecord<'a> {
    id: &'a str,
    #[serde(flatten)]
    decoded: DecodedId,
}

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry(config.log_level)?;
    tracing::debug!(?config, "starting");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &config.command {
        Command::Generate { count, format } => generate(&config, *count, *format, &mut out)?,
        Command::Decode { ids, format } => decode(&config, ids, *format, &mut out)?,
        Command::MachineId => {
            let machine_id = match config.machine_id {
                Some(machine_id) => machine_id,
                None => DefaultMachineId::default().resolve()?,
            };
            writeln!(out, "{machine_id}")?;
        }
    }

    out.flush()?;
    Ok(())
}

fn generate(
    config: &Config,
    count: usize,
    format: GenerateFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut builder = IdGenerator::builder().epoch(config.epoch);
    if let Some(machine_id) = config.machine_id {
        builder = builder.machine_id(machine_id);
    }
    let generator = builder.build()?;

    for _ in 0..count {
        let id = generator.generate()?;
        match format {
            GenerateFormat::Decimal => writeln!(out, "{id}")?,
            GenerateFormat::Padded => writeln!(out, "{}", id.to_padded_string())?,
            GenerateFormat::Json => {
                let record = GeneratedRecord {
                    id,
                    decoded: id.decode(generator.epoch()),
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
        }
    }

    tracing::debug!(count, machine_id = generator.machine_id(), "generated");
    Ok(())
}

fn decode(
    config: &Config,
    ids: &[String],
    format: DecodeFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for id in ids {
        let decoded = decode_str(id, config.epoch)?;
        match format {
            DecodeFormat::Text => writeln!(
                out,
                "id={id} timestamp={} machine_id={} sequence={}",
                decoded.timestamp, decoded.machine_id, decoded.sequence
            )?,
            DecodeFormat::Json => {
                serde_json::to_writer(&mut *out, &DecodedRecord { id, decoded })?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
