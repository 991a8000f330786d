use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use flakegen::{DEFAULT_EPOCH, SnowflakeId};
use tracing_subscriber::filter::LevelFilter;

/// Command-line arguments for the `flakegen` binary.
///
/// Global settings may also come from the environment (or a `.env` file in the
/// working directory). Explicit flags win over the environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakegen",
    version,
    about = "Generate and decode 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Epoch in milliseconds since the UNIX epoch.
    ///
    /// Every ID is stamped relative to this instant, and decoding must use the
    /// same value the IDs were generated with.
    ///
    /// Environment variable: `FLAKEGEN_EPOCH`
    #[arg(long, global = true, env = "FLAKEGEN_EPOCH", default_value_t = DEFAULT_EPOCH)]
    pub epoch: u64,

    /// Machine ID (0-1023) stamped into generated IDs.
    ///
    /// When unset, the ID is derived from the first non-loopback network
    /// interface's hardware address.
    ///
    /// Environment variable: `FLAKEGEN_MACHINE_ID`
    #[arg(long, global = true, env = "FLAKEGEN_MACHINE_ID")]
    pub machine_id: Option<u16>,

    /// Log level for diagnostics on stderr (off, error, warn, info, debug,
    /// trace). `RUST_LOG` takes precedence when set.
    ///
    /// Environment variable: `FLAKEGEN_LOG`
    #[arg(long, global = true, env = "FLAKEGEN_LOG", default_value_t = String::from("warn"))]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new IDs, one per line.
    Generate {
        /// Number of IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Output format.
        #[arg(long, value_enum, default_value_t = GenerateFormat::Decimal)]
        format: GenerateFormat,
    },
    /// Split IDs into timestamp, machine ID and sequence.
    Decode {
        /// IDs to decode, as decimal integers.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Text)]
        format: DecodeFormat,
    },
    /// Print the machine ID this host resolves to.
    MachineId,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateFormat {
    /// Plain decimal integer.
    Decimal,
    /// Zero-padded to 20 digits, so IDs sort lexicographically.
    Padded,
    /// One JSON object per line, ID as a decimal string.
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFormat {
    /// `key=value` pairs.
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub epoch: u64,
    pub machine_id: Option<u16>,
    pub log_level: LevelFilter,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if let Some(machine_id) = args.machine_id.filter(|&id| id > SnowflakeId::MAX_MACHINE_ID) {
            bail!(
                "machine ID ({}) exceeds the machine ID space (max = {})",
                machine_id,
                SnowflakeId::MAX_MACHINE_ID
            );
        }

        let Ok(log_level) = args.log_level.parse::<LevelFilter>() else {
            bail!("FLAKEGEN_LOG ({}) is not a valid log level", args.log_level);
        };

        if let Command::Generate { count: 0, .. } = args.command {
            bail!("COUNT must be greater than 0");
        }

        Ok(Self {
            epoch: args.epoch,
            machine_id: args.machine_id,
            log_level,
            command: args.command,
        })
    }
}
