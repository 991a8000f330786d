use core::{fmt, str::FromStr};

use crate::{DecodedId, Error, Result};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero, keeps the value positive as an `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits machine ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// IDs order by timestamp first, then machine ID, then sequence, so the
/// derived [`Ord`] matches issuance order for a single generator.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 10-bit machine ID field. Occupies bits 12 through 21.
    pub const MACHINE_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the machine ID to its position (bit 12).
    pub const MACHINE_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Largest encodable epoch-relative timestamp.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest machine ID (1023).
    pub const MAX_MACHINE_ID: u16 = Self::MACHINE_ID_MASK as u16;

    /// Largest sequence value (4095).
    pub const MAX_SEQUENCE: u16 = Self::SEQUENCE_MASK as u16;

    /// Packs the three fields, silently truncating each to its width.
    pub const fn from(timestamp: u64, machine_id: u16, sequence: u16) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id as u64 & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence as u64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    /// Packs the three fields. Out-of-range components are a logic error and
    /// trip a debug assertion.
    pub fn from_components(timestamp: u64, machine_id: u16, sequence: u16) -> Self {
        debug_assert!(timestamp <= Self::MAX_TIMESTAMP, "timestamp overflow");
        debug_assert!(machine_id <= Self::MAX_MACHINE_ID, "machine_id overflow");
        debug_assert!(sequence <= Self::MAX_SEQUENCE, "sequence overflow");
        Self::from(timestamp, machine_id, sequence)
    }

    /// Wraps a raw integer without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the packed integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the epoch-relative timestamp.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID.
    pub const fn machine_id(&self) -> u16 {
        ((self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK) as u16
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u16 {
        ((self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u16
    }

    /// Returns `false` if the reserved top bit is set.
    pub const fn is_valid(&self) -> bool {
        self.id >> 63 == 0
    }

    /// Returns the ID as a zero-padded 20-digit string, which sorts
    /// lexicographically in the same order as the integer.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    /// Decodes the ID against `epoch` (ms since the UNIX epoch).
    ///
    /// See [`crate::decode`].
    pub fn decode(&self, epoch: u64) -> DecodedId {
        crate::decode(self.id, epoch)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.id
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    /// Parses a decimal string. Unlike [`crate::decode_str`], the reserved top
    /// bit must be clear.
    fn from_str(s: &str) -> Result<Self> {
        let id = Self::from_raw(crate::id::parse_decimal(s)?);
        if !id.is_valid() {
            return Err(Error::malformed(s));
        }
        Ok(id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("reserved", 1, self.id >> 63),
            ("timestamp", 41, self.timestamp()),
            ("machine_id", 10, u64::from(self.machine_id())),
            ("sequence", 12, u64::from(self.sequence())),
        ];

        let labels = fields.map(|(name, bits, _)| format!("{name} ({bits})"));
        let widths: Vec<usize> = fields
            .iter()
            .zip(&labels)
            .map(|((_, _, value), label)| {
                let dec = value.to_string().len();
                let hex = format!("0x{value:x}").len();
                label.len().max(dec).max(hex) + 2
            })
            .collect();

        let border = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            write!(f, "        +")?;
            for w in &widths {
                write!(f, "{}+", "-".repeat(*w))?;
            }
            writeln!(f)
        };

        writeln!(f, "SnowflakeId {{")?;
        writeln!(f, "    raw id     : 0x{:016x} ({})", self.id, self.id)?;
        writeln!(f, "    padded     : {}", self.to_padded_string())?;
        writeln!(f, "    layout     :")?;
        border(f)?;
        write!(f, "        |")?;
        for (label, &w) in labels.iter().zip(&widths) {
            write!(f, "{label:^w$}|")?;
        }
        writeln!(f)?;
        border(f)?;
        write!(f, "        |")?;
        for ((_, _, value), &w) in fields.iter().zip(&widths) {
            write!(f, "{value:^w$}|")?;
        }
        writeln!(f)?;
        write!(f, "        |")?;
        for ((_, _, value), &w) in fields.iter().zip(&widths) {
            write!(f, "{:^w$}|", format!("0x{value:x}"))?;
        }
        writeln!(f)?;
        border(f)?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_and_bounds() {
        let ts = SnowflakeId::MAX_TIMESTAMP;
        let mid = SnowflakeId::MAX_MACHINE_ID;
        let seq = SnowflakeId::MAX_SEQUENCE;

        let id = SnowflakeId::from(ts, mid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.machine_id(), mid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(SnowflakeId::from_components(ts, mid, seq), id);
        assert!(id.is_valid());
        assert_eq!(id.to_raw(), i64::MAX as u64);
    }

    #[test]
    fn packs_in_field_order() {
        let id = SnowflakeId::from_components(123, 5, 1);
        assert_eq!(id.to_raw(), (123 << 22) | (5 << 12) | 1);
    }

    #[test]
    fn orders_by_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, 7, 4095);
        let b = SnowflakeId::from_components(11, 7, 0);
        let c = SnowflakeId::from_components(11, 7, 1);
        assert!(a < b && b < c);
        assert!(a.to_raw() < b.to_raw() && b.to_raw() < c.to_raw());
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        SnowflakeId::from_components(SnowflakeId::MAX_TIMESTAMP + 1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "machine_id overflow")]
    fn machine_id_overflow_panics() {
        SnowflakeId::from_components(0, SnowflakeId::MAX_MACHINE_ID + 1, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        SnowflakeId::from_components(0, 0, SnowflakeId::MAX_SEQUENCE + 1);
    }

    #[test]
    fn display_and_padded() {
        let id = SnowflakeId::from_raw(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.to_padded_string(), "00000000000000000042");
    }

    #[test]
    fn parses_decimal() {
        let id: SnowflakeId = "515396075521".parse().unwrap();
        assert_eq!(id, SnowflakeId::from_components(122_880, 0, 1));
    }

    #[test]
    fn parse_rejects_reserved_bit() {
        let err = u64::MAX.to_string().parse::<SnowflakeId>().unwrap_err();
        assert!(matches!(err, Error::MalformedId { .. }));
    }

    #[test]
    fn debug_shows_layout() {
        let dbg = format!("{:?}", SnowflakeId::from_components(1, 2, 3));
        assert!(dbg.starts_with("SnowflakeId {"));
        assert!(dbg.contains("timestamp (41)"));
        assert!(dbg.contains("machine_id (10)"));
        assert!(dbg.contains("sequence (12)"));
    }
}
