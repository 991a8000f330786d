use crate::{DEFAULT_EPOCH, Result, SnowflakeId};

/// The fields of a [`SnowflakeId`], with the timestamp made absolute.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedId {
    /// Milliseconds since the UNIX epoch (`epoch + timestamp offset`).
    pub timestamp: u64,
    /// The 10-bit machine ID.
    pub machine_id: u16,
    /// The 12-bit sequence.
    pub sequence: u16,
}

/// Splits a packed ID into its fields.
///
/// `epoch` must be the epoch the ID was generated with. A mismatched epoch
/// shifts the timestamp and cannot be detected.
///
/// This is a pure function: it touches no generator state and needs no
/// synchronization.
///
/// # Example
///
/// ```
/// use flakegen::{decode, DEFAULT_EPOCH};
///
/// let id = (123 << 22) | (5 << 12) | 1;
/// let decoded = decode(id, DEFAULT_EPOCH);
/// assert_eq!(decoded.timestamp, 1_700_000_000_123);
/// assert_eq!(decoded.machine_id, 5);
/// assert_eq!(decoded.sequence, 1);
/// ```
pub const fn decode(id: u64, epoch: u64) -> DecodedId {
    let offset = id >> SnowflakeId::TIMESTAMP_SHIFT;
    DecodedId {
        timestamp: epoch.saturating_add(offset),
        machine_id: ((id >> SnowflakeId::MACHINE_ID_SHIFT) & SnowflakeId::MACHINE_ID_MASK) as u16,
        sequence: ((id >> SnowflakeId::SEQUENCE_SHIFT) & SnowflakeId::SEQUENCE_MASK) as u16,
    }
}

/// [`decode`] against [`DEFAULT_EPOCH`].
pub const fn decode_default(id: u64) -> DecodedId {
    decode(id, DEFAULT_EPOCH)
}

/// Parses a decimal string and decodes it.
///
/// # Errors
///
/// Returns [`crate::Error::MalformedId`] if `id` is not a non-negative integer
/// that fits in 64 bits.
///
/// # Example
///
/// ```
/// use flakegen::{decode_str, DEFAULT_EPOCH, Error};
///
/// let decoded = decode_str("515396079617", DEFAULT_EPOCH).unwrap();
/// assert_eq!(decoded.machine_id, 1);
///
/// assert!(matches!(decode_str("-1", DEFAULT_EPOCH), Err(Error::MalformedId { .. })));
/// ```
pub fn decode_str(id: &str, epoch: u64) -> Result<DecodedId> {
    super::parse_decimal(id).map(|raw| decode(raw, epoch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn decodes_reference_example() {
        let id = SnowflakeId::from_components(123, 5, 1);
        let decoded = decode(id.to_raw(), 1_700_000_000_000);
        assert_eq!(
            decoded,
            DecodedId {
                timestamp: 1_700_000_000_123,
                machine_id: 5,
                sequence: 1,
            }
        );
        assert_eq!(id.decode(1_700_000_000_000), decoded);
        assert_eq!(decode_default(id.to_raw()), decoded);
    }

    #[test]
    fn decode_inverts_packing_at_field_extremes() {
        let epoch = 1_288_834_974_657;
        let cases = [
            (0, 0, 0),
            (SnowflakeId::MAX_TIMESTAMP, 0, 0),
            (0, SnowflakeId::MAX_MACHINE_ID, 0),
            (0, 0, SnowflakeId::MAX_SEQUENCE),
            (
                SnowflakeId::MAX_TIMESTAMP,
                SnowflakeId::MAX_MACHINE_ID,
                SnowflakeId::MAX_SEQUENCE,
            ),
            (1 << 40, 512, 2048),
        ];
        for (t, m, s) in cases {
            let raw = SnowflakeId::from_components(t, m, s).to_raw();
            let decoded = decode(raw, epoch);
            assert_eq!(decoded.timestamp, epoch + t);
            assert_eq!(decoded.machine_id, m);
            assert_eq!(decoded.sequence, s);
        }
    }

    #[test]
    fn mismatched_epoch_is_not_detected() {
        let raw = SnowflakeId::from_components(10, 1, 1).to_raw();
        assert_eq!(decode(raw, 0).timestamp, 10);
        assert_eq!(decode(raw, 1_000).timestamp, 1_010);
    }

    #[test]
    fn decode_str_accepts_decimal() {
        let raw = SnowflakeId::from_components(77, 3, 9).to_raw();
        let decoded = decode_str(&raw.to_string(), 0).unwrap();
        assert_eq!(decoded, decode(raw, 0));
        assert_eq!(decode_str("+0", 5).unwrap().timestamp, 5);
    }

    #[test]
    fn decode_str_rejects_malformed_input() {
        for input in [
            "",
            "-1",
            "-0",
            "abc",
            "12a",
            " 12",
            "12 ",
            "1.5",
            "0x10",
            "18446744073709551616",
        ] {
            let err = decode_str(input, DEFAULT_EPOCH).unwrap_err();
            assert_eq!(
                err,
                Error::MalformedId {
                    input: input.to_owned()
                },
                "input {input:?}"
            );
        }
    }

    #[test]
    fn decode_str_accepts_u64_max() {
        let decoded = decode_str("18446744073709551615", 0).unwrap();
        assert_eq!(decoded.timestamp, u64::MAX >> 22);
        assert_eq!(decoded.machine_id, SnowflakeId::MAX_MACHINE_ID);
        assert_eq!(decoded.sequence, SnowflakeId::MAX_SEQUENCE);
    }
}
