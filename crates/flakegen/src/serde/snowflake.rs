//! Field adapters for `#[serde(with = "...")]`.
//!
//! [`SnowflakeId`] serializes as its native `u64` by default. JSON consumers
//! that parse numbers as IEEE doubles lose precision past 2^53, so
//! [`as_decimal_str`] writes the ID as a decimal string instead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, SnowflakeId};

fn check(id: SnowflakeId) -> Result<SnowflakeId, Error> {
    if id.is_valid() {
        Ok(id)
    } else {
        Err(Error::MalformedId {
            input: id.to_string(),
        })
    }
}

pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer, check};
    use crate::SnowflakeId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the reserved
    /// top bit is set.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        check(SnowflakeId::from_raw(raw)).map_err(serde::de::Error::custom)
    }
}

pub mod as_decimal_str {
    use core::fmt;

    use super::{Deserializer, Serializer, check};
    use crate::SnowflakeId;

    /// Serialize an ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from a decimal string. Plain integers are accepted
    /// too, so producers can migrate one side at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a non-negative 64-bit integer or
    /// the reserved top bit is set.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal string or non-negative integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<SnowflakeId>().map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                check(SnowflakeId::from_raw(v)).map_err(E::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let raw = u64::try_from(v).map_err(|_| {
                    E::custom(crate::Error::MalformedId {
                        input: v.to_string(),
                    })
                })?;
                self.visit_u64(raw)
            }
        }

        d.deserialize_any(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_EPOCH, DecodedId};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct NativeRow {
        #[serde(with = "as_native")]
        event_id: SnowflakeId,
    }

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct StringRow {
        #[serde(with = "as_decimal_str")]
        event_id: SnowflakeId,
    }

    #[test]
    fn native_roundtrip() {
        let row = NativeRow {
            event_id: SnowflakeId::from_raw(42),
        };
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":42}"#);
        let back: NativeRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_rejects_reserved_bit() {
        let err = serde_json::from_value::<NativeRow>(json!({"event_id": u64::MAX}))
            .expect_err("should fail");
        assert!(err.to_string().contains("malformed id"));
    }

    #[test]
    fn transparent_derive_is_native() {
        let id = SnowflakeId::from_components(1, 2, 3);
        assert_eq!(serde_json::to_value(id).unwrap(), json!(id.to_raw()));
    }

    #[test]
    fn decimal_str_roundtrip() {
        let id = SnowflakeId::from_components(SnowflakeId::MAX_TIMESTAMP, 1023, 4095);
        let row = StringRow { event_id: id };
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"event_id":"9223372036854775807"}"#);
        let back: StringRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn decimal_str_accepts_integers() {
        let row: StringRow = serde_json::from_value(json!({"event_id": 42})).unwrap();
        assert_eq!(row.event_id, SnowflakeId::from_raw(42));
    }

    #[test]
    fn decimal_str_rejects_malformed() {
        for bad in [
            json!({"event_id": "-1"}),
            json!({"event_id": "abc"}),
            json!({"event_id": ""}),
            json!({"event_id": -1}),
            json!({"event_id": 1.5}),
            json!({"event_id": "18446744073709551615"}),
        ] {
            assert!(serde_json::from_value::<StringRow>(bad.clone()).is_err(), "{bad}");
        }
    }

    #[test]
    fn decoded_id_serializes_camel_case() {
        let decoded = crate::decode(SnowflakeId::from_components(123, 5, 1).to_raw(), DEFAULT_EPOCH);
        assert_eq!(
            serde_json::to_value(decoded).unwrap(),
            json!({"timestamp": 1_700_000_000_123_u64, "machineId": 5, "sequence": 1})
        );
        let back: DecodedId = serde_json::from_value(serde_json::to_value(decoded).unwrap()).unwrap();
        assert_eq!(back, decoded);
    }
}
