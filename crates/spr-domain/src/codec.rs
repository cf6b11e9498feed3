//! Capability codec
//!
//! Bidirectional mapping between a [`ServiceOffering`] and the ordered
//! key/value string pairs the registry stores. Recognized fields are
//! driven by a registry of field codecs, one entry per stable capability
//! key, so new product schemas extend the table instead of hard-coding
//! positional fields.
//!
//! Schema v1 stores every numeric capability value as a decimal string
//! constrained to an unsigned 64-bit integer. Absent optional values are
//! normalized to the empty string rather than omitted, so every
//! recognized key is present once an offering has been encoded.

use crate::error::{Error, Result};
use crate::keys;
use crate::types::{Address, ServiceOffering};
use std::collections::{HashMap, HashSet};

/// One recognized capability field: a stable key plus its encode/decode
/// pair. The decoded default is the field's zero value, supplied by
/// `ServiceOffering::default()`.
pub struct FieldCodec {
    /// Stable capability key this codec owns
    pub key: &'static str,
    encode: fn(&ServiceOffering) -> Result<String>,
    decode: fn(&mut ServiceOffering, &str) -> Result<()>,
}

/// Registry of recognized capability fields, in canonical encode order
static FIELD_CODECS: [FieldCodec; 9] = [
    FieldCodec {
        key: keys::CAP_SERVICE_URL,
        encode: |o| {
            if o.service_url.is_empty() {
                return Err(Error::encoding(keys::CAP_SERVICE_URL, "required field is empty"));
            }
            Ok(o.service_url.clone())
        },
        decode: |o, v| {
            o.service_url = v.to_string();
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_MIN_PIECE_SIZE,
        encode: |o| Ok(o.min_piece_size.to_string()),
        decode: |o, v| {
            o.min_piece_size = decode_u64(keys::CAP_MIN_PIECE_SIZE, v)?;
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_MAX_PIECE_SIZE,
        encode: |o| Ok(o.max_piece_size.to_string()),
        decode: |o, v| {
            o.max_piece_size = decode_u64(keys::CAP_MAX_PIECE_SIZE, v)?;
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_STORAGE_PRICE,
        encode: |o| encode_u128(keys::CAP_STORAGE_PRICE, o.storage_price_per_tib_per_month),
        decode: |o, v| {
            o.storage_price_per_tib_per_month =
                u128::from(decode_u64(keys::CAP_STORAGE_PRICE, v)?);
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_MIN_PROVING_PERIOD,
        encode: |o| Ok(o.min_proving_period_epochs.to_string()),
        decode: |o, v| {
            o.min_proving_period_epochs = decode_u64(keys::CAP_MIN_PROVING_PERIOD, v)?;
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_LOCATION,
        encode: |o| Ok(o.location.clone()),
        decode: |o, v| {
            o.location = v.to_string();
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_PAYMENT_TOKEN,
        encode: |o| {
            if o.payment_token.is_zero() {
                Ok(String::new())
            } else {
                Ok(o.payment_token.to_string())
            }
        },
        decode: |o, v| {
            o.payment_token = decode_address(keys::CAP_PAYMENT_TOKEN, v)?;
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_IPNI_PIECE,
        encode: |o| Ok(encode_bool(o.ipni_piece)),
        decode: |o, v| {
            o.ipni_piece = decode_bool(keys::CAP_IPNI_PIECE, v)?;
            Ok(())
        },
    },
    FieldCodec {
        key: keys::CAP_IPNI_IPFS,
        encode: |o| Ok(encode_bool(o.ipni_ipfs)),
        decode: |o, v| {
            o.ipni_ipfs = decode_bool(keys::CAP_IPNI_IPFS, v)?;
            Ok(())
        },
    },
];

/// The recognized capability field codecs, in canonical encode order
pub fn field_codecs() -> &'static [FieldCodec] {
    &FIELD_CODECS
}

/// Whether a capability key belongs to the recognized schema
pub fn is_recognized_key(key: &str) -> bool {
    FIELD_CODECS.iter().any(|c| c.key == key)
}

/// Capability pairs decoded back into structured form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedCapabilities {
    /// Every pair as stored, recognized and extension keys alike
    pub pairs: HashMap<String, String>,

    /// Typed view of the recognized subset
    pub offering: ServiceOffering,
}

/// Encode an offering plus extension capabilities into ordered key/value
/// pairs suitable for on-chain storage
///
/// Emits one pair per recognized field (absent optional values become
/// the empty string), then one pair per extension entry in the given
/// order. Fails when a required field is missing, a numeric field
/// exceeds the schema's 64-bit domain, or an extension key collides with
/// a recognized key or another extension (keys are unique per product).
pub fn encode_offering(
    offering: &ServiceOffering,
    extra: &[(String, String)],
) -> Result<(Vec<String>, Vec<String>)> {
    let mut cap_keys = Vec::with_capacity(FIELD_CODECS.len() + extra.len());
    let mut cap_values = Vec::with_capacity(FIELD_CODECS.len() + extra.len());

    for codec in &FIELD_CODECS {
        cap_keys.push(codec.key.to_string());
        cap_values.push((codec.encode)(offering)?);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(extra.len());
    for (key, value) in extra {
        if is_recognized_key(key) {
            return Err(Error::encoding(
                key.clone(),
                "extension key collides with a recognized capability key",
            ));
        }
        if !seen.insert(key.as_str()) {
            return Err(Error::encoding(key.clone(), "duplicate extension key"));
        }
        cap_keys.push(key.clone());
        cap_values.push(value.clone());
    }

    Ok((cap_keys, cap_values))
}

/// Decode index-aligned capability arrays back into structured form
///
/// Unknown keys pass through into the pair map untouched; missing
/// recognized keys leave their offering field at the zero value. Fails
/// only on mismatched array lengths (a protocol violation) or a
/// malformed value for a recognized key.
pub fn decode_capabilities(keys: &[String], values: &[String]) -> Result<DecodedCapabilities> {
    if keys.len() != values.len() {
        return Err(Error::decoding_protocol(format!(
            "capability arrays are not index-aligned: {} keys, {} values",
            keys.len(),
            values.len()
        )));
    }

    let mut decoded = DecodedCapabilities {
        pairs: HashMap::with_capacity(keys.len()),
        offering: ServiceOffering::default(),
    };

    for (key, value) in keys.iter().zip(values) {
        if let Some(codec) = FIELD_CODECS.iter().find(|c| c.key == key) {
            (codec.decode)(&mut decoded.offering, value)?;
        }
        decoded.pairs.insert(key.clone(), value.clone());
    }

    Ok(decoded)
}

fn encode_u128(key: &'static str, value: u128) -> Result<String> {
    if value > u128::from(u64::MAX) {
        return Err(Error::encoding(
            key,
            format!("value {value} exceeds the schema's 64-bit numeric domain"),
        ));
    }
    Ok(value.to_string())
}

fn encode_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

fn decode_u64(key: &'static str, raw: &str) -> Result<u64> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| Error::decoding(key, format!("malformed unsigned integer '{raw}'")))
}

fn decode_bool(key: &'static str, raw: &str) -> Result<bool> {
    match raw {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        other => Err(Error::decoding(key, format!("malformed boolean '{other}'"))),
    }
}

fn decode_address(key: &'static str, raw: &str) -> Result<Address> {
    if raw.is_empty() {
        return Ok(Address::ZERO);
    }
    raw.parse()
        .map_err(|_| Error::decoding(key, format!("malformed address '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_offering() -> ServiceOffering {
        ServiceOffering {
            service_url: "https://provider.example/api".to_string(),
            min_piece_size: 127,
            max_piece_size: 34_091_302_912,
            storage_price_per_tib_per_month: 5_000_000_000,
            min_proving_period_epochs: 2880,
            location: "eu-west".to_string(),
            payment_token: "0x00000000000000000000000000000000000000cc"
                .parse()
                .expect("valid address"),
            ipni_piece: true,
            ipni_ipfs: false,
        }
    }

    #[test]
    fn round_trip_reproduces_every_recognized_field() {
        let offering = full_offering();
        let (keys, values) = encode_offering(&offering, &[]).expect("encode");
        let decoded = decode_capabilities(&keys, &values).expect("decode");
        assert_eq!(decoded.offering, offering);
    }

    #[test]
    fn extension_pairs_round_trip_exactly() {
        let extra = vec![
            ("region".to_string(), "nordics".to_string()),
            ("tier".to_string(), String::new()),
        ];
        let (keys, values) = encode_offering(&full_offering(), &extra).expect("encode");
        let decoded = decode_capabilities(&keys, &values).expect("decode");
        assert_eq!(decoded.pairs.get("region").map(String::as_str), Some("nordics"));
        assert_eq!(decoded.pairs.get("tier").map(String::as_str), Some(""));
    }

    #[test]
    fn every_recognized_key_present_after_encoding() {
        let mut offering = full_offering();
        offering.location = String::new();
        offering.payment_token = Address::ZERO;
        let (keys, values) = encode_offering(&offering, &[]).expect("encode");
        for codec in field_codecs() {
            let idx = keys.iter().position(|k| k == codec.key);
            assert!(idx.is_some(), "key {} missing", codec.key);
            if codec.key == crate::keys::CAP_LOCATION || codec.key == crate::keys::CAP_PAYMENT_TOKEN
            {
                assert_eq!(values[idx.unwrap()], "");
            }
        }
    }

    #[test]
    fn missing_required_field_fails_encoding() {
        let offering = ServiceOffering::default();
        let err = encode_offering(&offering, &[]).expect_err("must fail");
        match err {
            Error::Encoding { key, .. } => {
                assert_eq!(key.as_deref(), Some(crate::keys::CAP_SERVICE_URL));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn price_outside_numeric_domain_fails_encoding() {
        let mut offering = full_offering();
        offering.storage_price_per_tib_per_month = u128::from(u64::MAX) + 1;
        let err = encode_offering(&offering, &[]).expect_err("must fail");
        match err {
            Error::Encoding { key, .. } => {
                assert_eq!(key.as_deref(), Some(crate::keys::CAP_STORAGE_PRICE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn colliding_extension_key_fails_encoding() {
        let extra = vec![(crate::keys::CAP_LOCATION.to_string(), "mars".to_string())];
        assert!(encode_offering(&full_offering(), &extra).is_err());
    }

    #[test]
    fn duplicate_extension_key_fails_encoding() {
        let extra = vec![
            ("region".to_string(), "a".to_string()),
            ("region".to_string(), "b".to_string()),
        ];
        assert!(encode_offering(&full_offering(), &extra).is_err());
    }

    #[test]
    fn unknown_keys_never_fail_decoding() {
        let keys = vec!["somethingNew".to_string(), "another".to_string()];
        let values = vec!["!!!not-a-number!!!".to_string(), String::new()];
        let decoded = decode_capabilities(&keys, &values).expect("unknown keys tolerated");
        assert_eq!(decoded.offering, ServiceOffering::default());
        assert_eq!(decoded.pairs.len(), 2);
    }

    #[test]
    fn malformed_recognized_value_names_the_key() {
        let keys = vec![crate::keys::CAP_MIN_PIECE_SIZE.to_string()];
        let values = vec!["not-a-number".to_string()];
        let err = decode_capabilities(&keys, &values).expect_err("must fail");
        match err {
            Error::Decoding { key, .. } => {
                assert_eq!(key.as_deref(), Some(crate::keys::CAP_MIN_PIECE_SIZE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_lengths_fail_closed() {
        let keys = vec![crate::keys::CAP_SERVICE_URL.to_string()];
        let err = decode_capabilities(&keys, &[]).expect_err("must fail");
        assert!(matches!(err, Error::Decoding { key: None, .. }));
    }

    #[test]
    fn missing_recognized_keys_decode_to_zero_values() {
        // The documented scenario: only three keys present, location
        // absent, offering falls back to zero values elsewhere.
        let keys = vec![
            crate::keys::CAP_SERVICE_URL.to_string(),
            crate::keys::CAP_MIN_PIECE_SIZE.to_string(),
            crate::keys::CAP_MAX_PIECE_SIZE.to_string(),
        ];
        let values = vec![
            "https://x".to_string(),
            "127".to_string(),
            "34091302912".to_string(),
        ];
        let decoded = decode_capabilities(&keys, &values).expect("decode");
        assert_eq!(decoded.offering.service_url, "https://x");
        assert_eq!(decoded.offering.min_piece_size, 127);
        assert_eq!(decoded.offering.max_piece_size, 34_091_302_912);
        assert_eq!(decoded.offering.location, "");
        assert_eq!(decoded.offering.payment_token, Address::ZERO);
        assert!(!decoded.offering.ipni_piece);
    }

    #[test]
    fn empty_numeric_value_decodes_to_zero() {
        let keys = vec![crate::keys::CAP_STORAGE_PRICE.to_string()];
        let values = vec![String::new()];
        let decoded = decode_capabilities(&keys, &values).expect("decode");
        assert_eq!(decoded.offering.storage_price_per_tib_per_month, 0);
    }
}
