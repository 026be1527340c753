use hex::ToHex;
use ring::digest::Digest;
use serde::{
    de::{Error, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use utoipa::{
    openapi::{Object, RefOr, Schema, SchemaType},
    ToSchema,
};

/// The primary identity of a certificate: the SHA-256 digest over its raw
/// bytes, rendered as 64 lowercase hex characters.
///
/// Uppercase input is accepted and normalized, so audit paths and storage
/// keys derived from a fingerprint are always lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn sha256(digest: &Digest) -> Self {
        Self(digest.encode_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("empty fingerprint")]
    Empty,
    #[error("invalid fingerprint length {0}, expected 64 hex characters")]
    Length(usize),
    #[error("invalid fingerprint character {0:?}")]
    Character(char),
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(FingerprintError::Empty);
        }
        if value.len() != 64 {
            return Err(FingerprintError::Length(value.len()));
        }
        if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(FingerprintError::Character(c));
        }

        Ok(Self(value.to_lowercase()))
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'__s> ToSchema<'__s> for Fingerprint {
    fn schema() -> (&'__s str, RefOr<Schema>) {
        let mut obj = Object::with_type(SchemaType::String);
        obj.description = Some("The SHA-256 digest of a certificate, as lowercase hex.".to_string());
        obj.example = Some(Value::String(
            "dc60aeb735c16a71b6fc56e84ddb8193e3a6d1ef0b7e958d77e78fc039a5d04e".to_string(),
        ));

        ("Fingerprint", RefOr::T(Schema::Object(obj)))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(FingerprintVisitor)
    }
}

struct FingerprintVisitor;

impl<'de> Visitor<'de> for FingerprintVisitor {
    type Value = Fingerprint;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a SHA-256 fingerprint in hex")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Fingerprint::from_str(v).map_err(|e| E::custom(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::{Fingerprint, FingerprintError};
    use serde_json::json;
    use std::str::FromStr;

    const FINGERPRINT: &str = "a591a6d40bf420404a011733cfb7b190d62c65bf0bcda32b57b277d9ad9f146e";

    #[test]
    fn parse() -> Result<(), anyhow::Error> {
        let fingerprint = Fingerprint::from_str(FINGERPRINT)?;
        assert_eq!(fingerprint.as_str(), FINGERPRINT);
        Ok(())
    }

    #[test]
    fn normalizes_case() -> Result<(), anyhow::Error> {
        let fingerprint = Fingerprint::from_str(&FINGERPRINT.to_uppercase())?;
        assert_eq!(fingerprint.as_str(), FINGERPRINT);
        Ok(())
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Fingerprint::from_str(""),
            Err(FingerprintError::Empty)
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Fingerprint::from_str("a591a6"),
            Err(FingerprintError::Length(6))
        ));
    }

    #[test]
    fn rejects_non_hex() {
        let input = format!("x{}", &FINGERPRINT[1..]);
        assert!(matches!(
            Fingerprint::from_str(&input),
            Err(FingerprintError::Character('x'))
        ));
    }

    #[test]
    fn deserialize() -> Result<(), anyhow::Error> {
        let fingerprint: Fingerprint = serde_json::from_value(json!(FINGERPRINT))?;
        assert_eq!(fingerprint, Fingerprint::from_str(FINGERPRINT)?);

        assert!(serde_json::from_value::<Fingerprint>(json!("not-hex")).is_err());

        Ok(())
    }

    #[test]
    fn serialize() -> Result<(), anyhow::Error> {
        let fingerprint = Fingerprint::from_str(FINGERPRINT)?;
        let raw = serde_json::to_string(&fingerprint)?;
        assert_eq!(raw, format!("\"{FINGERPRINT}\""));
        Ok(())
    }
}
