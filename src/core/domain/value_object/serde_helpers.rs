//! Serde helpers for Proxmox's integer booleans.
//!
//! The API reports and accepts flags as `0`/`1`. Some endpoints (and some
//! versions) answer with JSON booleans or numeric strings instead, so
//! deserialization accepts all three forms.

use serde::{Deserialize, Deserializer, Serializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn flag_to_bool<E: de::Error>(raw: RawFlag) -> Result<bool, E> {
    match raw {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Int(i) => Ok(i != 0),
        RawFlag::Text(s) => match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(E::custom(format!("invalid flag value '{}'", other))),
        },
    }
}

/// `bool` <-> `0`/`1`.
pub mod int_bool {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        flag_to_bool(RawFlag::deserialize(deserializer)?)
    }
}

/// `Option<bool>` <-> `0`/`1`; pair with `skip_serializing_if = "Option::is_none"`.
pub mod option_int_bool {
    use super::*;

    pub fn serialize<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(flag) => serializer.serialize_u8(u8::from(*flag)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawFlag>::deserialize(deserializer)?
            .map(flag_to_bool)
            .transpose()
    }
}
