use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;

/// Smallest VM id Proxmox VE hands out.
pub const MIN_VM_ID: u32 = 100;
/// Largest VM id Proxmox VE accepts.
pub const MAX_VM_ID: u32 = 999_999_999;

/// A guest identifier.
///
/// Proxmox reports VM ids as numbers on some endpoints and as strings on
/// others (storage content listings, for instance), so deserialization accepts
/// both. Equality is always numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VmId(u32);

impl VmId {
    /// Creates a VM id, rejecting values outside `100..=999999999`.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        validate_vm_id(value)?;
        Ok(Self(value))
    }

    /// Returns the numeric id.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns the HA service id for this guest (`vm:<id>`).
    #[must_use]
    pub fn ha_sid(&self) -> String {
        format!("vm:{}", self.0)
    }
}

impl From<u32> for VmId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for VmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for VmId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(Self)
                .map_err(|_| de::Error::custom(format!("invalid VM id '{}'", s))),
        }
    }
}

/// Validates a VM id against the range Proxmox accepts.
pub(crate) fn validate_vm_id(value: u32) -> Result<(), ValidationError> {
    if !(MIN_VM_ID..=MAX_VM_ID).contains(&value) {
        return Err(ValidationError::Field {
            field: "vmid".to_string(),
            message: format!(
                "VM id must be between {} and {} (got {})",
                MIN_VM_ID, MAX_VM_ID, value
            ),
        });
    }
    Ok(())
}
