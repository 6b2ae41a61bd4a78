//! Strongly-typed company profile identifier.
//!
//! # Examples
//!
//! ```
//! use icp_core::id::ProfileId;
//! use std::str::FromStr;
//!
//! let id_str = "42b581ec-7aa8-4eba-9e48-e94c6bf36afa";
//! let id = ProfileId::from_str(id_str).unwrap();
//! assert_eq!(id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// The company profile targeted when no identifier is given.
pub const DEFAULT_PROFILE_ID: &str = "42b581ec-7aa8-4eba-9e48-e94c6bf36afa";

// Must spell the same UUID as DEFAULT_PROFILE_ID.
const DEFAULT_PROFILE_UUID: Uuid = Uuid::from_u128(0x42b581ec_7aa8_4eba_9e48_e94c6bf36afa);

/// Primary key of a row in the `company_profiles` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Create an identifier from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// The identifier of the profile the ICP report is normally written to.
    pub const fn default_target() -> Self {
        Self(DEFAULT_PROFILE_UUID)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProfileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| Error::InvalidId(format!("{s}: {e}")))
    }
}

impl From<Uuid> for ProfileId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
