//! Serde models mirroring the REST Countries JSON payload.

use serde::{Deserialize, Serialize};

/// One element of the upstream country array.
///
/// Unknown fields are ignored; missing required fields fail the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: CountryName,
    pub flags: FlagImages,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagImages {
    pub svg: String,
}
