//! Embedded catalog data.

use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

#[derive(RustEmbed)]
#[folder = "data/"]
struct CatalogAssets;

pub(crate) const DOCUMENTS_FILE: &str = "documents.json";
pub(crate) const SPECIES_FILE: &str = "species.json";
pub(crate) const SEASONS_FILE: &str = "seasons.json";

/// Decode an embedded JSON file.
pub(crate) fn load<T: DeserializeOwned>(file: &str) -> Result<T> {
    let asset = CatalogAssets::get(file).ok_or_else(|| Error::MissingAsset(file.to_string()))?;
    decode(file, &asset.data)
}

pub(crate) fn decode<T: DeserializeOwned>(file: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| Error::InvalidAsset {
        file: file.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset() {
        let err = load::<Vec<serde_json::Value>>("nope.json").unwrap_err();
        assert!(matches!(err, Error::MissingAsset(name) if name == "nope.json"));
    }

    #[test]
    fn test_invalid_asset_names_file() {
        let err = decode::<Vec<u32>>("broken.json", b"{not json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
