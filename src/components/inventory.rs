use log::trace;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{components::resolver::ResolverError, config::Settings, errors::Result};

/// Remote asset of a STAC item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Asset {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Asset {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            media_type: None,
        }
    }

    /// Last path segment of the href, without any query string.
    pub fn file_name(&self) -> &str {
        let path = self.href.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Assets keyed by band identifier, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetInventory(Vec<(String, Asset)>);

impl<K: Into<String>> FromIterator<(K, Asset)> for AssetInventory {
    fn from_iter<I: IntoIterator<Item = (K, Asset)>>(iter: I) -> Self {
        let mut inventory = AssetInventory::default();
        for (key, asset) in iter {
            inventory.insert(key, asset);
        }
        inventory
    }
}

impl AssetInventory {
    /// Inserts or replaces the asset under `key`.
    pub fn insert(&mut self, key: impl Into<String>, asset: Asset) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => *existing = asset,
            None => self.0.push((key, asset)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Asset> {
        self.0
            .iter()
            .find_map(|(existing, asset)| (existing == key).then_some(asset))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw band inventory of one product.
#[derive(Debug, Clone, PartialEq)]
pub enum Inventory {
    /// Assets returned by a STAC query.
    Assets(AssetInventory),
    /// Local directory holding `*_<CODE>.<ext>` raster files.
    Directory(PathBuf),
}

impl From<AssetInventory> for Inventory {
    fn from(value: AssetInventory) -> Self {
        Self::Assets(value)
    }
}

impl Inventory {
    /// Directory inventory, the path must be an existing directory.
    pub fn open(path: impl AsRef<Path>) -> std::result::Result<Self, ResolverError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ResolverError::InvalidInventoryKind(path.display().to_string()));
        }
        Ok(Self::Directory(path.to_path_buf()))
    }

    /// Asset inventory from the `assets` object of a STAC item.
    pub fn from_stac_assets(assets: serde_json::Value) -> Result<Self> {
        let map = match assets {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(ResolverError::InvalidInventoryKind(json_kind(&other).into()).into())
            }
        };
        map.into_iter()
            .map(|(key, value)| -> Result<(String, Asset)> {
                Ok((key, serde_json::from_value(value)?))
            })
            .collect::<Result<AssetInventory>>()
            .map(Self::Assets)
    }

    /// Raw band identifiers of the inventory.
    ///
    /// Asset keys of sidecar files and previews are left out. For directories
    /// the identifier is the trailing `_` segment of each raster file name.
    pub fn available_bands(&self, settings: &Settings) -> std::result::Result<Vec<String>, ResolverError> {
        match self {
            Inventory::Assets(assets) => Ok(assets
                .keys()
                .filter(|key| {
                    let excluded = settings.is_excluded_asset(key);
                    if excluded {
                        trace!("dropping non-band asset {key}");
                    }
                    !excluded
                })
                .map(String::from)
                .collect()),
            Inventory::Directory(_) => Ok(self
                .raster_files(settings)?
                .into_iter()
                .map(|(code, _)| code)
                .collect()),
        }
    }

    /// Href of the asset under `key`. Directories have no keyed locations.
    pub fn location_of(&self, key: &str) -> Option<&str> {
        match self {
            Inventory::Assets(assets) => assets.get(key).map(|asset| asset.href.as_str()),
            Inventory::Directory(_) => None,
        }
    }

    /// Raster files whose stem ends with `code` as whole `_` segments, so
    /// `ST_QA` matches `..._ST_QA.TIF` but not `..._SR_CLOUD_QA.TIF`.
    pub fn files_with_code(
        &self,
        code: &str,
        settings: &Settings,
    ) -> std::result::Result<Vec<PathBuf>, ResolverError> {
        Ok(self
            .raster_files(settings)?
            .into_iter()
            .filter_map(|(_, path)| stem_ends_with_code(&path, code).then_some(path))
            .collect())
    }

    /// `(trailing segment, path)` of every raster file, ordered by file name.
    pub fn raster_files(
        &self,
        settings: &Settings,
    ) -> std::result::Result<Vec<(String, PathBuf)>, ResolverError> {
        let Inventory::Directory(dir) = self else {
            return Err(ResolverError::InvalidInventoryKind("asset mapping".into()));
        };
        if !dir.is_dir() {
            return Err(ResolverError::InvalidInventoryKind(dir.display().to_string()));
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_raster = path.is_file()
                && path
                    .extension()
                    .and_then(|extension| extension.to_str())
                    .is_some_and(|extension| settings.is_raster_extension(extension));
            if !is_raster {
                continue;
            }
            if let Some(code) = trailing_segment(&path) {
                files.push((code.to_string(), path));
            }
        }
        files.sort_by(|(_, lhs), (_, rhs)| lhs.file_name().cmp(&rhs.file_name()));
        Ok(files)
    }
}

/// Segment after the last `_` of the file stem, e.g. `B4` for `..._SR_B4.TIF`.
pub fn trailing_segment(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str()?.rsplit('_').next()
}

/// Whether the file stem is `code` or ends with `_<code>`.
pub(crate) fn stem_ends_with_code(path: &Path, code: &str) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| {
            stem == code || stem.strip_suffix(code).is_some_and(|rest| rest.ends_with('_'))
        })
}

/// Whether `code` looks like a numbered band code such as `B4` or `B10`.
pub(crate) fn is_band_code(code: &str) -> bool {
    code.strip_prefix('B')
        .is_some_and(|number| !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
