use chrono::NaiveDateTime;
use std::{fmt, sync::LazyLock};

use crate::{
    components::{inventory::Inventory, resolver::ResolverError},
    errors::Result,
    sensors::{BandEntry, BandTable, SceneNameError, Sensor, EMPTY_TABLE},
};

/// Stored integers times this gain give reflectance factors.
pub const GAIN_FACTOR: f64 = 0.0001;

/// Reflectance offset applied from PDGS processing baseline N0400 onwards.
pub const BASELINE_OFFSET: f64 = -1000.;

/// Codes excluded from the default selection (60 m atmospheric bands).
const EXCLUDED_BY_DEFAULT: [&str; 2] = ["B01", "B09"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingLevel {
    L1C,
    L2A,
}

impl ProcessingLevel {
    /// Reads the level from a `.SAFE` name or STAC collection id.
    pub fn from_name(name: &str) -> std::result::Result<Self, SceneNameError> {
        if name.contains("MSIL1C") || name.contains("l1c") {
            Ok(ProcessingLevel::L1C)
        } else if name.contains("MSIL2A") || name.contains("l2a") {
            Ok(ProcessingLevel::L2A)
        } else {
            Err(SceneNameError::UnknownProcessingLevel(name.into()))
        }
    }
}

impl fmt::Display for ProcessingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingLevel::L1C => f.write_str("Level-1C"),
            ProcessingLevel::L2A => f.write_str("Level-2A"),
        }
    }
}

static MSI: [BandEntry; 12] = [
    BandEntry::new("B01", "ultra_blue", 60),
    BandEntry::new("B02", "blue", 10),
    BandEntry::new("B03", "green", 10),
    BandEntry::new("B04", "red", 10),
    BandEntry::new("B05", "red_edge_1", 20),
    BandEntry::new("B06", "red_edge_2", 20),
    BandEntry::new("B07", "red_edge_3", 20),
    BandEntry::new("B08", "nir_1", 10),
    BandEntry::new("B8A", "nir_2", 20),
    BandEntry::new("B09", "nir_3", 60),
    BandEntry::new("B11", "swir_1", 20),
    BandEntry::new("B12", "swir_2", 20),
];

static SCENE_CLASSIFICATION: [BandEntry; 1] = [BandEntry::new("SCL", "scl", 20)];

static MSI_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&MSI));
static SCENE_CLASSIFICATION_TABLE: LazyLock<BandTable> =
    LazyLock::new(|| BandTable::new(&SCENE_CLASSIFICATION));

/// Sentinel-2 MSI at a given processing level.
///
/// The scene classification layer (`SCL`) is the QA band of L2A products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sentinel2 {
    pub level: ProcessingLevel,
}

impl Sensor for Sentinel2 {
    fn name(&self) -> &'static str {
        "MSI"
    }

    fn spectral_bands(&self) -> &'static BandTable {
        &MSI_TABLE
    }

    fn quality_bands(&self) -> &'static BandTable {
        match self.level {
            ProcessingLevel::L1C => &EMPTY_TABLE,
            ProcessingLevel::L2A => &SCENE_CLASSIFICATION_TABLE,
        }
    }
}

impl Sentinel2 {
    pub fn new(level: ProcessingLevel) -> Self {
        Self { level }
    }

    /// Sensor of the product a STAC asset inventory belongs to, read from
    /// the `.SAFE` name in the `B01` asset href.
    ///
    /// `.SAFE` directories nest their rasters under `GRANULE/` and name them
    /// `*_B04_10m.jp2`, which directory inventories cannot resolve, so they
    /// are rejected.
    pub fn detect(inventory: &Inventory) -> Result<Self> {
        let asset = match inventory {
            Inventory::Assets(assets) => assets
                .get("B01")
                .ok_or_else(|| SceneNameError::MalformedName("B01".into()))?,
            Inventory::Directory(dir) => {
                return Err(ResolverError::InvalidInventoryKind(dir.display().to_string()).into())
            }
        };
        let name = safe_name_from_url(&asset.href)?;
        Ok(Self::new(ProcessingLevel::from_name(name)?))
    }

    /// Generic names read when no selection is given: all bands but the
    /// 60 m atmospheric ones.
    pub fn default_selection(&self) -> Vec<&'static str> {
        MSI.iter()
            .filter(|entry| !EXCLUDED_BY_DEFAULT.contains(&entry.code))
            .map(|entry| entry.name)
            .collect()
    }
}

/// Properties encoded in a `.SAFE` product name such as
/// `S2B_MSIL2A_20241126T093239_N0511_R136_T33PTM_20241126T120342.SAFE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentinel2Scene {
    /// `S2A`, `S2B` or `S2C`
    pub platform: String,
    pub processing_level: ProcessingLevel,
    pub acquisition_time: NaiveDateTime,
    /// PDGS processing baseline, e.g. 511 for `N0511`.
    pub processing_baseline: u16,
    pub product_uri: String,
}

impl Sentinel2Scene {
    pub fn from_safe_name(safe_name: &str) -> Result<Self> {
        let segments: Vec<&str> = safe_name.split('_').collect();
        if segments.len() < 4 || !segments[0].starts_with("S2") {
            return Err(SceneNameError::MalformedName(safe_name.into()).into());
        }
        let processing_level = ProcessingLevel::from_name(safe_name)?;
        let acquisition_time = NaiveDateTime::parse_from_str(segments[2], "%Y%m%dT%H%M%S")
            .map_err(SceneNameError::from)?;
        let processing_baseline = segments[3]
            .strip_prefix('N')
            .and_then(|baseline| baseline.parse().ok())
            .ok_or_else(|| SceneNameError::MalformedName(safe_name.into()))?;
        Ok(Self {
            platform: segments[0].to_string(),
            processing_level,
            acquisition_time,
            processing_baseline,
            product_uri: safe_name.to_string(),
        })
    }

    /// Gain and offset converting stored integers to reflectance factors,
    /// `reflectance = (dn + offset) * gain`.
    pub fn scaling(&self) -> (f64, f64) {
        let offset = if self.processing_baseline >= 400 {
            BASELINE_OFFSET
        } else {
            0.
        };
        (GAIN_FACTOR, offset)
    }
}

/// `.SAFE` product name contained in an asset href.
pub fn safe_name_from_url(href: &str) -> std::result::Result<&str, SceneNameError> {
    href.split('/')
        .find(|part| part.starts_with("S2") && part.ends_with(".SAFE"))
        .ok_or_else(|| SceneNameError::MalformedName(href.into()))
}
