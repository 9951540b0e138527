use std::{collections::HashMap, fmt::Debug, sync::LazyLock};

pub mod landsat;
pub mod planet_scope;
pub mod sentinel2;

pub use landsat::{Landsat, LandsatScene};
pub use planet_scope::SuperDove;
pub use sentinel2::{Sentinel2, Sentinel2Scene};

#[derive(thiserror::Error, Debug)]
pub enum SceneNameError {
    #[error("Scene name {0:?} does not follow the expected naming convention")]
    MalformedName(String),
    #[error("Could not determine processing level for {0:?}")]
    UnknownProcessingLevel(String),
    #[error("Invalid timestamp in scene name: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
}

/// Static description of one band of a sensor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandEntry {
    /// Sensor specific code as found in file or asset names, e.g. `B4`.
    pub code: &'static str,
    /// Generic name shared across sensors, e.g. `red`.
    pub name: &'static str,
    /// Native spatial resolution in metres.
    pub resolution: u32,
}

impl BandEntry {
    pub const fn new(code: &'static str, name: &'static str, resolution: u32) -> Self {
        Self {
            code,
            name,
            resolution,
        }
    }
}

/// Ordered band entries with forward (code) and reverse (name) lookups.
///
/// Built once per sensor family, see [BandTable::new].
#[derive(Debug)]
pub struct BandTable {
    entries: &'static [BandEntry],
    by_code: HashMap<&'static str, usize>,
    by_name: HashMap<&'static str, usize>,
}

impl BandTable {
    pub fn new(entries: &'static [BandEntry]) -> Self {
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.code, idx))
            .collect();
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.name, idx))
            .collect();
        Self {
            entries,
            by_code,
            by_name,
        }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &'static [BandEntry] {
        self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn by_code(&self, code: &str) -> Option<&'static BandEntry> {
        self.by_code.get(code).map(|idx| &self.entries[*idx])
    }

    pub fn by_name(&self, name: &str) -> Option<&'static BandEntry> {
        self.by_name.get(name).map(|idx| &self.entries[*idx])
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) static EMPTY_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&[]));

/// Role of a band within a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    Spectral,
    Quality,
    AtmosphericCorrection,
    Unknown,
}

/// Band layout of a sensor family.
pub trait Sensor: Debug {
    fn name(&self) -> &'static str;

    /// Reflectance (and thermal) bands.
    fn spectral_bands(&self) -> &'static BandTable;

    fn quality_bands(&self) -> &'static BandTable {
        &EMPTY_TABLE
    }

    fn atmospheric_correction_bands(&self) -> &'static BandTable {
        &EMPTY_TABLE
    }

    /// Tables in lookup precedence order.
    fn tables(&self) -> [(BandKind, &'static BandTable); 3] {
        [
            (BandKind::Spectral, self.spectral_bands()),
            (BandKind::Quality, self.quality_bands()),
            (BandKind::AtmosphericCorrection, self.atmospheric_correction_bands()),
        ]
    }

    /// Generic name of a raw identifier, if it is a known sensor specific code.
    fn generic_name(&self, raw: &str) -> Option<&'static str> {
        self.tables()
            .into_iter()
            .find_map(|(_, table)| table.by_code(raw))
            .map(|entry| entry.name)
    }

    /// Sensor specific code of a generic band name.
    fn sensor_code(&self, name: &str) -> Option<&'static str> {
        self.tables()
            .into_iter()
            .find_map(|(_, table)| table.by_name(name))
            .map(|entry| entry.code)
    }

    fn kind(&self, name: &str) -> BandKind {
        self.tables()
            .into_iter()
            .find(|(_, table)| table.contains_name(name))
            .map_or(BandKind::Unknown, |(kind, _)| kind)
    }

    /// Native resolution in metres, absent for bands outside all tables.
    fn resolution(&self, name: &str) -> Option<u32> {
        self.tables()
            .into_iter()
            .find_map(|(_, table)| table.by_name(name))
            .map(|entry| entry.resolution)
    }
}
