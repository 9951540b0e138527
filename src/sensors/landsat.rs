use chrono::NaiveDate;
use log::info;
use std::{fmt, sync::LazyLock};

use crate::{
    components::{
        inventory::{is_band_code, Inventory},
        resolver::ResolverError,
    },
    config::Settings,
    errors::Result,
    sensors::{BandEntry, BandTable, SceneNameError, Sensor},
};

/// Landsat sensor families, keyed by the platform that carried them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landsat {
    /// MSS on Landsat 1 to 3.
    MultispectralScannerEarly,
    /// MSS on Landsat 4 and 5.
    MultispectralScannerLate,
    /// TM on Landsat 4 and 5.
    ThematicMapper,
    /// ETM+ on Landsat 7.
    EnhancedThematicMapperPlus,
    /// OLI/TIRS on Landsat 8 and 9.
    OperationalLandImager,
}

static MSS_EARLY: [BandEntry; 4] = [
    BandEntry::new("B4", "green", 80),
    BandEntry::new("B5", "red", 80),
    BandEntry::new("B6", "nir08", 80),
    BandEntry::new("B7", "nir09", 80),
];

static MSS_LATE: [BandEntry; 4] = [
    BandEntry::new("B1", "green", 80),
    BandEntry::new("B2", "red", 80),
    BandEntry::new("B3", "nir08", 80),
    BandEntry::new("B4", "nir09", 80),
];

static TM: [BandEntry; 7] = [
    BandEntry::new("B1", "blue", 30),
    BandEntry::new("B2", "green", 30),
    BandEntry::new("B3", "red", 30),
    BandEntry::new("B4", "nir08", 30),
    BandEntry::new("B5", "swir16", 30),
    BandEntry::new("B6", "lwir", 120),
    BandEntry::new("B7", "swir22", 30),
];

static ETM_PLUS: [BandEntry; 7] = [
    BandEntry::new("B1", "blue", 30),
    BandEntry::new("B2", "green", 30),
    BandEntry::new("B3", "red", 30),
    BandEntry::new("B4", "nir08", 30),
    BandEntry::new("B5", "swir16", 30),
    BandEntry::new("B6", "lwir", 60),
    BandEntry::new("B7", "swir22", 30),
];

static OLI: [BandEntry; 8] = [
    BandEntry::new("B1", "coastal", 30),
    BandEntry::new("B2", "blue", 30),
    BandEntry::new("B3", "green", 30),
    BandEntry::new("B4", "red", 30),
    BandEntry::new("B5", "nir08", 30),
    BandEntry::new("B6", "swir16", 30),
    BandEntry::new("B7", "swir22", 30),
    BandEntry::new("B10", "lwir11", 100),
];

// Codes are the file name suffixes of Collection 2 products, matched as whole
// `_` separated segments.
static QUALITY: [BandEntry; 5] = [
    BandEntry::new("QA_PIXEL", "qa_pixel", 30),
    BandEntry::new("SR_QA_AEROSOL", "qa_aerosol", 30),
    BandEntry::new("QA_RADSAT", "qa_radsat", 30),
    BandEntry::new("ST_QA", "qa", 30),
    BandEntry::new("SR_CLOUD_QA", "cloud_qa", 30),
];

static ATMOSPHERIC_CORRECTION: [BandEntry; 10] = [
    BandEntry::new("ST_CDIST", "cdist", 30),
    BandEntry::new("ST_DRAD", "drad", 30),
    BandEntry::new("ST_EMIS", "emis", 30),
    BandEntry::new("ST_EMSD", "emsd", 30),
    BandEntry::new("ST_LWIR", "lwir", 30),
    BandEntry::new("ST_TRAD", "trad", 30),
    BandEntry::new("ST_URAD", "urad", 30),
    BandEntry::new("ST_ATRAN", "atran", 30),
    BandEntry::new("SR_ATMOS_OPACITY", "atmos_opacity", 30),
    BandEntry::new("ANG", "ang", 30),
];

static MSS_EARLY_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&MSS_EARLY));
static MSS_LATE_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&MSS_LATE));
static TM_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&TM));
static ETM_PLUS_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&ETM_PLUS));
static OLI_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&OLI));
static QUALITY_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&QUALITY));
static ATMOSPHERIC_CORRECTION_TABLE: LazyLock<BandTable> =
    LazyLock::new(|| BandTable::new(&ATMOSPHERIC_CORRECTION));

impl Sensor for Landsat {
    fn name(&self) -> &'static str {
        match self {
            Landsat::MultispectralScannerEarly => "Multispectral_Scanner_System_L1-3",
            Landsat::MultispectralScannerLate => "Multispectral_Scanner_System_L4-5",
            Landsat::ThematicMapper => "Thematic_Mapper",
            Landsat::EnhancedThematicMapperPlus => "Enhanced_Thematic_Mapper_Plus",
            Landsat::OperationalLandImager => "Operational_Land_Imager",
        }
    }

    fn spectral_bands(&self) -> &'static BandTable {
        match self {
            Landsat::MultispectralScannerEarly => &MSS_EARLY_TABLE,
            Landsat::MultispectralScannerLate => &MSS_LATE_TABLE,
            Landsat::ThematicMapper => &TM_TABLE,
            Landsat::EnhancedThematicMapperPlus => &ETM_PLUS_TABLE,
            Landsat::OperationalLandImager => &OLI_TABLE,
        }
    }

    fn quality_bands(&self) -> &'static BandTable {
        &QUALITY_TABLE
    }

    fn atmospheric_correction_bands(&self) -> &'static BandTable {
        &ATMOSPHERIC_CORRECTION_TABLE
    }
}

impl fmt::Display for Landsat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Landsat {
    /// Sensor flown on `LANDSAT_<number>`.
    ///
    /// Landsat 4 and 5 carried both MSS and TM; Collection 2 science
    /// products of those platforms are TM.
    pub fn from_platform_number(number: u8) -> std::result::Result<Self, ResolverError> {
        match number {
            1..=3 => Ok(Landsat::MultispectralScannerEarly),
            4 | 5 => Ok(Landsat::ThematicMapper),
            7 => Ok(Landsat::EnhancedThematicMapperPlus),
            8 | 9 => Ok(Landsat::OperationalLandImager),
            _ => Err(ResolverError::UnsupportedPlatform(format!("LANDSAT_{number}"))),
        }
    }

    /// Reads the platform designator embedded at characters 2..4 of a
    /// product file name, e.g. `LC09_L2SP_...` is Landsat 9.
    pub fn from_file_name(file_name: &str) -> std::result::Result<Self, ResolverError> {
        let designator = file_name
            .get(2..4)
            .ok_or_else(|| ResolverError::UnsupportedPlatform(file_name.into()))?;
        let number = designator
            .parse::<u8>()
            .map_err(|_| ResolverError::UnsupportedPlatform(designator.into()))?;
        Self::from_platform_number(number)
    }

    /// Detects the sensor from the file name of the inventory's reference band.
    pub fn detect(
        inventory: &Inventory,
        settings: &Settings,
    ) -> std::result::Result<Self, ResolverError> {
        let file_name = reference_file_name(inventory, settings)?;
        let sensor = Self::from_file_name(&file_name)?;
        info!("detected {sensor} from {file_name}");
        Ok(sensor)
    }

    /// Whether products of this sensor are only distributed at Level-1.
    pub fn is_level1_only(&self) -> bool {
        matches!(
            self,
            Landsat::MultispectralScannerEarly | Landsat::MultispectralScannerLate
        )
    }

    /// Scene properties read from the inventory's reference band.
    pub fn scene(inventory: &Inventory, settings: &Settings) -> Result<LandsatScene> {
        let file_name = reference_file_name(inventory, settings)?;
        LandsatScene::from_file_name(&file_name)
    }

    /// Product URI of the scene an inventory belongs to.
    pub fn product_uri(inventory: &Inventory, settings: &Settings) -> Result<String> {
        Ok(Self::scene(inventory, settings)?.product_uri)
    }
}

/// Band every Landsat sensor carries, read when the configured reference
/// band is absent (MSS products have no `blue`).
const FALLBACK_REFERENCE_BAND: &str = "green";

/// File name of the band used to tell platforms apart.
///
/// Remote inventories use the configured reference key, then
/// [FALLBACK_REFERENCE_BAND]. Directories use the first raster whose
/// trailing segment is a `B<n>` band code.
fn reference_file_name(
    inventory: &Inventory,
    settings: &Settings,
) -> std::result::Result<String, ResolverError> {
    match inventory {
        Inventory::Assets(assets) => assets
            .get(&settings.reference_band)
            .or_else(|| assets.get(FALLBACK_REFERENCE_BAND))
            .map(|asset| asset.file_name().to_string())
            .ok_or_else(|| ResolverError::MissingReferenceBand(settings.reference_band.clone())),
        Inventory::Directory(dir) => inventory
            .raster_files(settings)?
            .into_iter()
            .find_map(|(code, path)| {
                is_band_code(&code)
                    .then(|| path.file_name().map(|name| name.to_string_lossy().into_owned()))
                    .flatten()
            })
            .ok_or_else(|| ResolverError::MissingReferenceBand(format!("{}/*_B*", dir.display()))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandsatProcessingLevel {
    L1,
    L2,
}

/// Properties of a Landsat scene derived from its Collection 2 file naming.
#[derive(Debug, Clone, PartialEq)]
pub struct LandsatScene {
    /// e.g. `LANDSAT_9`
    pub platform: String,
    pub sensor: Landsat,
    /// File name without the product type and band segments.
    pub product_uri: String,
    pub acquisition_date: NaiveDate,
    pub processing_level: LandsatProcessingLevel,
}

impl LandsatScene {
    /// Parses names like `LC09_L2SP_194027_20230512_20230514_02_T1_SR_B4.TIF`.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _)| stem);
        let segments: Vec<&str> = stem.split('_').collect();
        if segments.len() < 7 {
            return Err(SceneNameError::MalformedName(file_name.into()).into());
        }
        let sensor = Landsat::from_file_name(stem)?;
        let platform = format!("LANDSAT_{}", &stem[3..4]);
        let product_uri = segments[..segments.len() - 2].join("_");
        let acquisition_date =
            NaiveDate::parse_from_str(segments[3], "%Y%m%d").map_err(SceneNameError::from)?;
        let processing_level = if sensor.is_level1_only() {
            LandsatProcessingLevel::L1
        } else {
            LandsatProcessingLevel::L2
        };
        Ok(Self {
            platform,
            sensor,
            product_uri,
            acquisition_date,
            processing_level,
        })
    }

    /// Gain and offset converting stored integers of spectral bands to reflectance.
    pub fn scaling(&self) -> (f64, f64) {
        match self.processing_level {
            LandsatProcessingLevel::L1 => (1., 0.),
            LandsatProcessingLevel::L2 => (0.00001, 0.),
        }
    }
}
