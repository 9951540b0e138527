use itertools::Itertools;
use log::{debug, info};
use std::{collections::HashSet, fmt::Debug, path::Path};

use crate::{
    components::{
        band::{BandDescriptor, Location},
        inventory::{stem_ends_with_code, Inventory},
        signing::{SignUrl, Unsigned},
    },
    config::Settings,
    errors::Result,
    sensors::{BandTable, Landsat, Sensor},
};

#[derive(thiserror::Error, Debug)]
pub enum ResolverError {
    #[error("Inventory {0} is neither an asset mapping nor a directory")]
    InvalidInventoryKind(String),
    #[error("Reference band {0} required to detect the platform is missing")]
    MissingReferenceBand(String),
    #[error("Platform {0} is not supported")]
    UnsupportedPlatform(String),
    #[error("Band {0} is neither a generic nor a sensor specific band name")]
    BandNotFound(String),
    #[error("No unique source found for band {0}")]
    SourceLocationNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supplementary bands appended to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub include_qa: bool,
    pub include_atmospheric_correction: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_qa: true,
            include_atmospheric_correction: false,
        }
    }
}

/// Raw band identifiers of `inventory`, see [Inventory::available_bands].
pub fn list_available_bands(
    inventory: &Inventory,
    settings: &Settings,
) -> std::result::Result<Vec<String>, ResolverError> {
    inventory.available_bands(settings)
}

/// Available bands with sensor specific codes replaced by generic names.
///
/// Identifiers without a mapping are kept as they are. Local files are
/// matched on the longest sensor code their name ends with, so `..._ST_QA`
/// and `..._SR_CLOUD_QA` stay apart. Keeps inventory order.
pub fn normalized_available_bands<S: Sensor + ?Sized>(
    inventory: &Inventory,
    sensor: &S,
    settings: &Settings,
) -> std::result::Result<Vec<String>, ResolverError> {
    let raw = match inventory {
        Inventory::Assets(_) => list_available_bands(inventory, settings)?,
        Inventory::Directory(_) => inventory
            .raster_files(settings)?
            .into_iter()
            .map(|(segment, path)| match longest_matching_code(sensor, &path) {
                Some(code) => code.to_string(),
                None => segment,
            })
            .collect(),
    };
    Ok(raw
        .into_iter()
        .map(|raw| match sensor.generic_name(&raw) {
            Some(generic) => generic.to_string(),
            None => raw,
        })
        .unique()
        .collect())
}

fn longest_matching_code<S: Sensor + ?Sized>(sensor: &S, path: &Path) -> Option<&'static str> {
    sensor
        .tables()
        .into_iter()
        .flat_map(|(_, table)| table.entries())
        .map(|entry| entry.code)
        .filter(|code| stem_ends_with_code(path, code))
        .max_by_key(|code| code.len())
}

/// Ordered, duplicate free selection of generic band names.
///
/// Without `requested` every available band is selected in inventory order.
/// Requested names keep the caller's order; sensor specific codes are
/// translated. Atmospheric correction and then QA bands present in the
/// inventory are appended in their declaration order when asked for.
pub fn resolve_selection<S: Sensor + ?Sized>(
    inventory: &Inventory,
    sensor: &S,
    requested: Option<&[&str]>,
    options: ResolveOptions,
    settings: &Settings,
) -> std::result::Result<Vec<String>, ResolverError> {
    let available = normalized_available_bands(inventory, sensor, settings)?;
    let available_set: HashSet<&str> = available.iter().map(String::as_str).collect();

    let mut selection: Vec<String> = match requested {
        None => available.clone(),
        Some(requested) => {
            let mut selection = Vec::with_capacity(requested.len());
            for band in requested {
                let name = if available_set.contains(band) {
                    *band
                } else {
                    match sensor.generic_name(band) {
                        Some(generic) if available_set.contains(generic) => {
                            debug!("translated {band} to {generic}");
                            generic
                        }
                        _ => return Err(ResolverError::BandNotFound(band.to_string())),
                    }
                };
                if !selection.iter().any(|selected| selected == name) {
                    selection.push(name.to_string());
                }
            }
            selection
        }
    };

    if options.include_atmospheric_correction {
        append_available(&mut selection, &available_set, sensor.atmospheric_correction_bands());
    }
    if options.include_qa {
        append_available(&mut selection, &available_set, sensor.quality_bands());
    }
    Ok(selection)
}

fn append_available(selection: &mut Vec<String>, available: &HashSet<&str>, table: &BandTable) {
    for name in table.names() {
        if available.contains(name) && !selection.iter().any(|selected| selected == name) {
            debug!("appending {name}");
            selection.push(name.to_string());
        }
    }
}

/// One [BandDescriptor] per selected band, in selection order.
///
/// Remote hrefs are signed when the configured provider requires it.
pub fn build_descriptor_table<S: Sensor + ?Sized>(
    inventory: &Inventory,
    selection: &[String],
    sensor: &S,
    settings: &Settings,
    signer: &dyn SignUrl,
) -> Result<Vec<BandDescriptor>> {
    selection
        .iter()
        .map(|name| -> Result<BandDescriptor> {
            let spectral_code = sensor.spectral_bands().by_name(name).map(|entry| entry.code);
            let location = match inventory {
                Inventory::Assets(_) => {
                    let href = spectral_code
                        .and_then(|code| inventory.location_of(code))
                        .or_else(|| inventory.location_of(name))
                        .ok_or_else(|| ResolverError::SourceLocationNotFound(name.clone()))?;
                    let href = if settings.stac_provider.requires_signing() {
                        signer.sign(href)?
                    } else {
                        href.to_string()
                    };
                    Location::Url(href)
                }
                Inventory::Directory(_) => {
                    // Codes are re-derived here, so the file must be unique.
                    let code = sensor.sensor_code(name).unwrap_or(name.as_str());
                    let path = inventory
                        .files_with_code(code, settings)?
                        .into_iter()
                        .exactly_one()
                        .map_err(|_| ResolverError::SourceLocationNotFound(name.clone()))?;
                    Location::Path(path)
                }
            };
            Ok(BandDescriptor {
                name: name.clone(),
                alias: spectral_code.map(String::from),
                location,
                resolution: sensor.resolution(name),
                kind: sensor.kind(name),
            })
        })
        .collect()
}

/// Bands resolved for one product.
pub struct ResolvedBands<S: Sensor> {
    pub sensor: S,
    pub bands: Vec<BandDescriptor>,
}

impl<S: Sensor> Debug for ResolvedBands<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBands")
            .field("sensor", &self.sensor)
            .field("bands", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<S: Sensor> ResolvedBands<S> {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|band| band.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&BandDescriptor> {
        self.bands.iter().find(|band| band.name == name)
    }
}

/// Settings and signer shared by resolutions.
#[derive(Debug)]
pub struct BandResolver {
    settings: Settings,
    signer: Box<dyn SignUrl>,
}

impl Default for BandResolver {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl BandResolver {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            signer: Box::new(Unsigned),
        }
    }

    pub fn with_signer(mut self, signer: impl SignUrl + 'static) -> Self {
        self.signer = Box::new(signer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detect_sensor(&self, inventory: &Inventory) -> std::result::Result<Landsat, ResolverError> {
        Landsat::detect(inventory, &self.settings)
    }

    /// Detects the Landsat sensor and resolves the band table.
    pub fn resolve(
        &self,
        inventory: &Inventory,
        requested: Option<&[&str]>,
        options: ResolveOptions,
    ) -> Result<ResolvedBands<Landsat>> {
        let sensor = self.detect_sensor(inventory)?;
        self.resolve_with(inventory, sensor, requested, options)
    }

    /// Resolves the band table for a known sensor.
    pub fn resolve_with<S: Sensor>(
        &self,
        inventory: &Inventory,
        sensor: S,
        requested: Option<&[&str]>,
        options: ResolveOptions,
    ) -> Result<ResolvedBands<S>> {
        let selection = resolve_selection(inventory, &sensor, requested, options, &self.settings)?;
        let bands = build_descriptor_table(
            inventory,
            &selection,
            &sensor,
            &self.settings,
            self.signer.as_ref(),
        )?;
        let resolved = ResolvedBands { sensor, bands };
        info!("resolved {resolved:?}");
        Ok(resolved)
    }
}
