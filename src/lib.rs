//! Band inventories of Earth-observation products resolved into ordered
//! tables of generic band names, source locations and resolutions.
//!
//! ```no_run
//! use eobands::{BandResolver, Inventory, ResolveOptions};
//!
//! let inventory = Inventory::open("data/LC09_L2SP_194027_20230512_20230514_02_T1")?;
//! let resolved = BandResolver::default().resolve(
//!     &inventory,
//!     Some(&["blue", "green", "red", "B5"]),
//!     ResolveOptions::default(),
//! )?;
//! for band in &resolved.bands {
//!     println!("{} {} {:?}", band.name, band.location, band.resolution);
//! }
//! # Ok::<(), eobands::EobandsError>(())
//! ```

mod components;
pub mod config;
mod errors;
pub mod quality;
pub mod sensors;

pub use components::{
    build_descriptor_table, list_available_bands, normalized_available_bands, resolve_selection,
    Asset, AssetInventory, BandDescriptor, BandResolver, Inventory, Location, ResolveOptions,
    ResolvedBands, ResolverError, SasTokenSigner, SignUrl, SigningError, Unsigned,
};
pub use config::{Settings, StacProvider};
pub use errors::{EobandsError, Result};
pub use sensors::{BandKind, Landsat, Sensor};
