pub mod band;
pub mod inventory;
pub mod resolver;
pub mod signing;

pub use band::{BandDescriptor, Location};
pub use inventory::{Asset, AssetInventory, Inventory};
pub use resolver::{
    build_descriptor_table, list_available_bands, normalized_available_bands, resolve_selection,
    BandResolver, ResolveOptions, ResolvedBands, ResolverError,
};
pub use signing::{SasTokenSigner, SignUrl, SigningError, Unsigned};
