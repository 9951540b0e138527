use serde::Serialize;
use std::{fmt, path::PathBuf};

use crate::sensors::BandKind;

/// Where the raster data of a band can be read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Url(String),
    Path(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => f.write_str(url),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One row of the table handed to raster loaders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandDescriptor {
    /// Generic band name, e.g. `red`.
    pub name: String,
    /// Sensor specific code of spectral bands, e.g. `B4`.
    pub alias: Option<String>,
    pub location: Location,
    /// Native resolution in metres.
    pub resolution: Option<u32>,
    pub kind: BandKind,
}

impl BandDescriptor {
    /// Whether loaders should apply reflectance scaling to this band.
    pub fn is_spectral(&self) -> bool {
        matches!(self.kind, BandKind::Spectral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_for_loaders() {
        let descriptor = BandDescriptor {
            name: "red".into(),
            alias: Some("B4".into()),
            location: Location::Url("https://host/B4.TIF".into()),
            resolution: Some(30),
            kind: BandKind::Spectral,
        };
        assert!(descriptor.is_spectral());
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            serde_json::json!({
                "name": "red",
                "alias": "B4",
                "location": {"url": "https://host/B4.TIF"},
                "resolution": 30,
                "kind": "spectral",
            })
        );
    }

    #[test]
    fn displays_location() {
        assert_eq!(Location::Path(PathBuf::from("/data/B4.TIF")).to_string(), "/data/B4.TIF");
    }
}
