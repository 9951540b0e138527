use serde::Deserialize;
use std::{env, str::FromStr};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unknown STAC provider {0:?}, expected one of \"aws\", \"mspc\"")]
    UnknownProvider(String),
}

/// STAC service the remote asset inventories come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StacProvider {
    /// Earth Search by Element 84 on Amazon Web Services.
    #[default]
    Aws,
    /// Microsoft Planetary Computer. Hrefs must be signed before reading.
    #[serde(alias = "mspc")]
    PlanetaryComputer,
}

impl StacProvider {
    pub fn requires_signing(&self) -> bool {
        matches!(self, StacProvider::PlanetaryComputer)
    }
}

impl FromStr for StacProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "mspc" | "planetary_computer" => Ok(Self::PlanetaryComputer),
            other => Err(ConfigError::UnknownProvider(other.into())),
        }
    }
}

/// Settings that steer band resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stac_provider: StacProvider,
    /// Inventory key read to detect the platform of remote inventories.
    /// Landsat detection falls back to `green` when this key is absent.
    pub reference_band: String,
    /// File extensions (case-insensitive, without dot) treated as rasters
    /// when listing local directories.
    pub raster_extensions: Vec<String>,
    /// Asset keys that never hold band data.
    pub excluded_asset_keys: Vec<String>,
    /// Asset key suffixes of sidecar files.
    pub excluded_asset_suffixes: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stac_provider: StacProvider::default(),
            reference_band: "blue".into(),
            raster_extensions: vec!["tif".into(), "tiff".into(), "jp2".into()],
            excluded_asset_keys: vec!["tilejson".into(), "rendered_preview".into()],
            excluded_asset_suffixes: vec![".txt".into(), ".xml".into(), ".json".into()],
        }
    }
}

impl Settings {
    /// Reads `EOBANDS_STAC_PROVIDER`, `EOBANDS_REFERENCE_BAND` and
    /// `EOBANDS_RASTER_EXTENSIONS` (comma separated), keeping the defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Ok(provider) = env::var("EOBANDS_STAC_PROVIDER") {
            settings.stac_provider = provider.parse()?;
        }
        if let Ok(reference_band) = env::var("EOBANDS_REFERENCE_BAND") {
            settings.reference_band = reference_band;
        }
        if let Ok(extensions) = env::var("EOBANDS_RASTER_EXTENSIONS") {
            settings.raster_extensions = extensions
                .split(',')
                .map(|extension| extension.trim().trim_start_matches('.').to_string())
                .filter(|extension| !extension.is_empty())
                .collect();
        }
        Ok(settings)
    }

    pub fn is_raster_extension(&self, extension: &str) -> bool {
        self.raster_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }

    /// Whether a remote asset key names a sidecar or preview rather than a band.
    pub fn is_excluded_asset(&self, key: &str) -> bool {
        self.excluded_asset_keys.iter().any(|excluded| excluded == key)
            || self
                .excluded_asset_suffixes
                .iter()
                .any(|suffix| key.ends_with(suffix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("aws", StacProvider::Aws)]
    #[case("MSPC", StacProvider::PlanetaryComputer)]
    #[case(" planetary_computer ", StacProvider::PlanetaryComputer)]
    fn parses_provider(#[case] name: &str, #[case] expected: StacProvider) {
        assert_eq!(name.parse::<StacProvider>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(matches!(
            "usgs".parse::<StacProvider>(),
            Err(ConfigError::UnknownProvider(name)) if name == "usgs"
        ));
    }

    #[rstest]
    #[case("mtl.json", true)]
    #[case("ang.txt", true)]
    #[case("mtl.xml", true)]
    #[case("tilejson", true)]
    #[case("rendered_preview", true)]
    #[case("qa_pixel", false)]
    #[case("red", false)]
    fn excludes_sidecar_assets(#[case] key: &str, #[case] excluded: bool) {
        assert_eq!(Settings::default().is_excluded_asset(key), excluded);
    }

    #[test]
    fn raster_extensions_ignore_case() {
        let settings = Settings::default();
        assert!(settings.is_raster_extension("TIF"));
        assert!(settings.is_raster_extension("jp2"));
        assert!(!settings.is_raster_extension("xml"));
    }

    #[test]
    fn deserializes_partial_settings() {
        let settings: Settings =
            serde_json::from_str(r#"{"stac_provider": "mspc", "reference_band": "green"}"#)
                .unwrap();
        assert!(settings.stac_provider.requires_signing());
        assert_eq!(settings.reference_band, "green");
        assert_eq!(settings.raster_extensions.len(), 3);
    }
}
