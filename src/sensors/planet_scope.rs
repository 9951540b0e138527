use std::sync::LazyLock;

use crate::sensors::{BandEntry, BandTable, Sensor};

pub const GAIN_FACTOR: f64 = 0.0001;

static SUPER_DOVE: [BandEntry; 8] = [
    BandEntry::new("B01", "coastal_blue", 3),
    BandEntry::new("B02", "blue", 3),
    BandEntry::new("B03", "green_i", 3),
    BandEntry::new("B04", "green", 3),
    BandEntry::new("B05", "yellow", 3),
    BandEntry::new("B06", "red", 3),
    BandEntry::new("B07", "rededge", 3),
    BandEntry::new("B08", "nir", 3),
];

static SUPER_DOVE_TABLE: LazyLock<BandTable> = LazyLock::new(|| BandTable::new(&SUPER_DOVE));

/// PlanetScope SuperDove (PSB.SD) eight band instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperDove;

impl Sensor for SuperDove {
    fn name(&self) -> &'static str {
        "PSB.SD"
    }

    fn spectral_bands(&self) -> &'static BandTable {
        &SUPER_DOVE_TABLE
    }
}
