use eobands::{
    build_descriptor_table, resolve_selection, Asset, AssetInventory, BandKind, BandResolver,
    EobandsError, Inventory, Landsat, Location, ResolveOptions, ResolverError, Settings, Unsigned,
};
use std::fs;
use tempfile::TempDir;

const PRODUCT: &str = "LC08_L2SP_194027_20230504_20230509_02_T1";

fn remote_inventory(keys: &[&str]) -> Inventory {
    Inventory::Assets(AssetInventory::from_iter(keys.iter().enumerate().map(
        |(idx, key)| (*key, Asset::new(format!("https://host/{PRODUCT}_loc{}.TIF", idx + 1))),
    )))
}

const NO_SUPPLEMENTS: ResolveOptions = ResolveOptions {
    include_qa: false,
    include_atmospheric_correction: false,
};

#[test_log::test]
fn sensor_codes_resolve_to_generic_table() {
    let inventory = remote_inventory(&["B1", "B2", "B3", "B4", "B5", "B6", "qa"]);
    let sensor = Landsat::OperationalLandImager;
    let settings = Settings::default();

    let selection = resolve_selection(
        &inventory,
        &sensor,
        Some(&["B1", "B2", "B3", "B4", "B5", "B6", "qa"]),
        NO_SUPPLEMENTS,
        &settings,
    )
    .unwrap();
    assert_eq!(
        selection,
        ["coastal", "blue", "green", "red", "nir08", "swir16", "qa"]
    );

    let table = build_descriptor_table(&inventory, &selection, &sensor, &settings, &Unsigned).unwrap();
    assert_eq!(table.len(), 7);
    for (idx, row) in table.iter().enumerate() {
        assert_eq!(row.name, selection[idx]);
        assert_eq!(row.resolution, Some(30));
        assert_eq!(
            row.location,
            Location::Url(format!("https://host/{PRODUCT}_loc{}.TIF", idx + 1))
        );
    }
    assert_eq!(table[3].alias.as_deref(), Some("B4"));
    assert_eq!(table[6].kind, BandKind::Quality);
}

#[test]
fn quality_band_names_are_not_interchangeable() {
    let inventory = remote_inventory(&["B1", "B2", "qa_pixel"]);
    let result = resolve_selection(
        &inventory,
        &Landsat::OperationalLandImager,
        Some(&["B1", "qa"]),
        NO_SUPPLEMENTS,
        &Settings::default(),
    );
    assert!(matches!(result, Err(ResolverError::BandNotFound(band)) if band == "qa"));
}

#[test_log::test]
fn default_selection_covers_whole_inventory() {
    let inventory = remote_inventory(&["B2", "B3", "B4", "B5", "qa_pixel", "qa_radsat", "MTL.json"]);
    let settings = Settings {
        reference_band: "B2".into(),
        ..Settings::default()
    };
    let resolved = BandResolver::new(settings)
        .resolve(&inventory, None, ResolveOptions::default())
        .unwrap();
    assert_eq!(resolved.sensor, Landsat::OperationalLandImager);
    assert_eq!(
        resolved.names().collect::<Vec<_>>(),
        ["blue", "green", "red", "nir08", "qa_pixel", "qa_radsat"]
    );
    assert!(resolved.bands[..4].iter().all(|band| band.kind == BandKind::Spectral));
}

#[test]
fn quality_bands_are_appended_once() {
    let inventory = remote_inventory(&["B1", "B2", "qa_radsat", "qa_pixel"]);
    let selection = resolve_selection(
        &inventory,
        &Landsat::OperationalLandImager,
        Some(&["qa_pixel", "B2"]),
        ResolveOptions::default(),
        &Settings::default(),
    )
    .unwrap();
    assert_eq!(selection, ["qa_pixel", "blue", "qa_radsat"]);
}

#[test_log::test]
fn thematic_mapper_directory_with_atmospheric_correction() {
    let dir = TempDir::new().unwrap();
    let product = "LT05_L2SP_194027_19960513_20200911_02_T1";
    for suffix in [
        "SR_B1", "SR_B2", "SR_B3", "SR_B4", "SR_B5", "ST_B6", "SR_B7", "QA_PIXEL", "QA_RADSAT",
        "ST_ATRAN", "ST_CDIST", "ST_DRAD",
    ] {
        fs::write(dir.path().join(format!("{product}_{suffix}.TIF")), b"").unwrap();
    }
    fs::write(dir.path().join(format!("{product}_MTL.txt")), b"").unwrap();

    let inventory = Inventory::open(dir.path()).unwrap();
    let resolved = BandResolver::default()
        .resolve(
            &inventory,
            Some(&["red", "lwir"]),
            ResolveOptions {
                include_qa: true,
                include_atmospheric_correction: true,
            },
        )
        .unwrap();

    assert_eq!(resolved.sensor, Landsat::ThematicMapper);
    assert_eq!(
        resolved.names().collect::<Vec<_>>(),
        ["red", "lwir", "cdist", "drad", "atran", "qa_pixel", "qa_radsat"]
    );
    let lwir = resolved.get("lwir").unwrap();
    assert_eq!(lwir.resolution, Some(120));
    assert_eq!(
        lwir.location,
        Location::Path(dir.path().join(format!("{product}_ST_B6.TIF")))
    );
    let cdist = resolved.get("cdist").unwrap();
    assert_eq!(cdist.kind, BandKind::AtmosphericCorrection);
    assert_eq!(
        cdist.location,
        Location::Path(dir.path().join(format!("{product}_ST_CDIST.TIF")))
    );
}

#[test_log::test]
fn full_thematic_mapper_level2_product() {
    let dir = TempDir::new().unwrap();
    let product = "LT05_L2SP_194027_19960513_20200911_02_T1";
    for suffix in [
        "SR_B1", "SR_B2", "SR_B3", "SR_B4", "SR_B5", "SR_B7", "ST_B6", "QA_PIXEL", "QA_RADSAT",
        "SR_ATMOS_OPACITY", "SR_CLOUD_QA", "ST_ATRAN", "ST_CDIST", "ST_DRAD", "ST_EMIS",
        "ST_EMSD", "ST_QA", "ST_TRAD", "ST_URAD",
    ] {
        fs::write(dir.path().join(format!("{product}_{suffix}.TIF")), b"").unwrap();
    }
    let inventory = Inventory::open(dir.path()).unwrap();
    let resolver = BandResolver::default();

    let resolved = resolver
        .resolve(&inventory, Some(&["red"]), ResolveOptions::default())
        .unwrap();
    assert_eq!(
        resolved.names().collect::<Vec<_>>(),
        ["red", "qa_pixel", "qa_radsat", "qa", "cloud_qa"]
    );
    for (name, suffix) in [("qa", "ST_QA"), ("cloud_qa", "SR_CLOUD_QA")] {
        let band = resolved.get(name).unwrap();
        assert_eq!(band.kind, BandKind::Quality);
        assert_eq!(
            band.location,
            Location::Path(dir.path().join(format!("{product}_{suffix}.TIF")))
        );
    }

    let resolved = resolver
        .resolve(
            &inventory,
            Some(&["red", "lwir"]),
            ResolveOptions {
                include_qa: false,
                include_atmospheric_correction: true,
            },
        )
        .unwrap();
    assert_eq!(
        resolved.names().collect::<Vec<_>>(),
        ["red", "lwir", "cdist", "drad", "emis", "emsd", "trad", "urad", "atran", "atmos_opacity"]
    );
    assert_eq!(
        resolved.get("atmos_opacity").unwrap().location,
        Location::Path(dir.path().join(format!("{product}_SR_ATMOS_OPACITY.TIF")))
    );
}

#[test]
fn unsupported_platform_aborts_resolution() {
    let inventory = Inventory::Assets(AssetInventory::from_iter([(
        "blue",
        Asset::new("https://host/LX06_L2SP_194027_19931005_20200911_02_T1_SR_B1.TIF"),
    )]));
    let result = BandResolver::default().resolve(&inventory, None, ResolveOptions::default());
    assert!(matches!(
        result,
        Err(EobandsError::Resolver(ResolverError::UnsupportedPlatform(platform))) if platform == "LANDSAT_6"
    ));
}

#[test]
fn directory_inventory_must_be_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("LC08_SR_B1.TIF");
    fs::write(&file, b"").unwrap();
    assert!(matches!(
        Inventory::open(&file),
        Err(ResolverError::InvalidInventoryKind(_))
    ));
}
