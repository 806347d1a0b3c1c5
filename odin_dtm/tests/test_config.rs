/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use odin_dtm::{load_config, CogOptions, DtmConfig, ExporterKind, OdinDtmError, OutputFormat, TilerConfig};

// run with "cargo test test_xx -- --nocapture"

#[test]
fn test_shipped_configs() {
    let cog: DtmConfig = load_config("dtm_cog.ron").unwrap();
    assert_eq!( cog.output_suffix, "_merged");
    assert_eq!( cog.target_srs.as_deref(), Some("EPSG:3857"));
    assert_eq!( cog.output, OutputFormat::Cog( CogOptions::default()));

    let plain: DtmConfig = load_config("dtm_plain.ron").unwrap();
    assert_eq!( plain.output, OutputFormat::GTiff);
    assert!( plain.target_srs.is_none());
    assert_eq!( plain.catalog.max_items, Some(2));

    let tiles: TilerConfig = load_config("dtm_tiles.ron").unwrap();
    assert_eq!( tiles.tile_srs, "EPSG:3979");
    assert_eq!( tiles.cog, CogOptions::default());
    assert_eq!( tiles.exporter, ExporterKind::External{ cmd: "gdalwarp".to_string() });
    assert!( tiles.check().is_ok());

    assert!( load_config::<DtmConfig>("surely_not_there.ron").is_err());
}

#[test]
fn test_tiler_config_check() {
    let mut config: TilerConfig = load_config("dtm_tiles.ron").unwrap();

    config.tile_size = 0.0;
    assert!( config.check().is_err());

    config.tile_size = 5000.0;
    config.resolution = Some(-1.0);
    assert!( config.check().is_err());

    config.resolution = Some(2.0);
    assert!( config.check().is_ok());

    // the grid needs a projected SRS, and this is known before any catalog access
    config.tile_srs = "EPSG:4326".to_string();
    assert!( matches!( config.check(), Err(OdinDtmError::InvalidConfigError(_))));

    config.tile_srs = "no such SRS".to_string();
    assert!( matches!( config.check(), Err(OdinDtmError::InvalidConfigError(_))));

    config.tile_srs = "EPSG:3857".to_string();
    assert!( config.check().is_ok());
}

#[test]
fn test_cog_creation_options() {
    let opts = CogOptions::default().creation_options();
    let names: Vec<&str> = opts.iter().map(|(k,_)| *k).collect();
    assert_eq!( names, vec!["COMPRESS", "PREDICTOR", "BLOCKSIZE", "OVERVIEW_RESAMPLING", "BIGTIFF", "NUM_THREADS"]);
    assert!( opts.contains( &("PREDICTOR", "2".to_string())));
}
