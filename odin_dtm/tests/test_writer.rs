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

use std::path::Path;
use ndarray::Array2;
use tempfile::tempdir;

use odin_gdal::{Dataset, Metadata, srs_epsg};
use odin_dtm::{CogOptions, OutputFormat, RasterTile};
use odin_dtm::writer::{StagedFile, write_tile};

// run with "cargo test test_xx -- --nocapture"

fn tile () -> RasterTile {
    let wkt = srs_epsg(3979).unwrap().to_wkt().unwrap();
    let data = Array2::from_shape_fn( (64,64), |(r,c)| if r < 8 { -32767.0 } else { 60.0 + c as f32 });
    RasterTile::new( data, [1_450_000.0, 2.0, 0.0, -40_000.0, 0.0, -2.0], wkt, -32767.0)
}

fn dir_entries (dir: &Path) -> Vec<String> {
    std::fs::read_dir( dir).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().to_string()).collect()
}

#[test]
fn test_write_cog() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("dtm_cog");
    let path = dir.join("ottawa_merged.tif");

    write_tile( &tile(), &path, &OutputFormat::Cog( CogOptions::default())).unwrap();

    let ds = Dataset::open( &path).unwrap();
    assert_eq!( ds.raster_size(), (64,64));
    assert_eq!( ds.geo_transform().unwrap(), [1_450_000.0, 2.0, 0.0, -40_000.0, 0.0, -2.0]);

    let compression = ds.metadata_item( "COMPRESSION", "IMAGE_STRUCTURE");
    let predictor = ds.metadata_item( "PREDICTOR", "IMAGE_STRUCTURE");
    let layout = ds.metadata_item( "LAYOUT", "IMAGE_STRUCTURE");
    println!("compression: {compression:?}, predictor: {predictor:?}, layout: {layout:?}");
    assert_eq!( compression.as_deref(), Some("DEFLATE"));
    assert_eq!( predictor.as_deref(), Some("2"));
    assert_eq!( layout.as_deref(), Some("COG"));

    let band = ds.rasterband(1).unwrap();
    assert_eq!( band.no_data_value(), Some(-32767.0));

    // no staging leftovers
    assert_eq!( dir_entries( &dir), vec!["ottawa_merged.tif".to_string()]);
}

#[test]
fn test_failed_write_leaves_no_file() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("dtm");
    let path = dir.join("broken.tif");

    let mut broken = tile();
    broken.srs_wkt = "not a WKT string".to_string();

    assert!( write_tile( &broken, &path, &OutputFormat::GTiff).is_err());
    assert!( !path.exists());
    assert!( dir_entries( &dir).is_empty());
}

#[test]
fn test_staged_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("tiles").join("tile_0.tif");

    // dropped without commit
    {
        let staged = StagedFile::new( &path).unwrap();
        assert_eq!( staged.staged_path().file_name(), path.file_name());
        std::fs::write( staged.staged_path(), b"partial").unwrap();
        assert!( !path.exists());
    }
    assert!( !path.exists());
    assert!( dir_entries( &tmp.path().join("tiles")).is_empty());

    // nothing written
    let staged = StagedFile::new( &path).unwrap();
    assert!( staged.commit().is_err());
    assert!( !path.exists());

    let staged = StagedFile::new( &path).unwrap();
    std::fs::write( staged.staged_path(), b"complete").unwrap();
    assert_eq!( staged.commit().unwrap(), path);
    assert_eq!( std::fs::read( &path).unwrap(), b"complete");
    assert_eq!( dir_entries( &tmp.path().join("tiles")), vec!["tile_0.tif".to_string()]);
}
