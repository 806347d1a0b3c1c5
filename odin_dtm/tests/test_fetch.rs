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
use geo::BoundingRect;
use ndarray::Array2;
use tempfile::tempdir;

use odin_common::BoundingBox;
use odin_gdal::{srs_epsg, srs_epsg_4326, srs_from_wkt, transform_bounds_2d, transform_polygon};
use odin_dtm::{Aoi, GdalRasterSource, OutputFormat, RasterSource, RasterTile};
use odin_dtm::reproject::reproject_tile;
use odin_dtm::writer::write_tile;

// run with "cargo test test_xx -- --nocapture"

const OTTAWA_JSON: &str = r#"{
    "type": "Feature", "properties": {},
    "geometry": { "type": "Polygon", "coordinates": [[[-75.75,45.38],[-75.65,45.38],[-75.65,45.44],[-75.75,45.44],[-75.75,45.38]]] }
}"#;

const VANCOUVER_JSON: &str = r#"{
    "type": "Polygon", "coordinates": [[[-123.20,49.25],[-123.00,49.25],[-123.00,49.35],[-123.20,49.35],[-123.20,49.25]]]
}"#;

const RES: f64 = 20.0;
const MARGIN: f64 = 1000.0;
const NO_DATA: f32 = -32767.0;

/// bounds of the AOI polygon in EPSG:3979 (Canada Atlas Lambert)
fn projected_bounds (aoi: &Aoi) -> BoundingBox<f64> {
    let polygon = transform_polygon( &srs_epsg_4326().unwrap(), &srs_epsg(3979).unwrap(), &aoi.polygon).unwrap();
    BoundingBox::from_rect( &polygon.bounding_rect().unwrap())
}

/// EPSG:3979 raster that covers `bbox` plus a margin. Pixel values are 100 + column index
fn source_tile (bbox: &BoundingBox<f64>) -> RasterTile {
    let west = ((bbox.west - MARGIN) / RES).floor() * RES;
    let north = ((bbox.north + MARGIN) / RES).ceil() * RES;
    let cols = ((bbox.east + MARGIN - west) / RES).ceil() as usize;
    let rows = ((north - bbox.south + MARGIN) / RES).ceil() as usize;

    let wkt = srs_epsg(3979).unwrap().to_wkt().unwrap();
    let data = Array2::from_shape_fn( (rows,cols), |(_,c)| 100.0 + c as f32);
    RasterTile::new( data, [west, RES, 0.0, north, 0.0, -RES], wkt, NO_DATA)
}

fn assert_within (actual: &BoundingBox<f64>, expected: &BoundingBox<f64>, tol: f64) {
    assert!( (actual.west - expected.west).abs() <= tol, "west {} vs {}", actual.west, expected.west);
    assert!( (actual.south - expected.south).abs() <= tol, "south {} vs {}", actual.south, expected.south);
    assert!( (actual.east - expected.east).abs() <= tol, "east {} vs {}", actual.east, expected.east);
    assert!( (actual.north - expected.north).abs() <= tol, "north {} vs {}", actual.north, expected.north);
}

fn epsg_code (wkt: &str) -> i32 {
    srs_from_wkt( wkt).unwrap().auth_code().unwrap()
}

#[test]
fn test_fetch_clipped_projected_raster() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ottawa_3979.tif");

    let aoi = Aoi::from_json_str( "ottawa", OTTAWA_JSON).unwrap();
    let aoi_bounds = projected_bounds( &aoi);
    println!("AOI in EPSG:3979: {aoi_bounds:?}");

    let src = source_tile( &aoi_bounds);
    write_tile( &src, &path, &OutputFormat::GTiff).unwrap();

    let tile = GdalRasterSource::new().fetch_clipped( path.to_str().unwrap(), &aoi).unwrap().expect("AOI should intersect raster");
    println!("clipped: {}x{} {:?}", tile.width(), tile.height(), tile.bounds());

    // lon/lat AOI ends up on the projected grid, within one pixel of its bounds
    assert_within( &tile.bounds(), &aoi_bounds, RES);
    assert_eq!( epsg_code( &tile.srs_wkt), 3979);
    assert_eq!( tile.pixel_size(), (RES, -RES));
    assert_eq!( tile.no_data, NO_DATA);
    assert!( tile.valid_count() > 0);

    // values are read from the right source window
    let c0 = ((tile.geo_transform[0] - src.geo_transform[0]) / RES).round() as usize;
    for ((_,c), v) in tile.data.indexed_iter() {
        if !tile.is_no_data( *v) { assert_eq!( *v, 100.0 + (c0 + c) as f32) }
    }
}

#[test]
fn test_fetch_clipped_geographic_raster() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ottawa_4326.tif");
    let aoi = Aoi::from_json_str( "ottawa", OTTAWA_JSON).unwrap();

    // 0.001 deg pixels, 0.01 deg beyond the AOI on each side
    let res = 0.001;
    let wkt = srs_epsg_4326().unwrap().to_wkt().unwrap();
    let src = RasterTile::new( Array2::from_elem( (80,120), 55.0), [-75.76, res, 0.0, 45.45, 0.0, -res], wkt, NO_DATA);
    write_tile( &src, &path, &OutputFormat::GTiff).unwrap();

    let tile = GdalRasterSource::new().fetch_clipped( path.to_str().unwrap(), &aoi).unwrap().expect("AOI should intersect raster");
    println!("clipped: {}x{} {:?}", tile.width(), tile.height(), tile.bounds());

    // geo transforms are x=lon,y=lat even though the SRS axis order is lat,lon
    assert_within( &tile.bounds(), &aoi.bounding_box(), res);
    assert_eq!( epsg_code( &tile.srs_wkt), 4326);
    assert_eq!( tile.valid_count(), tile.width() * tile.height());
}

#[test]
fn test_fetch_no_overlap() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ottawa_3979.tif");

    let ottawa = Aoi::from_json_str( "ottawa", OTTAWA_JSON).unwrap();
    write_tile( &source_tile( &projected_bounds( &ottawa)), &path, &OutputFormat::GTiff).unwrap();

    let vancouver = Aoi::from_json_str( "vancouver", VANCOUVER_JSON).unwrap();
    let res = GdalRasterSource::new().fetch_clipped( path.to_str().unwrap(), &vancouver).unwrap();
    assert!( res.is_none());

    assert!( GdalRasterSource::new().fetch_clipped( tmp.path().join("missing.tif").to_str().unwrap(), &ottawa).is_err());
}

#[test]
fn test_reproject_tile() {
    // 50x50 EPSG:3979 tile in Ottawa with the western half being nodata
    let wkt = srs_epsg(3979).unwrap().to_wkt().unwrap();
    let data = Array2::from_shape_fn( (50,50), |(_,c)| if c < 25 { NO_DATA } else { 42.0 });
    let tile = RasterTile::new( data, [1_450_000.0, RES, 0.0, -40_000.0, 0.0, -RES], wkt, NO_DATA);

    let merc = reproject_tile( &tile, "EPSG:3857").unwrap();
    println!("reprojected: {}x{} {:?}", merc.width(), merc.height(), merc.bounds());

    assert_eq!( epsg_code( &merc.srs_wkt), 3857);
    assert_eq!( merc.no_data, NO_DATA);

    let n = merc.width() * merc.height();
    let valid = merc.valid_count();
    assert!( valid > 0 && valid < n);
    assert!( merc.data.iter().all(|v| *v == NO_DATA || *v == 42.0)); // nearest neighbour

    let expected = transform_bounds_2d( &srs_epsg(3979).unwrap(), &srs_epsg(3857).unwrap(), &tile.bounds(), None).unwrap();
    let (rx, _) = merc.pixel_size();
    assert_within( &merc.bounds(), &expected, 3.0 * rx);

    assert!( reproject_tile( &tile, "EPSG:999999").is_err());
}
