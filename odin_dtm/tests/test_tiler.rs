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

use std::{path::PathBuf, sync::{Arc, Mutex, atomic::{AtomicUsize, Ordering}}};
use async_trait::async_trait;
use geo::{LineString, Polygon};
use tempfile::tempdir;

use odin_common::{BoundingBox, fs::EnvPathBuf};
use odin_dtm::{CatalogConfig, CogOptions, ExporterKind, OdinDtmError, Result, TileExporter, TileGrid, TileRequest, Tiler, TilerConfig};

// run with "cargo test test_xx -- --nocapture"

/// creates the tile file and records the request
#[derive(Clone,Default)]
struct RecordingExporter {
    requests: Arc<Mutex<Vec<TileRequest>>>,
}

impl RecordingExporter {
    fn count (&self) -> usize { self.requests.lock().unwrap().len() }
}

#[async_trait]
impl TileExporter for RecordingExporter {
    async fn export (&self, request: &TileRequest) -> Result<()> {
        std::fs::write( &request.path, b"tile")?;
        self.requests.lock().unwrap().push( request.clone());
        Ok(())
    }
}

/// writes (partial) tile files and fails on the export call with index `fail_at`
struct FailingExporter {
    fail_at: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl TileExporter for FailingExporter {
    async fn export (&self, request: &TileRequest) -> Result<()> {
        std::fs::write( &request.path, b"partial")?;
        if self.calls.fetch_add( 1, Ordering::SeqCst) == self.fail_at {
            Err( OdinDtmError::CommandError( "gdalwarp terminated with exit status 1".to_string()))
        } else {
            Ok(())
        }
    }
}

fn tiler_config (output_dir: &PathBuf, tile_size: f64, max_tiles: Option<usize>) -> TilerConfig {
    TilerConfig {
        catalog: CatalogConfig {
            api_url: "http://localhost/stac/".to_string(),
            collection: "dtm".to_string(),
            asset_key: "dtm".to_string(),
            max_items: None,
            page_limit: None,
            datetime: None,
        },
        aoi: EnvPathBuf::from( PathBuf::from("aoi.geojson")),
        output_dir: EnvPathBuf::from( output_dir.clone()),
        tile_prefix: "tile_".to_string(),
        tile_srs: "EPSG:3979".to_string(),
        tile_size,
        resolution: Some(2.0),
        cog: CogOptions::default(),
        exporter: ExporterKind::InProcess,
        max_tiles,
    }
}

fn square (side: f64) -> Polygon<f64> {
    let (x0, y0) = (1_000_000.0, 500_000.0);
    Polygon::new( LineString::from( vec![(x0,y0), (x0+side,y0), (x0+side,y0+side), (x0,y0+side), (x0,y0)]), vec![])
}

fn sources () -> Vec<String> {
    vec!["https://example.com/a/dtm.tif".to_string(), "https://example.com/b/dtm.tif".to_string()]
}

#[test]
fn test_grid() {
    let grid = TileGrid::new( &BoundingBox::new( 0.0, 0.0, 40000.0, 40000.0), 10000.0).unwrap();
    assert_eq!( (grid.cols, grid.rows, grid.len()), (4, 4, 16));

    // columns outer, rows inner
    let cells: Vec<(usize,usize)> = grid.cells().map(|c| (c.col, c.row)).collect();
    assert_eq!( &cells[0..5], &[(0usize,0usize), (0,1), (0,2), (0,3), (1,0)]);
    assert_eq!( grid.cell( 1, 2).bbox, BoundingBox::new( 10000.0, 20000.0, 20000.0, 30000.0));

    // partial tiles at the upper/right border
    let grid = TileGrid::new( &BoundingBox::new( 0.0, 0.0, 25000.0, 5000.0), 10000.0).unwrap();
    assert_eq!( (grid.cols, grid.rows), (3, 1));

    assert!( TileGrid::new( &BoundingBox::new( 0.0, 0.0, 1.0, 1.0), 0.0).is_err());
}

#[tokio::test]
async fn test_square_aoi() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("tiles");
    let exporter = RecordingExporter::default();
    let tiler = Tiler::new( tiler_config( &dir, 10000.0, None), exporter.clone());

    let stats = tiler.run( &square( 40000.0), &sources()).await.unwrap();
    println!("{stats:?}");
    assert_eq!( stats.cells, 16);
    assert_eq!( stats.intersecting, 16);
    assert_eq!( stats.exported, 16);
    assert_eq!( exporter.count(), 16);

    let requests = exporter.requests.lock().unwrap().clone();
    let first = &requests[0];
    assert_eq!( first.bbox, BoundingBox::new( 1_000_000.0, 500_000.0, 1_010_000.0, 510_000.0));
    assert_eq!( first.srs, "EPSG:3979");
    assert_eq!( first.sources, sources());
    assert_eq!( first.resolution, Some(2.0));
    assert_eq!( first.path, dir.join("tile_0.tif"));
    assert_eq!( requests[15].path, dir.join("tile_15.tif"));
}

#[tokio::test]
async fn test_rerun_skips_existing() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("tiles");
    let config = tiler_config( &dir, 10000.0, None);

    let stats = Tiler::new( config.clone(), RecordingExporter::default()).run( &square( 30000.0), &sources()).await.unwrap();
    assert_eq!( stats.exported, 9);

    let exporter = RecordingExporter::default();
    let stats = Tiler::new( config, exporter.clone()).run( &square( 30000.0), &sources()).await.unwrap();
    assert_eq!( stats.cells, 9);
    assert_eq!( stats.skipped, 9);
    assert_eq!( stats.exported, 0);
    assert_eq!( exporter.count(), 0);
}

#[tokio::test]
async fn test_max_tiles() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("tiles");
    let exporter = RecordingExporter::default();
    let tiler = Tiler::new( tiler_config( &dir, 10000.0, Some(3)), exporter.clone());

    let stats = tiler.run( &square( 40000.0), &sources()).await.unwrap();
    assert_eq!( stats.intersecting, 3);
    assert_eq!( stats.exported, 3);
    assert!( dir.join("tile_2.tif").is_file());
    assert!( !dir.join("tile_3.tif").exists());
}

#[tokio::test]
async fn test_triangle_aoi() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("tiles");
    let exporter = RecordingExporter::default();
    let tiler = Tiler::new( tiler_config( &dir, 10000.0, None), exporter.clone());

    let triangle = Polygon::new( LineString::from( vec![(0.0,0.0), (40000.0,0.0), (0.0,40000.0), (0.0,0.0)]), vec![]);
    let stats = tiler.run( &triangle, &sources()).await.unwrap();
    println!("{stats:?}");

    assert_eq!( stats.cells, 16);
    assert!( stats.intersecting >= 10 && stats.intersecting < 16);
    assert_eq!( stats.exported, stats.intersecting);

    // indices are contiguous over the intersecting cells
    for i in 0..stats.intersecting {
        assert!( dir.join( format!("tile_{i}.tif")).is_file());
    }
    assert!( !dir.join( format!("tile_{}.tif", stats.intersecting)).exists());
}

#[tokio::test]
async fn test_failed_export_is_redone() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("tiles");
    let config = tiler_config( &dir, 10000.0, None);

    let exporter = FailingExporter { fail_at: 4, calls: AtomicUsize::new(0) };
    let res = Tiler::new( config.clone(), exporter).run( &square( 30000.0), &sources()).await;
    assert!( matches!( res, Err(OdinDtmError::CommandError(_))));
    assert!( dir.join("tile_3.tif").is_file());
    assert!( !dir.join("tile_4.tif").exists());

    let exporter = RecordingExporter::default();
    let stats = Tiler::new( config, exporter.clone()).run( &square( 30000.0), &sources()).await.unwrap();
    println!("{stats:?}");
    assert_eq!( stats.skipped, 4);
    assert_eq!( stats.exported, 5);
    assert_eq!( exporter.requests.lock().unwrap()[0].path, dir.join("tile_4.tif"));
}
