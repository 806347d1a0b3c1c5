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

//! cut a projected AOI into a regular grid of square tiles and export the tiles that intersect it.
//! Existing tile files are not overwritten, which makes re-runs incremental. This relies on tile files
//! only existing if their export succeeded. Note this is a plain existence check, concurrent runs on
//! the same output dir are not supported

use std::path::PathBuf;
use geo::{BoundingRect, Intersects, Polygon};
use tracing::{debug, info, warn};

use odin_common::{BoundingBox, fs::ensure_writable_dir};
use crate::config::TilerConfig;
use crate::export::{TileExporter, TileRequest};
use crate::errors::{Result, invalid_config, op_failed};

/// relative tolerance for extents that are (numerically) multiples of the tile size
const GRID_EPS: f64 = 1e-9;

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TileCell {
    pub col: usize,
    pub row: usize,
    pub bbox: BoundingBox<f64>,
}

/// grid of `tile_size` squares with origin at the (west,south) corner of the bounds
#[derive(Debug,Clone)]
pub struct TileGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub tile_size: f64,
    pub cols: usize,
    pub rows: usize,
}

impl TileGrid {
    pub fn new (bounds: &BoundingBox<f64>, tile_size: f64) -> Result<Self> {
        if !(tile_size > 0.0) { return Err( invalid_config( format!("invalid tile size {tile_size}"))) }
        if bounds.is_empty() { return Err( op_failed( format!("empty tiling bounds {bounds:?}"))) }

        Ok( TileGrid {
            origin_x: bounds.west,
            origin_y: bounds.south,
            tile_size,
            cols: grid_count( bounds.width(), tile_size),
            rows: grid_count( bounds.height(), tile_size),
        })
    }

    pub fn len (&self) -> usize { self.cols * self.rows }

    pub fn cell (&self, col: usize, row: usize) -> TileCell {
        let west = self.origin_x + col as f64 * self.tile_size;
        let south = self.origin_y + row as f64 * self.tile_size;
        TileCell { col, row, bbox: BoundingBox::new( west, south, west + self.tile_size, south + self.tile_size) }
    }

    /// all cells, columns in the outer and rows in the inner loop
    pub fn cells (&self) -> impl Iterator<Item=TileCell> + '_ {
        (0..self.cols).flat_map( move |col| (0..self.rows).map( move |row| self.cell( col, row)))
    }
}

/// number of tiles needed to cover `extent`. Exact multiples do not get an extra (empty) tile
fn grid_count (extent: f64, tile_size: f64) -> usize {
    let n = extent / tile_size;
    let rn = n.round();
    if (n - rn).abs() <= GRID_EPS * rn.max(1.0) {
        (rn as usize).max(1)
    } else {
        n.ceil() as usize
    }
}

#[derive(Debug,Default,Clone,Copy,PartialEq,Eq)]
pub struct TilingStats {
    /// grid cells tested for intersection
    pub cells: usize,
    /// cells that intersect the AOI (and got a tile index)
    pub intersecting: usize,
    /// intersecting cells for which the output file already existed
    pub skipped: usize,
    pub exported: usize,
}

pub struct Tiler<E: TileExporter> {
    config: TilerConfig,
    exporter: E,
}

impl<E: TileExporter> Tiler<E> {
    pub fn new (config: TilerConfig, exporter: E) -> Self {
        Tiler { config, exporter }
    }

    /// output path of the tile with (zero based) `index`
    pub fn tile_path (&self, index: usize) -> PathBuf {
        self.config.output_dir.join( format!("{}{}.tif", self.config.tile_prefix, index))
    }

    /// walk the grid of the (projected) `aoi` bounds and export all intersecting cells from `sources`.
    /// Tile indices are assigned to intersecting cells in walk order
    pub async fn run (&self, aoi: &Polygon<f64>, sources: &[String]) -> Result<TilingStats> {
        let rect = aoi.bounding_rect().ok_or( op_failed("empty AOI polygon"))?;
        let grid = TileGrid::new( &BoundingBox::from_rect( &rect), self.config.tile_size)?;
        ensure_writable_dir( &self.config.output_dir)?;
        info!("tiling {}x{} grid of {} tiles", grid.cols, grid.rows, self.config.tile_size);

        let mut stats = TilingStats::default();

        for cell in grid.cells() {
            stats.cells += 1;
            if !aoi.intersects( &cell.bbox.to_rect()) { continue }

            if let Some(max_tiles) = self.config.max_tiles {
                if stats.intersecting >= max_tiles {
                    info!("max_tiles {max_tiles} reached");
                    break
                }
            }

            let index = stats.intersecting;
            stats.intersecting += 1;

            let path = self.tile_path( index);
            if path.exists() {
                debug!("skipping existing tile {:?}", path);
                stats.skipped += 1;
                continue
            }

            let request = TileRequest {
                sources: sources.to_vec(),
                bbox: cell.bbox,
                srs: self.config.tile_srs.clone(),
                resolution: self.config.resolution,
                cog: self.config.cog.clone(),
                path,
            };
            info!("exporting tile {index} (col {}, row {}) to {:?}", cell.col, cell.row, request.path);
            if let Err(e) = self.exporter.export( &request).await {
                // a file left behind by the failed export would be skipped by the next run
                if request.path.is_file() {
                    if let Err(rm_err) = std::fs::remove_file( &request.path) {
                        warn!("failed to remove incomplete tile {:?}: {rm_err}", request.path);
                    }
                }
                return Err(e)
            }
            stats.exported += 1;
        }

        info!("tiling done: {stats:?}");
        Ok(stats)
    }
}
