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

//! in-memory elevation rasters and the pure grid operations on them (window, polygon clip, merge)

use ndarray::{Array2, s};
use geo::{LineString, Polygon};
use tracing::debug;

use odin_common::BoundingBox;
use odin_gdal::{Dataset, GeoTransform, create_mem_dataset_f32, geotransform_bounds, is_same_srs, read_window_f32, srs_from_wkt};
use crate::errors::{Result, alignment_error, op_failed};

/// max sub-pixel offset between tile origins we still consider to be on the same grid
const MAX_GRID_OFFSET: f64 = 0.1;

/// a single band f32 raster with north-up geo transform (GDAL coefficient order)
#[derive(Debug,Clone)]
pub struct RasterTile {
    /// rows x cols
    pub data: Array2<f32>,
    pub geo_transform: GeoTransform,
    pub srs_wkt: String,
    /// NaN if the source does not define a nodata value
    pub no_data: f32,
}

impl RasterTile {
    pub fn new (data: Array2<f32>, geo_transform: GeoTransform, srs_wkt: String, no_data: f32) -> Self {
        RasterTile { data, geo_transform, srs_wkt, no_data }
    }

    /// read band 1 of a dataset
    pub fn from_dataset (ds: &Dataset) -> Result<Self> {
        let (cols,rows) = ds.raster_size();
        let geo_transform = ds.geo_transform()?;
        let srs_wkt = ds.spatial_ref()?.to_wkt()?;

        let band = ds.rasterband(1)?;
        let no_data = band.no_data_value().map(|v| v as f32).unwrap_or(f32::NAN);
        let values = read_window_f32( &band, 0, 0, cols, rows)?;
        let data = Array2::from_shape_vec( (rows,cols), values).map_err(|e| op_failed(e))?;

        Ok( RasterTile { data, geo_transform, srs_wkt, no_data } )
    }

    pub fn to_mem_dataset (&self) -> Result<Dataset> {
        let srs = srs_from_wkt( &self.srs_wkt)?;
        let values: Vec<f32> = self.data.iter().cloned().collect(); // iter() is in logical (row major) order
        Ok( create_mem_dataset_f32( self.width(), self.height(), &self.geo_transform, &srs, Some(self.no_data as f64), values)? )
    }

    pub fn width (&self) -> usize { self.data.ncols() }
    pub fn height (&self) -> usize { self.data.nrows() }

    /// (x,y) pixel size, y is negative for north-up rasters
    pub fn pixel_size (&self) -> (f64,f64) { (self.geo_transform[1], self.geo_transform[5]) }

    pub fn bounds (&self) -> BoundingBox<f64> {
        geotransform_bounds( &self.geo_transform, self.width(), self.height())
    }

    #[inline]
    pub fn is_no_data (&self, v: f32) -> bool {
        is_no_data( v, self.no_data)
    }

    pub fn valid_count (&self) -> usize {
        self.data.iter().filter(|v| !self.is_no_data(**v)).count()
    }

    pub fn is_rotated (&self) -> bool {
        self.geo_transform[2] != 0.0 || self.geo_transform[4] != 0.0
    }
}

#[inline]
fn is_no_data (v: f32, no_data: f32) -> bool {
    v.is_nan() || v == no_data
}

/* #region pixel window *************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct PixelWindow {
    pub x_off: usize,
    pub y_off: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelWindow {
    /// geo transform of the window origin
    pub fn geo_transform (&self, gt: &GeoTransform) -> GeoTransform {
        [ gt[0] + self.x_off as f64 * gt[1], gt[1], 0.0,
          gt[3] + self.y_off as f64 * gt[5], 0.0, gt[5] ]
    }
}

/// the pixel window of a north-up `cols` x `rows` grid that covers `bbox` (in grid SRS units),
/// or None if they do not overlap
pub fn pixel_window (gt: &GeoTransform, cols: usize, rows: usize, bbox: &BoundingBox<f64>) -> Option<PixelWindow> {
    let to_col = |x: f64| (x - gt[0]) / gt[1];
    let to_row = |y: f64| (y - gt[3]) / gt[5];

    let (c0, c1) = ordered( to_col( bbox.west), to_col( bbox.east));
    let (r0, r1) = ordered( to_row( bbox.north), to_row( bbox.south));

    let x0 = c0.floor().max(0.0);
    let x1 = c1.ceil().min( cols as f64);
    let y0 = r0.floor().max(0.0);
    let y1 = r1.ceil().min( rows as f64);

    if x1 > x0 && y1 > y0 {
        Some( PixelWindow {
            x_off: x0 as usize,
            y_off: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize
        })
    } else {
        None
    }
}

#[inline]
fn ordered (a: f64, b: f64) -> (f64,f64) {
    if a <= b { (a,b) } else { (b,a) }
}

/* #endregion pixel window */

/* #region polygon clip *************************************************************************************/

/// set all pixels whose center is outside of `polygon` (in tile SRS coordinates) to nodata and crop the
/// tile to the rows/columns that have pixels inside. Holes are respected (even-odd rule).
/// Returns None if no pixel center is inside the polygon
pub fn clip_to_polygon (tile: RasterTile, polygon: &Polygon<f64>) -> Option<RasterTile> {
    let gt = tile.geo_transform;
    let (rows, cols) = (tile.height(), tile.width());
    let mut data = tile.data;

    let mut min_row = usize::MAX;
    let mut max_row = 0;
    let mut min_col = usize::MAX;
    let mut max_col = 0;

    let mut crossings: Vec<f64> = Vec::new();
    let mut inside: Vec<bool> = vec![false; cols];

    for r in 0..rows {
        let y = gt[3] + (r as f64 + 0.5) * gt[5];
        scanline_crossings( polygon, y, &mut crossings);

        inside.iter_mut().for_each(|b| *b = false);
        for span in crossings.chunks_exact(2) {
            let (c0, c1) = span_columns( &gt, cols, span[0], span[1]);
            for c in c0..c1 { inside[c] = true; }
        }

        for c in 0..cols {
            if inside[c] {
                if r < min_row { min_row = r }
                if r > max_row { max_row = r }
                if c < min_col { min_col = c }
                if c > max_col { max_col = c }
            } else {
                data[[r,c]] = tile.no_data;
            }
        }
    }

    if min_row > max_row || min_col > max_col { return None }

    let data = data.slice( s![min_row..=max_row, min_col..=max_col]).to_owned();
    let window = PixelWindow { x_off: min_col, y_off: min_row, width: max_col - min_col + 1, height: max_row - min_row + 1 };
    debug!("polygon clip keeps {}x{} of {}x{} pixels", window.width, window.height, cols, rows);

    Some( RasterTile { data, geo_transform: window.geo_transform( &gt), srs_wkt: tile.srs_wkt, no_data: tile.no_data } )
}

/// sorted x coordinates where the horizontal line at `y` crosses any polygon ring
fn scanline_crossings (polygon: &Polygon<f64>, y: f64, crossings: &mut Vec<f64>) {
    crossings.clear();
    add_ring_crossings( polygon.exterior(), y, crossings);
    for ring in polygon.interiors() {
        add_ring_crossings( ring, y, crossings);
    }
    crossings.sort_by( |a,b| a.total_cmp(b));
}

fn add_ring_crossings (ring: &LineString<f64>, y: f64, crossings: &mut Vec<f64>) {
    for line in ring.lines() {
        let (a, b) = (line.start, line.end);
        // half open so that vertices on the scanline are counted once
        if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
            crossings.push( a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
}

/// the [c0,c1) column range of pixels whose centers are within [x0,x1)
fn span_columns (gt: &GeoTransform, cols: usize, x0: f64, x1: f64) -> (usize,usize) {
    let to_center_col = |x: f64| ((x - gt[0]) / gt[1] - 0.5).ceil();
    let c0 = to_center_col(x0).max(0.0).min( cols as f64) as usize;
    let c1 = to_center_col(x1).max(0.0).min( cols as f64) as usize;
    if c1 > c0 { (c0,c1) } else { (c0,c0) }
}

/* #endregion polygon clip */

/* #region merge ********************************************************************************************/

/// merge tiles into a raster that covers the union of their footprints. Overlaps are resolved
/// first-write-wins in input order, the nodata value is that of the first tile.
/// Tiles have to share SRS, pixel size and grid (no resampling is done)
pub fn merge_tiles (tiles: Vec<RasterTile>) -> Result<RasterTile> {
    let Some(first) = tiles.first() else { return Err( alignment_error("no tiles to merge")) };
    if tiles.len() == 1 {
        return tiles.into_iter().next().ok_or( alignment_error("no tiles to merge"))
    }

    let ref_gt = first.geo_transform;
    let (res_x, res_y) = first.pixel_size();
    let no_data = first.no_data;

    let mut offsets: Vec<(i64,i64)> = Vec::with_capacity( tiles.len()); // (col,row) relative to first tile origin

    for (i,tile) in tiles.iter().enumerate() {
        if tile.is_rotated() { return Err( alignment_error( format!("tile {i} has a rotated geo transform"))) }
        if i > 0 && !is_same_srs( &first.srs_wkt, &tile.srs_wkt) { return Err( alignment_error( format!("tile {i} has a different SRS"))) }

        let (rx, ry) = tile.pixel_size();
        if !same_resolution( rx, res_x) || !same_resolution( ry, res_y) {
            return Err( alignment_error( format!("tile {i} resolution ({rx},{ry}) differs from ({res_x},{res_y})")))
        }

        let dc = (tile.geo_transform[0] - ref_gt[0]) / res_x;
        let dr = (tile.geo_transform[3] - ref_gt[3]) / res_y;
        if (dc - dc.round()).abs() > MAX_GRID_OFFSET || (dr - dr.round()).abs() > MAX_GRID_OFFSET {
            return Err( alignment_error( format!("tile {i} is not on the pixel grid of tile 0 (offset {dc},{dr})")))
        }
        offsets.push( (dc.round() as i64, dr.round() as i64));
    }

    let min_col = offsets.iter().map(|o| o.0).min().unwrap_or(0);
    let min_row = offsets.iter().map(|o| o.1).min().unwrap_or(0);
    let max_col = tiles.iter().zip( offsets.iter()).map(|(t,o)| o.0 + t.width() as i64).max().unwrap_or(0);
    let max_row = tiles.iter().zip( offsets.iter()).map(|(t,o)| o.1 + t.height() as i64).max().unwrap_or(0);

    let width = (max_col - min_col) as usize;
    let height = (max_row - min_row) as usize;
    let mut data = Array2::<f32>::from_elem( (height,width), no_data);

    for (tile,(oc,or)) in tiles.iter().zip( offsets.iter()) {
        let c0 = (oc - min_col) as usize;
        let r0 = (or - min_row) as usize;

        for ((r,c), v) in tile.data.indexed_iter() {
            if tile.is_no_data( *v) { continue }
            let tgt = &mut data[[r0 + r, c0 + c]];
            if is_no_data( *tgt, no_data) { *tgt = *v }
        }
    }

    let geo_transform = [ ref_gt[0] + min_col as f64 * res_x, res_x, 0.0, ref_gt[3] + min_row as f64 * res_y, 0.0, res_y ];
    debug!("merged {} tiles into {}x{} raster", tiles.len(), width, height);

    let srs_wkt = first.srs_wkt.clone();
    Ok( RasterTile { data, geo_transform, srs_wkt, no_data } )
}

#[inline]
fn same_resolution (a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max( b.abs())
}

/* #endregion merge */
