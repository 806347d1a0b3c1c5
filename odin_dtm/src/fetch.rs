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

use ndarray::Array2;
use tracing::{debug, info};

use odin_gdal::{Dataset, geotransform_bounds, srs_epsg_4326, srs_from_wkt, transform_bounds_2d, transform_polygon, read_window_f32};
use crate::{Aoi, raster::{RasterTile, pixel_window, clip_to_polygon}};
use crate::errors::{Result, op_failed};

/// something that can turn a DTM asset reference into a raster tile clipped to an AOI
pub trait RasterSource {
    /// returns None if the asset raster does not intersect the AOI
    fn fetch_clipped (&self, href: &str, aoi: &Aoi) -> Result<Option<RasterTile>>;
}

/// map asset hrefs to GDAL virtual file system paths so that remote rasters are read with range requests
pub fn vsi_path (href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        format!("/vsicurl/{href}")
    } else if let Some(path) = href.strip_prefix("s3://") {
        format!("/vsis3/{path}")
    } else if let Some(path) = href.strip_prefix("gs://") {
        format!("/vsigs/{path}")
    } else {
        href.to_string()
    }
}

/// [`RasterSource`] that opens (remote) rasters with GDAL and only reads the AOI window of band 1
pub struct GdalRasterSource {}

impl GdalRasterSource {
    pub fn new () -> Self { GdalRasterSource{} }
}

impl RasterSource for GdalRasterSource {
    fn fetch_clipped (&self, href: &str, aoi: &Aoi) -> Result<Option<RasterTile>> {
        let path = vsi_path( href);
        debug!("opening {path}");
        let ds = Dataset::open( &path)?;

        let gt = ds.geo_transform()?;
        if gt[2] != 0.0 || gt[4] != 0.0 { return Err( op_failed( format!("rotated raster not supported: {href}"))) }

        // round trip through WKT so that we get authority compliant axis order for geographic rasters
        let srs_wkt = ds.spatial_ref()?.to_wkt()?;
        let raster_srs = srs_from_wkt( &srs_wkt)?;
        let aoi_srs = srs_epsg_4326()?;

        // bbox first (cheap)
        let aoi_bbox = transform_bounds_2d( &aoi_srs, &raster_srs, &aoi.bounding_box(), None)?;
        let (cols, rows) = ds.raster_size();
        let Some(window) = geotransform_bounds( &gt, cols, rows).intersection( &aoi_bbox)
            .and_then( |bbox| pixel_window( &gt, cols, rows, &bbox)) else {
            info!("{href} does not intersect AOI {}", aoi.name);
            return Ok(None)
        };
        debug!("reading window {window:?} of {cols}x{rows} raster");

        let band = ds.rasterband(1)?;
        let no_data = band.no_data_value().map(|v| v as f32).unwrap_or(f32::NAN);
        let values = read_window_f32( &band, window.x_off, window.y_off, window.width, window.height)?;
        let data = Array2::from_shape_vec( (window.height, window.width), values).map_err(|e| op_failed(e))?;
        let tile = RasterTile::new( data, window.geo_transform( &gt), srs_wkt, no_data);

        // then the exact polygon
        let polygon = transform_polygon( &aoi_srs, &raster_srs, &aoi.polygon)?;
        Ok( clip_to_polygon( tile, &polygon) )
    }
}
