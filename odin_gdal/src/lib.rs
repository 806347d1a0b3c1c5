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

pub mod errors;
pub mod warp;

use gdal::errors::CplErrType;
use static_init::constructor;
use std::{ffi::CStr, ptr::null_mut};
use libc::c_char;
use geo::{Coord, LineString, Polygon};

// we re-export these so that other crates don't have to use a direct gdal depedency to import.
// this is to ensure we run bindgen for new GDAL versions that don't yet have pre-computed bindings in gdal-sys
pub use gdal::{self, Driver, DriverManager, Metadata, Dataset, errors::GdalError, GeoTransform, GeoTransformEx, cpl::CslStringList};
pub use gdal::raster::{GdalType,GdalDataType,RasterBand,Buffer,RasterCreationOptions};
pub use gdal::spatial_ref::{CoordTransform, CoordTransformOptions, SpatialRef};

use odin_common::BoundingBox;
use crate::errors::{Result, misc_error, last_gdal_error, OdinGdalError, gdal_error};

#[constructor(0)]
extern "C" fn _initialize_gdal() {
    gdal::config::set_error_handler(no_error_output);
}

fn no_error_output (cpl_et: CplErrType, ec: i32, msg: &str) {}

pub fn get_driver_by_name (name: &str) -> Result<Driver> {
    Ok( DriverManager::get_driver_by_name( name)? )
}

pub fn pc_char_to_string (pc_char: *const c_char) -> String {
    let cstr = unsafe { CStr::from_ptr(pc_char) };
    String::from_utf8_lossy(cstr.to_bytes()).to_string()
}

pub fn ok_true <F> (cond: bool, err: F) -> Result<()> where F: FnOnce()->String {
    if cond { Ok(()) } else { Err( OdinGdalError::MiscError(err())) }
}

pub fn ok_mut_non_null <R> (ptr: *mut R) -> Result<*mut R> {
    if ptr != null_mut() { Ok(ptr) } else { Err(last_gdal_error()) }
}

/// create options from `NAME=VALUE` pairs
pub fn create_options (name_values: &[(&str,&str)]) -> Result<RasterCreationOptions> {
    let mut co = RasterCreationOptions::new();
    for (name,value) in name_values {
        co.add_name_value( name, value)?;
    }
    Ok(co)
}

/// bounds of a north-up grid with the given geo transform and size
pub fn geotransform_bounds (gt: &GeoTransform, cols: usize, rows: usize) -> BoundingBox<f64> {
    let x0 = gt[0];
    let x1 = gt[0] + gt[1] * cols as f64;
    let y0 = gt[3];
    let y1 = gt[3] + gt[5] * rows as f64;

    BoundingBox::new( x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/* #region SpatialRef based coordinate transformations ************************************************************/

pub fn new_coord_transform (s_srs: &SpatialRef, t_srs: &SpatialRef) -> Result<CoordTransform> {
    // 0.0 means no accuracy filter (datum shifts such as WGS84 -> NAD83(CSRS) are not exact)
    let mut ct_options = CoordTransformOptions::new()?;
    ct_options.desired_accuracy( 0.0);
    Ok( CoordTransform::new_with_options( s_srs, t_srs, &ct_options)? )
}

// watch out - if source or target are geographic we have to swap axis order since SpatialRefs created from
// EPSG codes or WKT use the authority compliant (lat,lon) order. We don't change the axis_mapping_strategy of
// the provided SpatialRefs though. Callers always pass x=lon,y=lat for geographic systems
pub fn transform_bounds_2d (s_srs: &SpatialRef, t_srs: &SpatialRef, bbox: &BoundingBox<f64>,
                            opt_densify_pts: Option<i32>) -> Result<BoundingBox<f64>> {
    let s_is_geo = s_srs.is_geographic();
    let t_is_geo = t_srs.is_geographic();

    let bounds: [f64;4] = if s_is_geo {
        [bbox.south, bbox.west, bbox.north, bbox.east]
    } else {
        [bbox.west, bbox.south, bbox.east, bbox.north]
    };
    let densify_pts: i32 = if let Some(dp) = opt_densify_pts { dp } else { 21 }; // default recommended by GDAL OCTTransformBounds doc

    let transform = new_coord_transform( s_srs, t_srs)?;
    let a = transform.transform_bounds( &bounds, densify_pts).map_err( gdal_error)?;

    if t_is_geo {
        Ok( BoundingBox::new( a[1], a[0], a[3], a[2]) )
    } else {
        Ok( BoundingBox::new( a[0], a[1], a[2], a[3]) )
    }
}

/// transform a coordinate sequence in place, with the same (x=lon,y=lat) convention as [`transform_bounds_2d`]
pub fn transform_coords_2d (transform: &CoordTransform, s_is_geo: bool, t_is_geo: bool, coords: &mut [Coord<f64>]) -> Result<()> {
    if coords.is_empty() { return Ok(()) }

    let (mut xs, mut ys): (Vec<f64>,Vec<f64>) = if s_is_geo {
        coords.iter().map(|c| (c.y, c.x)).unzip()
    } else {
        coords.iter().map(|c| (c.x, c.y)).unzip()
    };
    let mut zs: [f64;0] = [];

    transform.transform_coords( &mut xs, &mut ys, &mut zs)?;

    for (i,c) in coords.iter_mut().enumerate() {
        if t_is_geo {
            *c = Coord{ x: ys[i], y: xs[i] };
        } else {
            *c = Coord{ x: xs[i], y: ys[i] };
        }
    }
    Ok(())
}

/// transform all rings of a polygon from `s_srs` into `t_srs`. Note this does not densify edges
pub fn transform_polygon (s_srs: &SpatialRef, t_srs: &SpatialRef, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
    let s_is_geo = s_srs.is_geographic();
    let t_is_geo = t_srs.is_geographic();
    let transform = new_coord_transform( s_srs, t_srs)?;

    let mut transform_ring = |ring: &LineString<f64>| -> Result<LineString<f64>> {
        let mut coords: Vec<Coord<f64>> = ring.0.clone();
        transform_coords_2d( &transform, s_is_geo, t_is_geo, &mut coords)?;
        Ok( LineString::new(coords) )
    };

    let exterior = transform_ring( polygon.exterior())?;
    let mut interiors = Vec::with_capacity( polygon.interiors().len());
    for ring in polygon.interiors() {
        interiors.push( transform_ring( ring)?);
    }

    Ok( Polygon::new( exterior, interiors) )
}

/* #endregion SpatialRef based coordinate transformations */

/* #region well known SpatialRefs *********************************************************************************/

/// the geographic SRS in which AOIs and STAC geometries are specified. Axis order is lat,lon, uom: degrees
pub fn srs_epsg_4326 () -> Result<SpatialRef> { srs_epsg(4326) }

pub fn srs_epsg (epsg: u32) -> Result<SpatialRef> {
    Ok(SpatialRef::from_epsg(epsg)?)
}

/// accepts anything OSRSetFromUserInput does, e.g. "EPSG:3857", WKT or PROJ strings
pub fn srs_from_definition (def: &str) -> Result<SpatialRef> {
    SpatialRef::from_definition( def).map_err(|e| misc_error( format!("invalid SRS definition '{def}': {e}")))
}

pub fn srs_from_wkt (wkt: &str) -> Result<SpatialRef> {
    Ok( SpatialRef::from_wkt( wkt)? )
}

/// do two WKT strings describe the same SRS
pub fn is_same_srs (wkt_a: &str, wkt_b: &str) -> bool {
    if wkt_a == wkt_b { return true }

    match (SpatialRef::from_wkt( wkt_a), SpatialRef::from_wkt( wkt_b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false
    }
}

/* #endregion well known SpatialRefs */

/* #region generic Dataset/Rasterband access *********************************************************************************/

/// read a window of a f32 raster band (row major, `width * height` values)
pub fn read_window_f32 (band: &RasterBand, x_off: usize, y_off: usize, width: usize, height: usize) -> Result<Vec<f32>> {
    let mut buf: Vec<f32> = vec![0.0; width * height];
    band.read_into_slice( (x_off as isize, y_off as isize), (width,height), (width,height), &mut buf, None)?;
    Ok(buf)
}

/// create a single band f32 dataset in memory from row major `data`
pub fn create_mem_dataset_f32 (width: usize, height: usize, geo_transform: &GeoTransform, srs: &SpatialRef,
                               no_data: Option<f64>, data: Vec<f32>) -> Result<Dataset> {
    ok_true( data.len() == width * height, || format!("data length {} does not match raster size {width}x{height}", data.len()))?;

    let driver = DriverManager::get_driver_by_name("MEM")?;
    let mut ds = driver.create_with_band_type::<f32,_>( "", width, height, 1)?;
    ds.set_geo_transform( geo_transform)?;
    ds.set_spatial_ref( srs)?;

    {
        let mut band = ds.rasterband(1)?;
        band.set_no_data_value( no_data)?;
        let mut buf: Buffer<f32> = Buffer::new( (width,height), data);
        band.write( (0,0), (width,height), &mut buf)?;
    }

    Ok(ds)
}

/* #endregion generic Dataset/Rasterband access */
