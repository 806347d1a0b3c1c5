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

//! configuration structs for DTM extraction and tiling. Instances are normally created from RON
//! files in `configs/` (see `crate::load_config`)

use serde::{Deserialize, Serialize};
use odin_common::fs::EnvPathBuf;
use odin_gdal::srs_from_definition;

use crate::errors::{Result, invalid_config};

/// where to find DTM items
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct CatalogConfig {
    /// STAC API root (landing page) URL
    pub api_url: String,

    /// id of the STAC collection that holds the DTM items
    pub collection: String,

    /// item asset key of the DTM raster
    pub asset_key: String,

    /// optional cap on the number of items we process per query
    #[serde(default)]
    pub max_items: Option<usize>,

    /// optional page size for item searches (the service default otherwise)
    #[serde(default)]
    pub page_limit: Option<usize>,

    /// optional STAC datetime filter (instant or "start/end" interval, ".." for open ends)
    #[serde(default)]
    pub datetime: Option<String>,
}

/// COG driver creation options
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct CogOptions {
    pub compress: String,
    pub predictor: u32,
    pub blocksize: u32,
    pub overview_resampling: String,
    pub bigtiff: String,
    pub num_threads: String,
}

impl Default for CogOptions {
    fn default() -> Self {
        CogOptions {
            compress: "DEFLATE".to_string(),
            predictor: 2,
            blocksize: 512,
            overview_resampling: "NEAREST".to_string(),
            bigtiff: "IF_NEEDED".to_string(),
            num_threads: "ALL_CPUS".to_string(),
        }
    }
}

impl CogOptions {
    /// the `NAME=VALUE` pairs as understood by the GDAL COG driver (and `gdalwarp -co`)
    pub fn creation_options (&self) -> Vec<(&'static str,String)> {
        vec![
            ("COMPRESS", self.compress.clone()),
            ("PREDICTOR", self.predictor.to_string()),
            ("BLOCKSIZE", self.blocksize.to_string()),
            ("OVERVIEW_RESAMPLING", self.overview_resampling.clone()),
            ("BIGTIFF", self.bigtiff.clone()),
            ("NUM_THREADS", self.num_threads.clone()),
        ]
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum OutputFormat {
    /// Cloud-Optimized GeoTIFF with explicit encoder options
    Cog(CogOptions),
    /// plain GeoTIFF with driver defaults
    GTiff,
}

/// config for extracting a single (merged) DTM raster for an AOI
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct DtmConfig {
    pub catalog: CatalogConfig,

    /// directory for output files (created if it does not exist)
    pub output_dir: EnvPathBuf,

    /// appended to the AOI file stem to form the output filename, e.g. "_merged"
    pub output_suffix: String,

    /// SRS definition to reproject the merged raster into (e.g. "EPSG:3857"), None keeps the source SRS
    #[serde(default)]
    pub target_srs: Option<String>,

    pub output: OutputFormat,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub enum ExporterKind {
    /// in-process GDALWarp
    InProcess,
    /// external gdalwarp executable (looked up in PATH if not absolute)
    External { cmd: String },
}

/// config for cutting an AOI into fixed size grid tiles
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct TilerConfig {
    pub catalog: CatalogConfig,

    /// GeoJSON file with the AOI polygon (lon/lat)
    pub aoi: EnvPathBuf,

    pub output_dir: EnvPathBuf,

    /// output tiles are named `<tile_prefix><index>.tif`
    pub tile_prefix: String,

    /// projected SRS definition of the tile grid (e.g. "EPSG:3979")
    pub tile_srs: String,

    /// tile edge length in `tile_srs` units
    pub tile_size: f64,

    /// optional output pixel size in `tile_srs` units (source resolution otherwise)
    #[serde(default)]
    pub resolution: Option<f64>,

    #[serde(default)]
    pub cog: CogOptions,

    pub exporter: ExporterKind,

    /// dry-run bound: stop after this many intersecting cells
    #[serde(default)]
    pub max_tiles: Option<usize>,
}

impl TilerConfig {
    /// everything that can be checked without catalog access, including a projected `tile_srs`
    pub fn check (&self) -> Result<()> {
        let tile_srs = srs_from_definition( &self.tile_srs).map_err(|e| invalid_config( e))?;
        if tile_srs.is_geographic() { return Err( invalid_config( format!("tile_srs has to be projected: {}", self.tile_srs))) }

        if !(self.tile_size > 0.0) { return Err( invalid_config( format!("tile_size has to be positive: {}", self.tile_size))) }
        if let Some(res) = self.resolution {
            if !(res > 0.0) { return Err( invalid_config( format!("resolution has to be positive: {res}"))) }
        }
        if self.tile_prefix.contains( std::path::MAIN_SEPARATOR) { return Err( invalid_config( "tile_prefix can't contain path separators")) }
        Ok(())
    }
}
