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

//! extraction of digital terrain model (DTM) rasters for an area of interest (AOI) from a STAC catalog.
//!
//! There are two workflows:
//!   - [`DtmIngestor`] fetches the catalog items that intersect the AOI, clips them to the AOI polygon,
//!     merges the clips (first-write-wins), optionally reprojects and writes a single (COG) GeoTIFF
//!   - [`run_tiling`] cuts the projected AOI bounds into a regular grid and exports each intersecting
//!     grid cell through a [`TileExporter`], skipping tiles that already exist

use odin_common::define_load_config;

pub mod errors;
pub mod config;
pub mod aoi;
pub mod catalog;
pub mod raster;
pub mod fetch;
pub mod reproject;
pub mod writer;
pub mod export;
pub mod tiler;
pub mod ingest;

pub use aoi::Aoi;
pub use catalog::{Catalog, CatalogItem, SpatialFilter, StacCatalog};
pub use config::{CatalogConfig, CogOptions, DtmConfig, ExporterKind, OutputFormat, TilerConfig};
pub use raster::{RasterTile, merge_tiles, clip_to_polygon};
pub use fetch::{RasterSource, GdalRasterSource};
pub use export::{TileExporter, TileRequest, GdalWarpExporter, GdalWarpCommand, create_exporter};
pub use tiler::{Tiler, TileGrid, TilingStats};
pub use ingest::{DtmIngestor, run_tiling};
pub use errors::{OdinDtmError, Result};

define_load_config!{}
