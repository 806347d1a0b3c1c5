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

//! the DTM extraction workflows: AOI -> catalog -> fetch/clip -> merge -> [reproject] -> write,
//! and AOI -> catalog -> grid tiles

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use odin_gdal::{srs_epsg_4326, srs_from_definition, transform_polygon};
use crate::{Aoi, config::{DtmConfig, TilerConfig}};
use crate::catalog::{Catalog, SpatialFilter};
use crate::fetch::RasterSource;
use crate::raster::{RasterTile, merge_tiles};
use crate::reproject::reproject_tile;
use crate::writer::write_tile;
use crate::export::TileExporter;
use crate::tiler::{Tiler, TilingStats};
use crate::errors::{Result, OdinDtmError};

pub struct DtmIngestor<C: Catalog, S: RasterSource> {
    catalog: C,
    source: S,
    config: DtmConfig,
}

impl<C: Catalog, S: RasterSource> DtmIngestor<C,S> {
    pub fn new (catalog: C, source: S, config: DtmConfig) -> Self {
        DtmIngestor { catalog, source, config }
    }

    pub fn config (&self) -> &DtmConfig { &self.config }

    /// `<output_dir>/<aoi-name><output_suffix>.tif`
    pub fn output_path (&self, aoi: &Aoi) -> PathBuf {
        self.config.output_dir.join( format!("{}{}.tif", aoi.name, self.config.output_suffix))
    }

    /// fetch, clip and merge all catalog items that intersect the AOI (in source SRS)
    pub async fn extract_dtm (&self, aoi: &Aoi) -> Result<RasterTile> {
        let catalog_config = &self.config.catalog;
        let filter = SpatialFilter::Intersects( aoi.geometry.clone());
        let items = self.catalog.query_items( &filter, catalog_config.max_items).await?;
        info!("found {} source tiles covering AOI {}", items.len(), aoi.name);

        let mut tiles: Vec<RasterTile> = Vec::with_capacity( items.len());
        for item in &items {
            let href = item.require_asset_href( &catalog_config.asset_key)?;
            match self.source.fetch_clipped( href, aoi)? {
                Some(tile) => {
                    debug!("item {} contributes {}x{} pixels", item.id, tile.width(), tile.height());
                    tiles.push( tile)
                }
                None => debug!("item {} does not intersect AOI", item.id)
            }
        }

        match tiles.len() {
            0 => Err( OdinDtmError::NotFoundError( format!("none of the {} items intersects AOI {}", items.len(), aoi.name))),
            1 => tiles.pop().ok_or( OdinDtmError::NotFoundError( aoi.name.clone())),
            n => {
                info!("merging {n} tiles");
                merge_tiles( tiles)
            }
        }
    }

    /// extract, optionally reproject and write the DTM for an already loaded AOI. Returns the output path
    pub async fn extract_to_file (&self, aoi: &Aoi) -> Result<PathBuf> {
        let path = self.output_path( aoi);

        let mut tile = self.extract_dtm( aoi).await?;
        if let Some(target_srs) = &self.config.target_srs {
            tile = reproject_tile( &tile, target_srs)?;
        }

        write_tile( &tile, &path, &self.config.output)?;
        Ok(path)
    }

    /// load the AOI (before any catalog access) and run [`Self::extract_to_file`]
    pub async fn extract_file<P: AsRef<Path>> (&self, aoi_path: P) -> Result<PathBuf> {
        let aoi = Aoi::from_file( aoi_path)?;
        self.extract_to_file( &aoi).await
    }
}

/// asset hrefs of all catalog items that intersect the AOI bounds. This is computed once for all tiles
pub async fn tile_sources<C: Catalog> (catalog: &C, aoi: &Aoi, config: &TilerConfig) -> Result<Vec<String>> {
    let filter = SpatialFilter::BBox( aoi.bounding_box());
    let items = catalog.query_items( &filter, config.catalog.max_items).await?;

    let mut sources: Vec<String> = Vec::with_capacity( items.len());
    for item in &items {
        sources.push( item.require_asset_href( &config.catalog.asset_key)?.to_string());
    }
    Ok(sources)
}

/// the grid tiling workflow
pub async fn run_tiling<C: Catalog, E: TileExporter> (catalog: &C, aoi: &Aoi, config: &TilerConfig, exporter: E) -> Result<TilingStats> {
    config.check()?;

    let tile_srs = srs_from_definition( &config.tile_srs)?;

    let sources = tile_sources( catalog, aoi, config).await?;
    info!("{} source rasters for AOI {}", sources.len(), aoi.name);

    let aoi_polygon = transform_polygon( &srs_epsg_4326()?, &tile_srs, &aoi.polygon)?;

    let tiler = Tiler::new( config.clone(), exporter);
    tiler.run( &aoi_polygon, &sources).await
}
