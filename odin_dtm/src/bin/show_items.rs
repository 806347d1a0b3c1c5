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
use anyhow::Result;
use tracing_subscriber::EnvFilter;

use odin_common::{define_cli, check_cli, config::load_config_file};
use odin_dtm::{load_config, Aoi, Catalog, DtmConfig, SpatialFilter, StacCatalog};

define_cli! { ARGS [about="show_items - list the catalog items (and their DTM asset) that intersect an AOI"] =
    config: String [help="filename or path of DtmConfig", long, short, default_value="dtm_cog.ron"],
    bbox: bool [help="query by AOI bounding box instead of the AOI geometry", long],
    aoi: String [help="GeoJSON file with the AOI polygon (lon/lat)", long, short]
}

#[tokio::main]
async fn main() -> Result<()> {
    check_cli!(ARGS);
    tracing_subscriber::fmt().with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))).init();

    let config: DtmConfig = if Path::new( &ARGS.config).is_file() { load_config_file( &ARGS.config)? } else { load_config( &ARGS.config)? };
    let aoi = Aoi::from_file( &ARGS.aoi)?;

    let filter = if ARGS.bbox { SpatialFilter::BBox( aoi.bounding_box()) } else { SpatialFilter::Intersects( aoi.geometry.clone()) };
    let catalog = StacCatalog::open( &config.catalog).await?;
    let items = catalog.search( &filter, config.catalog.max_items).await?;

    println!("{} items of collection {} intersect AOI {}", items.len(), catalog.collection(), aoi.name);
    for item in &items {
        let href = item.asset_href( &config.catalog.asset_key).unwrap_or("<no asset>");
        println!("  {}: {}", item.id, href);
    }

    Ok(())
}
