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

use odin_common::{define_cli, check_cli, config::load_config_file, fs::EnvPathBuf};
use odin_dtm::{load_config, create_exporter, run_tiling, Aoi, StacCatalog, TilerConfig};

define_cli! { ARGS [about="tile_dtm - export a grid of DTM tiles covering an AOI"] =
    config: String [help="filename or path of TilerConfig", long, short, default_value="dtm_tiles.ron"],
    aoi: Option<String> [help="optional GeoJSON AOI file that overrides the configured one", long, short]
}

#[tokio::main]
async fn main() -> Result<()> {
    check_cli!(ARGS);
    tracing_subscriber::fmt().with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let mut config: TilerConfig = if Path::new( &ARGS.config).is_file() { load_config_file( &ARGS.config)? } else { load_config( &ARGS.config)? };
    if let Some(aoi) = &ARGS.aoi {
        config.aoi = EnvPathBuf::new( aoi.as_str())?;
    }
    config.check()?;

    let aoi = Aoi::from_file( &config.aoi)?;
    let exporter = create_exporter( &config.exporter)?;
    let catalog = StacCatalog::open( &config.catalog).await?;

    let stats = run_tiling( &catalog, &aoi, &config, exporter).await?;
    println!("{} grid cells, {} intersecting AOI {}: {} exported, {} skipped (existing) in {}",
             stats.cells, stats.intersecting, aoi.name, stats.exported, stats.skipped, config.output_dir.display());

    Ok(())
}
