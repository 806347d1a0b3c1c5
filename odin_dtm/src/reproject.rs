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

use tracing::info;
use odin_gdal::{srs_from_definition, warp::warp};
use crate::{raster::RasterTile, errors::Result};

/// warp a tile into `target_srs` (anything GDAL accepts as user input, e.g. "EPSG:3857") using GDAL's
/// default (nearest neighbour) resampling. The source nodata value is carried over to the result
pub fn reproject_tile (tile: &RasterTile, target_srs: &str) -> Result<RasterTile> {
    srs_from_definition( target_srs)?; // fail early with a meaningful message

    let src = tile.to_mem_dataset()?;
    let args: Vec<String> = vec![
        "-of".into(), "MEM".into(),
        "-t_srs".into(), target_srs.into(),
    ];
    let ds = warp( &[&src], "", &args)?;

    let result = RasterTile::from_dataset( &ds)?;
    info!("reprojected {}x{} raster to {} ({}x{})", tile.width(), tile.height(), target_srs, result.width(), result.height());
    Ok(result)
}
