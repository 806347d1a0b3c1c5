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

//! tile export capability. Both implementations run the same gdalwarp argument list, one of them
//! in-process through GDALWarp() and the other one as an external `gdalwarp` process. Both write to a
//! [`StagedFile`] so that the tile path only exists once the tile is complete

use std::{path::PathBuf, process::ExitStatus};
use async_trait::async_trait;
use tokio::process::Command;
use which::which;
use tracing::debug;

use odin_common::BoundingBox;
use odin_gdal::{Dataset, warp::warp};
use crate::{config::{CogOptions, ExporterKind}, fetch::vsi_path, writer::StagedFile};
use crate::errors::{Result, OdinDtmError, op_failed};

/// everything needed to produce one output tile
#[derive(Debug,Clone)]
pub struct TileRequest {
    /// asset hrefs of the source rasters
    pub sources: Vec<String>,

    /// target extent in `srs` units
    pub bbox: BoundingBox<f64>,

    pub srs: String,

    /// optional target pixel size in `srs` units
    pub resolution: Option<f64>,

    pub cog: CogOptions,

    pub path: PathBuf,
}

/// the gdalwarp options for a tile request (without source and destination names)
pub fn warp_args (request: &TileRequest) -> Vec<String> {
    let bbox = &request.bbox;
    let mut args: Vec<String> = vec![
        "-t_srs".into(), request.srs.clone(),
        "-te".into(), bbox.west.to_string(), bbox.south.to_string(), bbox.east.to_string(), bbox.north.to_string(),
    ];

    if let Some(res) = request.resolution {
        args.extend( ["-tr".to_string(), res.to_string(), res.to_string()]);
    }

    args.extend( ["-of".to_string(), "COG".to_string()]);
    for (name,value) in request.cog.creation_options() {
        args.push( "-co".into());
        args.push( format!("{name}={value}"));
    }

    args.extend( ["-wo".to_string(), format!("NUM_THREADS={}", request.cog.num_threads), "-multi".to_string()]);
    args
}

#[async_trait]
pub trait TileExporter: Send + Sync {
    async fn export (&self, request: &TileRequest) -> Result<()>;
}

/// in-process [`TileExporter`] based on GDALWarp()
pub struct GdalWarpExporter {}

impl GdalWarpExporter {
    pub fn new () -> Self { GdalWarpExporter{} }
}

// GDAL datasets are not Send so they are created and dropped within this (blocking) call
fn warp_tile (request: &TileRequest) -> Result<()> {
    let staged = StagedFile::new( &request.path)?;

    let mut srcs: Vec<Dataset> = Vec::with_capacity( request.sources.len());
    for href in &request.sources {
        srcs.push( Dataset::open( vsi_path( href))?);
    }
    let src_refs: Vec<&Dataset> = srcs.iter().collect();

    let ds = warp( &src_refs, staged.staged_path(), &warp_args( request))?;
    drop(ds);
    staged.commit()?;
    Ok(())
}

#[async_trait]
impl TileExporter for GdalWarpExporter {
    async fn export (&self, request: &TileRequest) -> Result<()> {
        let request = request.clone();
        tokio::task::spawn_blocking( move || warp_tile( &request)).await.map_err(|e| op_failed( format!("warp task failed: {e}")))?
    }
}

/// [`TileExporter`] that runs an external `gdalwarp` executable
pub struct GdalWarpCommand {
    cmd: PathBuf,
}

impl GdalWarpCommand {
    pub fn new (cmd: &str) -> Result<Self> {
        let cmd = which( cmd).map_err(|e| OdinDtmError::CommandError( format!("unable to locate {cmd}: {e}")))?;
        Ok( GdalWarpCommand { cmd } )
    }

    pub fn cmd (&self) -> &PathBuf { &self.cmd }
}

fn exit_ok (status: ExitStatus, stderr: &[u8]) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err( OdinDtmError::CommandError( format!("child status: {}: {}", status, String::from_utf8_lossy( stderr).trim())))
    }
}

#[async_trait]
impl TileExporter for GdalWarpCommand {
    async fn export (&self, request: &TileRequest) -> Result<()> {
        let staged = StagedFile::new( &request.path)?;
        let mut cmd = Command::new( &self.cmd);

        cmd.args( warp_args( request));
        for href in &request.sources {
            cmd.arg( vsi_path( href));
        }
        cmd.arg( staged.staged_path().as_os_str());

        debug!("executing {:?}", cmd);
        match cmd.output().await {
            Ok(output) => exit_ok( output.status, &output.stderr)?,
            Err(e) => return Err( OdinDtmError::CommandError( e.to_string()))
        }
        staged.commit()?;
        Ok(())
    }
}

/// create the exporter that is selected in the configuration
pub fn create_exporter (kind: &ExporterKind) -> Result<Box<dyn TileExporter>> {
    match kind {
        ExporterKind::InProcess => Ok( Box::new( GdalWarpExporter::new())),
        ExporterKind::External{cmd} => Ok( Box::new( GdalWarpCommand::new( cmd)?))
    }
}

#[async_trait]
impl TileExporter for Box<dyn TileExporter> {
    async fn export (&self, request: &TileRequest) -> Result<()> {
        (**self).export( request).await
    }
}
