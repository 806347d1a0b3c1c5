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

use std::{fs, path::{Path, PathBuf}};
use tempfile::TempDir;
use tracing::{debug, info};

use odin_common::fs::ensure_writable_dir;
use odin_gdal::{RasterCreationOptions, create_options, get_driver_by_name};
use crate::{config::{CogOptions, OutputFormat}, raster::RasterTile, errors::{Result, op_failed}};

/// an output file that is written to a temporary location next to its final `path` and only moved there
/// by [`StagedFile::commit`]. If it is dropped without commit the temporary file is removed, which means
/// a failed write never leaves a partial file at `path`
pub struct StagedFile {
    dir: TempDir,
    staged: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    /// this creates the parent directory of `path` if it does not exist yet
    pub fn new (path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_name = path.file_name().ok_or_else(|| op_failed( format!("not a file path: {path:?}")))?;
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from(".")
        };
        ensure_writable_dir( &parent)?;

        // same file system as `path` so that commit is a rename. The file name is kept for GDAL driver detection
        let dir = tempfile::Builder::new().prefix(".staging_").tempdir_in( &parent)?;
        let staged = dir.path().join( file_name);

        Ok( StagedFile { dir, staged, path } )
    }

    /// where the file has to be written to
    pub fn staged_path (&self) -> &Path { &self.staged }

    /// where the file ends up after commit
    pub fn path (&self) -> &Path { &self.path }

    /// move the written file to its final path, replacing an existing file
    pub fn commit (self) -> Result<PathBuf> {
        let StagedFile { dir, staged, path } = self;
        if !staged.is_file() { return Err( op_failed( format!("nothing written for {path:?}"))) }

        fs::rename( &staged, &path)?;
        drop(dir);
        debug!("committed {:?}", path);
        Ok(path)
    }
}

pub fn cog_creation_options (opts: &CogOptions) -> Result<RasterCreationOptions> {
    let name_values = opts.creation_options();
    let pairs: Vec<(&str,&str)> = name_values.iter().map(|(k,v)| (*k, v.as_str())).collect();
    Ok( create_options( &pairs)? )
}

/// encode a tile as (Cloud-Optimized) GeoTIFF. The parent directory is created if it does not exist yet.
/// Nothing is written to `path` if encoding fails
pub fn write_tile (tile: &RasterTile, path: &Path, format: &OutputFormat) -> Result<()> {
    let (driver_name, co) = match format {
        OutputFormat::Cog(opts) => ("COG", cog_creation_options( opts)?),
        OutputFormat::GTiff => ("GTiff", RasterCreationOptions::new())
    };

    let staged = StagedFile::new( path)?;
    let src = tile.to_mem_dataset()?;
    let driver = get_driver_by_name( driver_name)?;
    let ds = src.create_copy( &driver, staged.staged_path(), &co)?;
    drop(ds); // close before we commit
    staged.commit()?;

    info!("wrote {}x{} {} raster to {:?}", tile.width(), tile.height(), driver_name, path);
    Ok(())
}
