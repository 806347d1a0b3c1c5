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

//! RON based config lookup. Crates that define configs expand [`define_load_config`] at the top
//! level, which gives them a `load_config(filename)` function that looks up config files in
//!
//!   1. `$ODIN_HOME/configs/<crate>/<filename>`
//!   2. `~/.odin/configs/<crate>/<filename>`
//!   3. `<crate-dir>/configs/<filename>` (the in-repo default)
//!
//! Explicit config paths (e.g. from command line arguments) are loaded with [`load_config_file`]

use std::{env, path::{Path,PathBuf}};
use serde::de::DeserializeOwned;

use crate::{define_error, fs};

pub const CONFIGS: &'static str = "configs";

define_error!{ pub OdinConfigError =
    IOError(#[from] std::io::Error) : "config IO error: {0}",
    RonError(#[from] ron::error::SpannedError) : "config RON error: {0}",
    NotFoundError(String) : "config not found: {0}"
}

pub type Result<T> = std::result::Result<T, OdinConfigError>;

pub fn find_config_file (resource_crate: &str, crate_dir: &Path, filename: &str) -> Option<PathBuf> {
    // check an explicit ODIN_HOME first
    if let Ok(odin_home) = env::var("ODIN_HOME") {
        let path = Path::new( odin_home.as_str()).join( CONFIGS).join( resource_crate).join( filename);
        if path.is_file() { return Some(path) }
    }

    // then try an implicit ~/.odin/configs
    if let Ok(usr_home) = env::var("HOME") {
        let path = Path::new( usr_home.as_str()).join(".odin").join( CONFIGS).join( resource_crate).join( filename);
        if path.is_file() { return Some(path) }
    }

    // last resort is the config within the repo
    let path = crate_dir.join( CONFIGS).join( filename);
    if path.is_file() { Some(path) } else { None }
}

pub fn load_config_file<C,P> (path: P) -> Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let path = path.as_ref();
    if !path.is_file() { return Err( OdinConfigError::NotFoundError( fs::path_to_lossy_string(path))) }

    let contents = fs::filepath_contents_as_string( &path)?;
    Ok( ron::from_str( contents.as_str())? )
}

/// this is the macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load config using the `odin_common::config` lookup mechanism
        pub fn load_config<C> (filename: &str) -> $crate::config::Result<C> where C: serde::de::DeserializeOwned {
            let crate_dir = std::path::Path::new( env!("CARGO_MANIFEST_DIR"));

            match $crate::config::find_config_file( env!("CARGO_PKG_NAME"), crate_dir, filename) {
                Some(path) => $crate::config::load_config_file( &path),
                None => Err( $crate::config::OdinConfigError::NotFoundError( filename.to_string()))
            }
        }
    }
}
