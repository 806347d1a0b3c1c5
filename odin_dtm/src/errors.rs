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

use thiserror::Error;
use odin_common::config::OdinConfigError;
use odin_gdal::errors::OdinGdalError;
use odin_stac::errors::OdinStacError;

pub type Result<T> = std::result::Result<T, OdinDtmError>;

#[derive(Error,Debug)]
pub enum OdinDtmError {

    // AOI input that does not contain a usable geometry
    #[error("invalid AOI file format: {0}")]
    FileFormatError(String),

    #[error("no catalog items found: {0}")]
    NotFoundError(String),

    #[error("catalog item {0} has no '{1}' asset")]
    MissingAssetError(String,String),

    // tiles that can't be merged without resampling
    #[error("raster alignment error: {0}")]
    AlignmentError(String),

    #[error("external command failed: {0}")]
    CommandError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfigError(String),

    // generic self-created error
    #[error("DTM operation failed: {0}")]
    OpFailedError(String),

    // pass through for config lookup and parse errors
    #[error("DTM config error: {0}")]
    ConfigError( #[from] OdinConfigError),

    // pass through for IO errors
    #[error("DTM IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    // pass through for errors of direct gdal crate calls
    #[error("GDAL error: {0}")]
    GdalError( #[from] odin_gdal::GdalError),

    // pass through for OdinGdalErrors
    #[error("ODIN gdal error: {0}")]
    OdinGdalError( #[from] OdinGdalError),

    // pass through for OdinStacErrors
    #[error("ODIN stac error: {0}")]
    OdinStacError( #[from] OdinStacError),
}

pub fn op_failed<S: ToString> (msg: S)->OdinDtmError {
    OdinDtmError::OpFailedError(msg.to_string())
}

pub fn file_format_error<S: ToString> (msg: S)->OdinDtmError {
    OdinDtmError::FileFormatError(msg.to_string())
}

pub fn alignment_error<S: ToString> (msg: S)->OdinDtmError {
    OdinDtmError::AlignmentError(msg.to_string())
}

pub fn invalid_config<S: ToString> (msg: S)->OdinDtmError {
    OdinDtmError::InvalidConfigError(msg.to_string())
}
