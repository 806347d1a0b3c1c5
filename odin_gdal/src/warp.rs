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

//! thin wrapper around the GDALWarp() utility function, which takes the same arguments as the
//! `gdalwarp` command line tool. This lets callers switch between in-process warping and running
//! an external `gdalwarp` process with the same argument list

use std::{ffi::CString, path::Path, ptr::null_mut};
use libc::c_int;
use gdal::{Dataset, cpl::CslStringList};
use gdal_sys::{GDALDatasetH, GDALWarpAppOptions};

use crate::{ok_mut_non_null, errors::{Result, misc_error, last_gdal_error}};

struct WarpAppOptions {
    options: *mut GDALWarpAppOptions,
}

impl WarpAppOptions {
    fn new (args: &[String]) -> Result<Self> {
        let mut c_args = CslStringList::new();
        for arg in args {
            c_args.add_string( arg)?;
        }

        let options = unsafe { gdal_sys::GDALWarpAppOptionsNew( c_args.as_ptr(), null_mut()) };
        if options.is_null() {
            Err( misc_error( format!("invalid gdalwarp arguments: {}", args.join(" "))))
        } else {
            Ok( WarpAppOptions { options } )
        }
    }
}

impl Drop for WarpAppOptions {
    fn drop (&mut self) {
        unsafe { gdal_sys::GDALWarpAppOptionsFree( self.options); }
    }
}

/// warp `srcs` into a new dataset at `dest` (use an empty `dest` together with "-of MEM" for in-memory results)
pub fn warp<P: AsRef<Path>> (srcs: &[&Dataset], dest: P, args: &[String]) -> Result<Dataset> {
    if srcs.is_empty() { return Err( misc_error("no warp source datasets")) }

    let opts = WarpAppOptions::new( args)?;
    let c_dest = CString::new( dest.as_ref().to_string_lossy().as_ref())?;
    let mut src_handles: Vec<GDALDatasetH> = srcs.iter().map(|ds| unsafe { ds.c_dataset() }).collect();
    let mut usage_error: c_int = 0;

    let h_ds = unsafe {
        gdal_sys::GDALWarp(
            c_dest.as_ptr(),
            null_mut(),
            src_handles.len() as c_int,
            src_handles.as_mut_ptr(),
            opts.options,
            &mut usage_error
        )
    };

    if usage_error != 0 {
        return Err( misc_error( format!("gdalwarp usage error: {}", args.join(" "))))
    }

    let h_ds = ok_mut_non_null( h_ds)?;
    Ok( unsafe { Dataset::from_c_dataset( h_ds) } )
}
