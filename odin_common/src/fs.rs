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

use std::fs;
use std::io::{self,Error as IOError,ErrorKind};
use std::env;
use io::ErrorKind::*;
use std::path::{Path,PathBuf};

use crate::macros::io_error;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn filestem <'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_stem().and_then(|ostr| ostr.to_str())
}

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err(io_error!(PermissionDenied, "output_dir {:?} not writable", &path))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

pub fn path_to_lossy_string (path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().as_ref().to_string()
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    fs::read_to_string( path)
}

/// replace leading '~' and '$<name>' path elements
pub fn replace_env_var_path (path: impl AsRef<Path>)->Result<PathBuf> {
    let mut p = PathBuf::new();

    for (n,c) in path.as_ref().iter().enumerate() {
        let e = c.to_str().ok_or( IOError::new(ErrorKind::Other, format!("invalid path: {:?}", path.as_ref())))?;

        if e == "~" && n == 0 {
            p.push( env::var("HOME").map_err( |_| IOError::new(ErrorKind::Other, "HOME not set"))?)
        } else if e.len() > 1 && e.starts_with('$') {
            let var = &e[1..];
            p.push( env::var( var).map_err( |_| IOError::new(ErrorKind::Other, format!("{e} not set")))?)
        } else {
            p.push(e)
        }
    }

    Ok(p)
}

/* #region EnvPathBuf *******************************************************************************/

use serde::ser::{Serialize as SerializeTrait, Serializer};
use serde::de::{Deserialize as DeserializeTrait, Deserializer};
use std::{fmt::Debug,ops::Deref,ffi::OsStr};

/// a PathBuf that can use env vars as path elements, which are expanded when deserializing
#[derive(Clone,PartialEq)]
pub struct EnvPathBuf(PathBuf);

impl EnvPathBuf {
    pub fn new (path: impl AsRef<Path>) -> Result<Self> {
        Ok( EnvPathBuf( replace_env_var_path(path)?) )
    }
}

impl Debug for EnvPathBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Deref for EnvPathBuf {
    type Target = PathBuf;

    fn deref (&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<OsStr> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &OsStr {
        &self.0.as_ref()
    }
}

impl From<PathBuf> for EnvPathBuf {
    fn from (path: PathBuf) -> Self { EnvPathBuf(path) }
}

// note this means we serialize the expanded pathbuf
impl SerializeTrait for EnvPathBuf {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        self.0.serialize( serializer)
    }
}

impl<'de> DeserializeTrait<'de> for EnvPathBuf {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let a = String::deserialize(deserializer)?;
        let ep = PathBuf::from(a);
        let p = replace_env_var_path(&ep).map_err(|e| serde::de::Error::custom(&format!("failed to expand path {ep:?}: {e}")))?;

        Ok( EnvPathBuf(p) )
    }
}

/* #endregion EnvPathBuf */
