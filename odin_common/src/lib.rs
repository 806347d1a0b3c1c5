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

use serde::{Serialize,Deserialize};
use num::Num;
use geo::{Coord,Rect};

pub mod macros;
pub mod fs;
pub mod net;
pub mod config;

// a global fn that can be used with serde(skip_serializing_if="odin_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }


/// a generic bounding box without semantics for the coordinate type
/// (the SRS is implied by the context in which it is used)
#[repr(C)]
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + PartialOrd> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }

    pub fn to_minmax_array (&self) -> [T;4] {
        [self.west,self.south,self.east,self.north]
    }

    pub fn width (&self) -> T { self.east - self.west }
    pub fn height (&self) -> T { self.north - self.south }

    pub fn is_empty (&self) -> bool {
        !(self.west < self.east && self.south < self.north)
    }

    /// the overlapping part of self and other, None if they do not overlap
    pub fn intersection (&self, other: &BoundingBox<T>) -> Option<BoundingBox<T>> {
        let bbox = BoundingBox {
            west: if other.west > self.west { other.west } else { self.west },
            south: if other.south > self.south { other.south } else { self.south },
            east: if other.east < self.east { other.east } else { self.east },
            north: if other.north < self.north { other.north } else { self.north },
        };
        if bbox.is_empty() { None } else { Some(bbox) }
    }

}

impl BoundingBox<f64> {
    pub fn from_rect (rect: &Rect<f64>) -> Self {
        BoundingBox { west: rect.min().x, south: rect.min().y, east: rect.max().x, north: rect.max().y }
    }

    pub fn to_rect (&self) -> Rect<f64> {
        Rect::new( Coord{x: self.west, y: self.south}, Coord{x: self.east, y: self.north})
    }
}
