/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
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

use odin_common::BoundingBox;

#[test]
fn test_intersection() {
    let a = BoundingBox::<f64>::new( 0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::<f64>::new( 5.0, -5.0, 20.0, 5.0);

    assert_eq!( a.intersection(&b), Some(BoundingBox::new( 5.0, 0.0, 10.0, 5.0)));

    let c = BoundingBox::<f64>::new( 11.0, 11.0, 12.0, 12.0);
    assert!( a.intersection(&c).is_none());

    // touching edges do not overlap
    let d = BoundingBox::<f64>::new( 10.0, 0.0, 12.0, 10.0);
    assert!( a.intersection(&d).is_none());
}

#[test]
fn test_rect_conversion() {
    let a = BoundingBox::<f64>::new( -123.5, 49.0, -122.5, 49.5);
    let r = a.to_rect();
    assert_eq!( BoundingBox::from_rect(&r), a);
    assert_eq!( a.width(), 1.0);
    assert_eq!( a.height(), 0.5);
    assert_eq!( a.to_minmax_array(), [-123.5, 49.0, -122.5, 49.5]);
    assert!( !a.is_empty());
    assert!( BoundingBox::<f64>::new( 1.0, 0.0, 1.0, 5.0).is_empty());
}
