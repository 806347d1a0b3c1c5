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

use std::path::Path;
use serde_json::Value;
use geo::{BoundingRect, Coord, LineString, Polygon, Rect};
use odin_common::{BoundingBox, fs};

use crate::errors::{Result, OdinDtmError, file_format_error};

/// the Area Of Interest for which we extract DTM data. Coordinates are EPSG:4326 (x=lon, y=lat)
#[derive(Debug,Clone)]
pub struct Aoi {
    /// input file stem, used to name outputs
    pub name: String,

    /// the GeoJSON geometry as read from the input (sent to the catalog as-is)
    pub geometry: geojson::Geometry,

    pub polygon: Polygon<f64>,
}

impl Aoi {
    pub fn from_file<P: AsRef<Path>> (path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::filepath_contents_as_string( &path)?;
        let name = fs::filestem( &path).unwrap_or("aoi").to_string();

        Self::from_json_str( name, &contents).map_err(|e| match e {
            OdinDtmError::FileFormatError(msg) => file_format_error( format!("{}: {msg}", fs::path_to_lossy_string(path))),
            other => other
        })
    }

    /// accepts a GeoJSON Feature, a bare geometry or a FeatureCollection (first feature)
    pub fn from_json_str (name: impl ToString, json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str( json).map_err(|e| file_format_error( format!("not a JSON document ({e})")))?;
        let geometry_value = geometry_value( &doc)?;

        let geometry: geojson::Geometry = serde_json::from_value( geometry_value.clone())
            .map_err(|e| file_format_error( format!("invalid geometry ({e})")))?;
        let polygon = to_polygon( &geometry)?;

        Ok( Aoi { name: name.to_string(), geometry, polygon } )
    }

    /// bounds of the exterior ring
    pub fn bbox (&self) -> Rect<f64> {
        // we only construct Aois with non-empty exterior rings
        self.polygon.exterior().bounding_rect().unwrap_or( Rect::new( Coord{x:0.0,y:0.0}, Coord{x:0.0,y:0.0}))
    }

    pub fn bounding_box (&self) -> BoundingBox<f64> {
        BoundingBox::from_rect( &self.bbox())
    }
}

const GEOMETRY_TYPES: &[&str] = &["Point", "MultiPoint", "LineString", "MultiLineString", "Polygon", "MultiPolygon", "GeometryCollection"];

fn geometry_value (doc: &Value) -> Result<&Value> {
    match doc.get("type").and_then(|t| t.as_str()) {
        Some("FeatureCollection") => {
            let feature = doc.get("features").and_then(|fs| fs.as_array()).and_then(|fs| fs.first())
                .ok_or( file_format_error("empty FeatureCollection"))?;
            geometry_value( feature)
        }
        Some(t) if GEOMETRY_TYPES.contains(&t) => Ok(doc),
        _ => match doc.get("geometry") {
            Some(Value::Null) | None => Err( file_format_error("no 'geometry'")),
            Some(geometry) => Ok(geometry)
        }
    }
}

fn to_polygon (geometry: &geojson::Geometry) -> Result<Polygon<f64>> {
    match &geometry.value {
        geojson::Value::Polygon(rings) => polygon_from_rings( rings),
        geojson::Value::MultiPolygon(polygons) if polygons.len() == 1 => polygon_from_rings( &polygons[0]),
        geojson::Value::MultiPolygon(polygons) => Err( file_format_error( format!("MultiPolygon with {} polygons not supported", polygons.len()))),
        other => Err( file_format_error( format!("unsupported geometry type {}", type_name(other))))
    }
}

fn type_name (value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

// note we do not check for closed or self-intersecting rings
fn polygon_from_rings (rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let mut line_strings: Vec<LineString<f64>> = Vec::with_capacity( rings.len());

    for ring in rings {
        let mut coords: Vec<Coord<f64>> = Vec::with_capacity( ring.len());
        for pos in ring {
            if pos.len() < 2 { return Err( file_format_error("position with less than 2 coordinates")) }
            coords.push( Coord{ x: pos[0], y: pos[1] });
        }
        line_strings.push( LineString::new( coords));
    }

    if line_strings.is_empty() || line_strings[0].0.is_empty() { return Err( file_format_error("polygon without exterior ring")) }

    let exterior = line_strings.remove(0);
    Ok( Polygon::new( exterior, line_strings) )
}
