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

//! minimal client for STAC (SpatioTemporal Asset Catalog) APIs. We only support what is required to
//! find items of a collection that intersect a given area: the landing page, item search (POST) and
//! `next` link pagination (GET or POST, with optional body merge)

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use odin_common::{is_none, net::{get_json_query, post_json_query}};

pub mod errors;
use errors::{Result, OdinStacError, protocol_error};

/* #region types  **********************************************************************************/

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Link {
    pub rel: String,
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "is_none")]
    pub title: Option<String>,

    // the following are STAC API extensions for links that require a request body (pagination of POST searches)
    #[serde(default, skip_serializing_if = "is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "is_none")]
    pub body: Option<Map<String,Value>>,

    #[serde(default, skip_serializing_if = "is_none")]
    pub merge: Option<bool>,
}

impl Link {
    pub fn is_post (&self) -> bool {
        self.method.as_ref().map( |m| m.eq_ignore_ascii_case("POST")).unwrap_or(false)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct LandingPage {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "conformsTo", default)]
    pub conforms_to: Vec<String>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl LandingPage {
    /// the item search endpoint. Services that support both methods might list it twice, we prefer POST
    pub fn search_link (&self) -> Option<&Link> {
        let mut search_links = self.links.iter().filter( |l| l.rel == "search");
        let first = search_links.next()?;
        if first.is_post() || first.method.is_none() {
            Some(first)
        } else {
            search_links.find( |l| l.is_post()).or( Some(first))
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Item {
    pub id: String,

    #[serde(default)]
    pub collection: Option<String>,

    #[serde(default)]
    pub bbox: Option<Vec<f64>>,

    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,

    #[serde(default)]
    pub properties: Map<String,Value>,

    #[serde(default)]
    pub assets: HashMap<String,Asset>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl Item {
    pub fn asset_href (&self, key: &str) -> Option<&str> {
        self.assets.get( key).map( |a| a.href.as_str())
    }
}

/// the (GeoJSON FeatureCollection) response of an item search
#[derive(Deserialize, Debug, Clone)]
pub struct ItemCollection {
    #[serde(default)]
    pub features: Vec<Item>,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(rename = "numberMatched", default)]
    pub number_matched: Option<u64>,

    #[serde(rename = "numberReturned", default)]
    pub number_returned: Option<u64>,
}

impl ItemCollection {
    pub fn next_link (&self) -> Option<&Link> {
        self.links.iter().find( |l| l.rel == "next")
    }
}

/// item search parameters. Only set fields are sent
#[derive(Serialize, Debug, Clone, Default)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,

    #[serde(skip_serializing_if = "is_none")]
    pub intersects: Option<geojson::Geometry>,

    #[serde(skip_serializing_if = "is_none")]
    pub bbox: Option<[f64;4]>,

    #[serde(skip_serializing_if = "is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "is_none")]
    pub limit: Option<usize>,
}

impl SearchParams {
    pub fn for_collection (collection: impl ToString) -> Self {
        SearchParams { collections: vec![collection.to_string()], ..Default::default() }
    }

    pub fn with_intersects (mut self, geometry: geojson::Geometry) -> Self {
        self.intersects = Some(geometry);
        self
    }

    /// note that `bbox` is in (west,south,east,north) degrees
    pub fn with_bbox (mut self, bbox: [f64;4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_datetime (mut self, datetime: impl ToString) -> Self {
        self.datetime = Some(datetime.to_string());
        self
    }

    pub fn with_limit (mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// a single page request of an item search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Get { url: String },
    Post { url: String, body: Value },
}

impl SearchRequest {
    pub fn url (&self) -> &str {
        match self {
            SearchRequest::Get{url} => url.as_str(),
            SearchRequest::Post{url,..} => url.as_str(),
        }
    }
}

/* #endregion types */

/* #region pagination ****************************************************************************/

/// resolve a (possibly relative) link href against the URL of the document that contained it
pub fn resolve_href (base: &str, href: &str) -> Result<String> {
    let base = Url::parse( base)?;
    Ok( base.join( href)?.to_string() )
}

/// compute the request for the page following `current`, based on the `next` link of the current response.
/// POST links without a body repeat the current body, `merge:true` links overlay their body on the current one
pub fn next_request (current: &SearchRequest, next: &Link) -> Result<SearchRequest> {
    let url = resolve_href( current.url(), &next.href)?;

    if next.is_post() {
        let current_body = match current {
            SearchRequest::Post{body,..} => body.clone(),
            SearchRequest::Get{..} => Value::Object( Map::new())
        };

        let body = match &next.body {
            Some(link_body) => {
                if next.merge.unwrap_or(false) {
                    let mut merged = match current_body {
                        Value::Object(map) => map,
                        _ => Map::new()
                    };
                    for (k,v) in link_body {
                        merged.insert( k.clone(), v.clone());
                    }
                    Value::Object(merged)
                } else {
                    Value::Object( link_body.clone())
                }
            }
            None => current_body
        };

        Ok( SearchRequest::Post{ url, body } )

    } else {
        Ok( SearchRequest::Get{ url } )
    }
}

/* #endregion pagination */

/* #region client ********************************************************************************/

pub struct StacClient {
    http: Client,
    api_url: String,
    search_url: String,
}

impl StacClient {
    /// create a client without contacting the server. The search endpoint is assumed to be `<api_url>/search`
    pub fn new (api_url: &str) -> Result<Self> {
        let api_url = normalized_api_url( api_url);
        let search_url = resolve_href( &api_url, "search")?;
        Ok( StacClient { http: Client::new(), api_url, search_url } )
    }

    /// create a client from the landing page of the API, which tells us where the search endpoint is
    pub async fn open (api_url: &str) -> Result<Self> {
        let mut client = Self::new( api_url)?;
        let landing_page = client.landing_page().await?;

        if let Some(link) = landing_page.search_link() {
            client.search_url = resolve_href( &client.api_url, &link.href)?;
        } else {
            warn!("no search link in landing page of {}, using {}", client.api_url, client.search_url);
        }

        debug!("opened STAC API {:?} with search endpoint {}", landing_page.title, client.search_url);
        Ok(client)
    }

    pub fn api_url (&self) -> &str { self.api_url.as_str() }
    pub fn search_url (&self) -> &str { self.search_url.as_str() }

    pub async fn landing_page (&self) -> Result<LandingPage> {
        Ok( get_json_query( &self.http, &self.api_url).await? )
    }

    /// run an item search and follow `next` links until the result is exhausted or we have `max_items`.
    /// Item order is whatever the service returns
    pub async fn search (&self, params: &SearchParams, max_items: Option<usize>) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = Vec::new();
        let mut request = SearchRequest::Post{ url: self.search_url.clone(), body: serde_json::to_value( params)? };
        let mut n_pages = 0;

        loop {
            let page: ItemCollection = self.get_page( &request).await?;
            n_pages += 1;
            debug!("search page {} from {} returned {} items", n_pages, request.url(), page.features.len());

            let n_page_items = page.features.len();
            for item in page.features.iter() {
                if max_items.is_some_and( |max| items.len() >= max) { break }
                items.push( item.clone());
            }

            if n_page_items == 0 || max_items.is_some_and( |max| items.len() >= max) { break }

            match page.next_link() {
                Some(link) => {
                    let next = next_request( &request, link)?;
                    if next == request {
                        return Err( protocol_error!("next link of {} points to itself", request.url()))
                    }
                    request = next;
                }
                None => break
            }
        }

        Ok(items)
    }

    async fn get_page (&self, request: &SearchRequest) -> Result<ItemCollection> {
        match request {
            SearchRequest::Get{url} => Ok( get_json_query( &self.http, url).await? ),
            SearchRequest::Post{url,body} => Ok( post_json_query( &self.http, url, body).await? ),
        }
    }
}

/// relative references are resolved against the API URL, which therefore has to end with '/'
fn normalized_api_url (api_url: &str) -> String {
    if api_url.ends_with('/') { api_url.to_string() } else { format!("{api_url}/") }
}

/* #endregion client */
