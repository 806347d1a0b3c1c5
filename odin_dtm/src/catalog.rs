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

use std::collections::HashMap;
use async_trait::async_trait;
use tracing::info;

use odin_common::BoundingBox;
use odin_stac::{Item, SearchParams, StacClient};
use crate::config::CatalogConfig;
use crate::errors::{Result, OdinDtmError};

/// the part of a catalog item we need: its id and the hrefs of its assets
#[derive(Debug,Clone,PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub assets: HashMap<String,String>,
}

impl CatalogItem {
    pub fn new (id: impl ToString) -> Self {
        CatalogItem { id: id.to_string(), assets: HashMap::new() }
    }

    pub fn with_asset (mut self, key: impl ToString, href: impl ToString) -> Self {
        self.assets.insert( key.to_string(), href.to_string());
        self
    }

    pub fn asset_href (&self, key: &str) -> Option<&str> {
        self.assets.get( key).map(|s| s.as_str())
    }

    pub fn require_asset_href (&self, key: &str) -> Result<&str> {
        self.asset_href( key).ok_or_else(|| OdinDtmError::MissingAssetError( self.id.clone(), key.to_string()))
    }
}

impl From<Item> for CatalogItem {
    fn from (item: Item) -> Self {
        let assets = item.assets.into_iter().map(|(k,a)| (k, a.href)).collect();
        CatalogItem { id: item.id, assets }
    }
}

/// spatial restriction of catalog queries
#[derive(Debug,Clone)]
pub enum SpatialFilter {
    /// precise, the AOI geometry as given by the user
    Intersects(geojson::Geometry),
    /// coarse, lon/lat degrees
    BBox(BoundingBox<f64>),
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// items of our collection that match `filter`, in service order. Can be empty
    async fn search (&self, filter: &SpatialFilter, max_items: Option<usize>) -> Result<Vec<CatalogItem>>;

    /// same as `search` but an empty result is a `NotFoundError`
    async fn query_items (&self, filter: &SpatialFilter, max_items: Option<usize>) -> Result<Vec<CatalogItem>> {
        let items = self.search( filter, max_items).await?;
        if items.is_empty() {
            Err( OdinDtmError::NotFoundError( "no items found for the given AOI".to_string()))
        } else {
            Ok(items)
        }
    }
}

/// [`Catalog`] for one collection of a STAC API
pub struct StacCatalog {
    client: StacClient,
    collection: String,
    page_limit: Option<usize>,
    datetime: Option<String>,
}

impl StacCatalog {
    pub async fn open (config: &CatalogConfig) -> Result<Self> {
        let client = StacClient::open( &config.api_url).await?;
        Ok( Self::with_client( client, config) )
    }

    pub fn with_client (client: StacClient, config: &CatalogConfig) -> Self {
        StacCatalog {
            client,
            collection: config.collection.clone(),
            page_limit: config.page_limit,
            datetime: config.datetime.clone()
        }
    }

    pub fn collection (&self) -> &str { self.collection.as_str() }

    /// the item search request body for `filter`
    pub fn search_params (&self, filter: &SpatialFilter) -> SearchParams {
        let mut params = SearchParams::for_collection( &self.collection);
        params = match filter {
            SpatialFilter::Intersects(geometry) => params.with_intersects( geometry.clone()),
            SpatialFilter::BBox(bbox) => params.with_bbox( bbox.to_minmax_array()),
        };
        if let Some(limit) = self.page_limit { params = params.with_limit( limit) }
        if let Some(datetime) = &self.datetime { params = params.with_datetime( datetime) }
        params
    }
}

#[async_trait]
impl Catalog for StacCatalog {
    async fn search (&self, filter: &SpatialFilter, max_items: Option<usize>) -> Result<Vec<CatalogItem>> {
        let params = self.search_params( filter);
        let items = self.client.search( &params, max_items).await?;
        info!("{} items of collection {} found", items.len(), self.collection);

        Ok( items.into_iter().map( CatalogItem::from).collect() )
    }
}
