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

///! common utility functions for network operations

use reqwest::{header::{HeaderMap,HeaderValue,ACCEPT,CONTENT_TYPE}, Client, StatusCode, Response};
use serde::{de::DeserializeOwned,Serialize};

use crate::define_error;

define_error!{ pub OdinNetError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    NotFoundError(String) : "not found {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    OpFailed(String) : "operation failed: {0}",
    ParseError(String) : "parse error: {0}"
}

pub type Result<T> = std::result::Result<T, OdinNetError>;

fn json_headers () -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/geo+json, application/json"));
    headers
}

/// GET a JSON document from `url` and deserialize it into U
pub async fn get_json_query<U> (client: &Client, url: &str) -> Result<U> where U: DeserializeOwned {
    let response = client.get( url)
        .header( ACCEPT, HeaderValue::from_static("application/geo+json, application/json"))
        .send().await?;

    from_json( check_status( url, response)?).await
}

/// POST `data` as JSON to `url` and deserialize the JSON response into U
pub async fn post_json_query<T,U> (client: &Client, url: &str, data: &T) -> Result<U> where T: Serialize, U: DeserializeOwned {
    let response = client.post( url)
        .headers( json_headers())
        .json( data)
        .send().await?;

    from_json( check_status( url, response)?).await
}

fn check_status (url: &str, response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::NOT_FOUND => Err( OdinNetError::NotFoundError(format!("{url}"))),
        other => Err( OdinNetError::OpFailed(format!("{url} response status {other:?}")))
    }
}

pub async fn from_json<T> (response: Response)->Result<T> where T: DeserializeOwned {
    let bytes = response.bytes().await?;
    serde_json::from_slice( &bytes).map_err(|e| OdinNetError::ParseError(e.to_string()))
}
