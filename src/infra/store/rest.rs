//! PostgREST adapter for the hosted posts table (Supabase and compatible).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Method, RequestBuilder, Response, Url,
    header::{AUTHORIZATION, HeaderValue},
};
use tracing::debug;

use crate::application::repos::{PostStore, StoreError};
use crate::domain::posts::{Post, PostFields, PostId};
use crate::infra::error::InfraError;

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "prefer";
const RETURN_MINIMAL: &str = "return=minimal";

#[derive(Clone, Debug)]
pub struct RestPostStore {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl RestPostStore {
    pub fn new(
        base: &Url,
        rest_path: &str,
        table: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InfraError> {
        let endpoint = table_endpoint(base, rest_path, table)?;
        let api_key = api_key.into();
        HeaderValue::from_str(&api_key)
            .map_err(|_| InfraError::configuration("store api key is not a valid header value"))?;

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build store client: {err}"))
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn user_agent() -> &'static str {
        concat!("postdeck/", env!("CARGO_PKG_VERSION"))
    }

    fn url_for(&self, id: Option<&PostId>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            match id {
                Some(id) => query.append_pair("id", &format!("eq.{id}")),
                None => query.append_pair("select", "*"),
            };
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder.send().await.map_err(StoreError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message: rejection_message(&body, status.canonical_reason()),
        })
    }
}

#[async_trait]
impl PostStore for RestPostStore {
    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        let url = self.url_for(None);
        debug!(target = "postdeck::store::rest", url = %url, "select posts");
        let response = self.send(self.request(Method::GET, url)).await?;
        let bytes = response.bytes().await.map_err(StoreError::transport)?;
        serde_json::from_slice(&bytes).map_err(StoreError::decode)
    }

    async fn insert(&self, fields: &PostFields) -> Result<(), StoreError> {
        let url = self.endpoint.clone();
        debug!(target = "postdeck::store::rest", url = %url, "insert post");
        let builder = self
            .request(Method::POST, url)
            .header(PREFER_HEADER, RETURN_MINIMAL)
            .json(&[fields]);
        self.send(builder).await.map(drop)
    }

    async fn update_by_id(&self, id: &PostId, fields: &PostFields) -> Result<(), StoreError> {
        let url = self.url_for(Some(id));
        debug!(target = "postdeck::store::rest", url = %url, "update post");
        let builder = self
            .request(Method::PATCH, url)
            .header(PREFER_HEADER, RETURN_MINIMAL)
            .json(fields);
        self.send(builder).await.map(drop)
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), StoreError> {
        let url = self.url_for(Some(id));
        debug!(target = "postdeck::store::rest", url = %url, "delete post");
        let builder = self
            .request(Method::DELETE, url)
            .header(PREFER_HEADER, RETURN_MINIMAL);
        self.send(builder).await.map(drop)
    }
}

fn table_endpoint(base: &Url, rest_path: &str, table: &str) -> Result<Url, InfraError> {
    if base.cannot_be_a_base() {
        return Err(InfraError::configuration(format!(
            "store url `{base}` cannot carry a path"
        )));
    }
    let table = table.trim().trim_matches('/');
    if table.is_empty() {
        return Err(InfraError::configuration("store table must not be empty"));
    }

    let segments: Vec<&str> = [base.path(), rest_path, table]
        .into_iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();

    let mut endpoint = base.clone();
    endpoint.set_path(&format!("/{}", segments.join("/")));
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    Ok(endpoint)
}

/// PostgREST reports failures as `{"message": ..}`; fall back to the raw body.
fn rejection_message(body: &str, reason: Option<&str>) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string));
    match parsed {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reason.unwrap_or("request failed").to_string(),
    }
}
