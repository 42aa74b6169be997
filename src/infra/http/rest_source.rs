use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::query::{ListQuery, QueryParamStyle};
use crate::domain::entities::row::{value_text, Row};
use crate::usecase::ports::source::{PageRequest, PageResponse, PageSource, SourceError};

mod constants {
    pub const USER_AGENT: &str = concat!("admin-grid/", env!("CARGO_PKG_VERSION"));
    pub const ERROR_BODY_LIMIT: usize = 200;
}

/// Turns list parameters into the URL to call.
pub type EndpointBuilder = Arc<dyn Fn(&ListQuery) -> Result<Url, SourceError> + Send + Sync>;

/// `base_url` + `path` with the query encoded per `style`.
pub fn standard_endpoint(base_url: &str, path: &str, style: QueryParamStyle) -> EndpointBuilder {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Arc::new(move |query: &ListQuery| {
        let mut url = Url::parse(&joined)
            .map_err(|err| SourceError::Transport(format!("invalid url {joined}: {err}")))?;
        url.query_pairs_mut().extend_pairs(query.to_pairs(&style));
        Ok(url)
    })
}

/// Where the interesting parts live in a list response, as JSON pointers.
/// Lists of pointers are tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMap {
    pub rows: String,
    pub total_pages: Vec<String>,
    pub current_page: Vec<String>,
    pub total_count: Vec<String>,
    pub filter_options: Vec<String>,
}

impl Default for ResponseMap {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|item| item.to_string()).collect();
        Self {
            rows: "/data".to_string(),
            total_pages: owned(&["/total_pages", "/totalPages", "/pagination/total_pages"]),
            current_page: owned(&["/current_page", "/pagination/current_page"]),
            total_count: owned(&["/total_count", "/totalCount", "/total"]),
            filter_options: owned(&["/filter_options", "/available_options", "/filter_fields"]),
        }
    }
}

fn first_u64(body: &Value, pointers: &[String]) -> Option<u64> {
    pointers
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find_map(|value| match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
}

pub fn decode_page(
    body: &Value,
    map: &ResponseMap,
    query: &ListQuery,
) -> Result<PageResponse, SourceError> {
    let rows = match body.pointer(&map.rows) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row.clone()),
                other => Err(SourceError::Decode(format!(
                    "row at {} is not an object: {other}",
                    map.rows
                ))),
            })
            .collect::<Result<Vec<Row>, _>>()?,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(SourceError::Decode(format!(
                "{} is not an array: {other}",
                map.rows
            )))
        }
    };

    let total_count = first_u64(body, &map.total_count);
    let total_pages = match first_u64(body, &map.total_pages) {
        Some(pages) => pages,
        None => match total_count {
            Some(count) => count.div_ceil(u64::from(query.rows_per_page.get())),
            None => u64::from(!rows.is_empty()),
        },
    };
    let current_page = first_u64(body, &map.current_page).and_then(|page| u32::try_from(page).ok());

    let filter_options = map
        .filter_options
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find_map(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(name, values)| {
                    let values = values.as_array()?;
                    Some((
                        name.clone(),
                        values
                            .iter()
                            .map(value_text)
                            .filter(|text| !text.is_empty())
                            .collect(),
                    ))
                })
                .collect::<BTreeMap<String, Vec<String>>>()
        })
        .unwrap_or_default();

    Ok(PageResponse {
        rows,
        total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        current_page,
        total_count,
        filter_options,
    })
}

pub fn create_client() -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(constants::USER_AGENT)
        .build()
        .map_err(|err| SourceError::Transport(err.to_string()))
}

/// Page source talking to a JSON REST backend.
#[derive(Clone)]
pub struct RestPageSource {
    client: Client,
    list_endpoint: EndpointBuilder,
    export_endpoint: Option<EndpointBuilder>,
    response: ResponseMap,
}

impl RestPageSource {
    pub fn new(
        client: Client,
        list_endpoint: EndpointBuilder,
        export_endpoint: Option<EndpointBuilder>,
        response: ResponseMap,
    ) -> Self {
        Self {
            client,
            list_endpoint,
            export_endpoint,
            response,
        }
    }

    async fn get(&self, url: Url, cancel: &CancellationToken) -> Result<reqwest::Response, SourceError> {
        tracing::debug!(%url, "GET");
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            sent = self.client.get(url).send() => {
                sent.map_err(|err| SourceError::Transport(err.to_string()))?
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SourceError::Status {
            status: status.as_u16(),
            body: body.chars().take(constants::ERROR_BODY_LIMIT).collect(),
        })
    }
}

impl std::fmt::Debug for RestPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPageSource")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource for RestPageSource {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: CancellationToken,
    ) -> Result<PageResponse, SourceError> {
        let url = (self.list_endpoint)(&request.query)?;
        let response = self.get(url, &cancel).await?;
        let body: Value = tokio::select! {
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            body = response.json() => body.map_err(|err| SourceError::Decode(err.to_string()))?,
        };
        decode_page(&body, &self.response, &request.query)
    }

    async fn export_csv(
        &self,
        request: &PageRequest,
        cancel: CancellationToken,
    ) -> Result<String, SourceError> {
        let Some(endpoint) = &self.export_endpoint else {
            return Err(SourceError::Unsupported("csv export"));
        };
        let url = endpoint(&request.query)?;
        let response = self.get(url, &cancel).await?;
        tokio::select! {
            _ = cancel.cancelled() => Err(SourceError::Cancelled),
            text = response.text() => text.map_err(|err| SourceError::Transport(err.to_string())),
        }
    }
}
