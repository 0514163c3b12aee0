use crate::domain::model::{App, Domain, ListResponse, Organization, Route, Space};
use crate::domain::ports::CloudController;
use crate::utils::error::{ApiError, ApiStep, Result, WithStep};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// 查詢參數：同一個 key 可以有多個值，送出時會重複該 key
pub type QueryParams = BTreeMap<&'static str, Vec<String>>;

/// Cloud Controller v3 的唯讀 client
#[derive(Debug, Clone)]
pub struct CfApi {
    endpoint: String,
    token: String,
    client: Client,
}

impl CfApi {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(endpoint, token, Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            token: token.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 送出 GET，附上授權 header，並把回應解成 `T`
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        parameters: &QueryParams,
    ) -> std::result::Result<T, ApiError> {
        let url = format!("{}{}", self.endpoint, path);
        let query = encode_query(parameters);

        let mut request = self.client.get(&url).header(AUTHORIZATION, &self.token);
        if !query.is_empty() {
            request = request.query(&query);
        }

        tracing::debug!("📡 GET {} {:?}", url, query);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 GET {}: API response status: {}", path, status);

        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    // TODO: follow `pagination.next` once callers can cope with more than one page
    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        parameters: &QueryParams,
    ) -> std::result::Result<Vec<T>, ApiError> {
        let page: ListResponse<T> = self.get(path, parameters).await?;
        if page.has_more_pages() {
            tracing::warn!(
                "⚠️ {} returned {} results over {} pages, only the first page is used",
                path,
                page.pagination.total_results,
                page.pagination.total_pages
            );
        }
        Ok(page.resources)
    }
}

/// 依 key 排序展開成 `(key, value)`，重複的值各自成為一組
pub fn encode_query(parameters: &QueryParams) -> Vec<(&'static str, &str)> {
    parameters
        .iter()
        .flat_map(|(key, values)| values.iter().map(move |value| (*key, value.as_str())))
        .collect()
}

#[async_trait]
impl CloudController for CfApi {
    async fn get_domains(&self, names: &[String]) -> Result<Vec<Domain>> {
        let parameters = QueryParams::from([("names", names.to_vec())]);
        self.list("/v3/domains", &parameters)
            .await
            .with_step(ApiStep::GetDomains)
    }

    async fn get_routes(&self, hosts: &[String], domain_guids: &[String]) -> Result<Vec<Route>> {
        let parameters = QueryParams::from([
            ("hosts", hosts.to_vec()),
            ("domain_guids", domain_guids.to_vec()),
        ]);
        self.list("/v3/routes", &parameters)
            .await
            .with_step(ApiStep::GetRoutes)
    }

    async fn get_app(&self, guid: &str) -> Result<App> {
        self.get(&format!("/v3/apps/{}", guid), &QueryParams::new())
            .await
            .with_step(ApiStep::GetApp)
    }

    async fn get_space(&self, guid: &str) -> Result<Space> {
        self.get(&format!("/v3/spaces/{}", guid), &QueryParams::new())
            .await
            .with_step(ApiStep::GetSpace)
    }

    async fn get_organization(&self, guid: &str) -> Result<Organization> {
        self.get(&format!("/v3/organizations/{}", guid), &QueryParams::new())
            .await
            .with_step(ApiStep::GetOrganization)
    }
}
