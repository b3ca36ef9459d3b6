use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use testbed_core::types::{Entity, EntityId, SaveEntity};

const API_BASE: &str = "/api/test";

/// Thin HTTP client for the entity API.
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            http: Client::new(),
            base: format!("{}{API_BASE}", server_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    pub async fn health(&self) -> anyhow::Result<String> {
        text(self.http.get(self.url("health"))).await
    }

    pub async fn create(&self, entity: &SaveEntity) -> anyhow::Result<Entity> {
        json(self.http.post(self.url("create")).json(entity)).await
    }

    pub async fn list(&self) -> anyhow::Result<Vec<Entity>> {
        json(self.http.get(self.url("all"))).await
    }

    pub async fn get(&self, id: EntityId) -> anyhow::Result<Entity> {
        json(self.http.get(self.url(&id.to_string()))).await
    }

    pub async fn update(&self, id: EntityId, entity: &SaveEntity) -> anyhow::Result<Entity> {
        json(self.http.put(self.url(&id.to_string())).json(entity)).await
    }

    pub async fn delete(&self, id: EntityId) -> anyhow::Result<String> {
        text(self.http.delete(self.url(&id.to_string()))).await
    }

    pub async fn search(&self, name: &str, exact: bool) -> anyhow::Result<Vec<Entity>> {
        let request = self
            .http
            .get(self.url("search"))
            .query(&[("name", name), ("exact", if exact { "true" } else { "false" })]);
        json(request).await
    }
}

async fn send(request: RequestBuilder) -> anyhow::Result<Response> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        if body.is_empty() {
            anyhow::bail!("request failed: {status}");
        }
        anyhow::bail!("request failed: {status}: {body}");
    }
    tracing::debug!(%status, url = %resp.url(), "request succeeded");
    Ok(resp)
}

async fn json<T: DeserializeOwned>(request: RequestBuilder) -> anyhow::Result<T> {
    Ok(send(request).await?.json().await?)
}

async fn text(request: RequestBuilder) -> anyhow::Result<String> {
    Ok(send(request).await?.text().await?)
}
