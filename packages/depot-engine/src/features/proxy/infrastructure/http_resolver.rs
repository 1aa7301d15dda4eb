//! reqwest-backed remote resolver

use crate::config::RemoteCheckConfig;
use crate::errors::{EngineError, Result};
use crate::features::proxy::ports::RemoteResolver;
use async_trait::async_trait;
use depot_storage::{RemoteRepository, Repository, RepositoryFiles, RepositoryPath};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::debug;

/// `<remote base>/<relative>`
pub fn remote_url(remote: &RemoteRepository, relative: &str) -> String {
    format!(
        "{}/{}",
        remote.url.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

pub struct HttpRemoteResolver {
    client: reqwest::Client,
    files: Arc<dyn RepositoryFiles>,
}

impl HttpRemoteResolver {
    pub fn new(config: &RemoteCheckConfig, files: Arc<dyn RepositoryFiles>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.connect_timeout() + config.read_timeout())
            .build()?;
        Ok(Self { client, files })
    }
}

#[async_trait]
impl RemoteResolver for HttpRemoteResolver {
    async fn path_exists(&self, url: &str) -> Result<bool> {
        let response = self.client.head(url).send().await?;
        debug!(url, status = response.status().as_u16(), "HEAD");
        Ok(response.status().is_success())
    }

    async fn fetch_remote_resource(&self, repository: &Repository, path: &RepositoryPath) -> Result<bool> {
        let remote = repository.remote.as_ref().ok_or_else(|| {
            EngineError::remote(format!("Repository {} has no remote", repository.key()))
        })?;
        let url = remote_url(remote, path.relativize());

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "GET");
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(EngineError::remote(format!("GET {} returned {}", url, status)));
        }

        let body = response.bytes().await?;
        self.files.write(path, &body)?;
        Ok(true)
    }
}
