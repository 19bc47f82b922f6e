//! Talks to a server that reads the filesystem on our behalf.
//!
//! `GET {base}/api/list-directory?dirPath=...` returns the node tree and
//! `POST {base}/api/get-files` returns the finished bundle text. Failures come back as
//! `{"error": "..."}` with a non-success status.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::ContentProvider;
use crate::core::{BundleOptions, CoreError, Node, PatternList};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetFilesRequest<'a> {
    dir_path: &'a str,
    selections: &'a [String],
}

#[derive(Debug, Clone)]
pub struct RemoteProvider {
    client: Client,
    base_url: String,
}

impl RemoteProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/api/{}", self.base_url, route)
    }

    /// Turns a non-success response into `CoreError::Provider`, using the server's message
    /// when it sent one.
    async fn check(response: Response) -> Result<Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("Server responded with {status}"));
        tracing::warn!("Remote provider error ({}): {}", status, message);
        Err(CoreError::Provider(message))
    }
}

#[async_trait]
impl ContentProvider for RemoteProvider {
    /// The server applies its own ignore rules, so `patterns` is unused here.
    async fn list_directory(
        &self,
        path: &str,
        _patterns: &PatternList,
    ) -> Result<Vec<Node>, CoreError> {
        let response = self
            .client
            .get(self.endpoint("list-directory"))
            .query(&[("dirPath", path)])
            .send()
            .await?;
        let nodes = Self::check(response).await?.json::<Vec<Node>>().await?;
        tracing::debug!("Remote listing of {} returned {} entries", path, nodes.len());
        Ok(nodes)
    }

    /// The server never exposes its `.gitignore`; the built-in defaults apply on this side.
    async fn read_gitignore(&self, _root: &str) -> Result<Option<String>, CoreError> {
        Ok(None)
    }

    async fn read_files(
        &self,
        root: &str,
        selections: &[String],
        _patterns: &PatternList,
        _options: BundleOptions,
    ) -> Result<String, CoreError> {
        // The root label is a selection marker, not something the server can read.
        let selections: Vec<String> = selections
            .iter()
            .filter(|path| path.as_str() != root && !path.is_empty())
            .cloned()
            .collect();
        let response = self
            .client
            .post(self.endpoint("get-files"))
            .json(&GetFilesRequest {
                dir_path: root,
                selections: &selections,
            })
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }
}
