use crate::models::ChefSummary;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading the chef directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Read-only client for the chef directory backend
///
/// Chef documents are listed from a single collection. The directory is never
/// written to from here.
pub struct ChefDirectoryClient {
    base_url: String,
    api_key: String,
    project_id: String,
    collection: String,
    client: Client,
}

impl ChefDirectoryClient {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        collection: String,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            collection,
            client,
        })
    }

    /// Fetch every listed chef
    ///
    /// Documents that do not parse as a [`ChefSummary`] are skipped.
    pub async fn list_chefs(&self) -> Result<Vec<ChefSummary>, DirectoryError> {
        let url = format!(
            "{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.collection
        );

        tracing::debug!("Fetching chefs from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("X-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DirectoryError::Unauthorized);
        }
        if !status.is_success() {
            return Err(DirectoryError::ApiError(format!(
                "Failed to list chefs: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing documents array".into()))?;

        let chefs: Vec<ChefSummary> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                match serde_json::from_value::<ChefSummary>(data.clone()) {
                    Ok(chef) => Some(chef),
                    Err(e) => {
                        tracing::warn!("Skipping malformed chef document: {}", e);
                        None
                    }
                }
            })
            .collect();

        tracing::debug!("Listed {} chefs ({} documents)", chefs.len(), documents.len());

        Ok(chefs)
    }
}
