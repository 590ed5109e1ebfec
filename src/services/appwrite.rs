use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Handles all communication with the Appwrite document database:
/// - Fetching a document by id
/// - Listing documents whose attribute equals a value
/// - Creating or replacing a document by id
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub profiles: String,
    pub applications: String,
    pub settings: String,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
        })
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection,
            urlencoding::encode(document_id)
        )
    }

    /// Fetch a document's data, `None` when it does not exist
    pub async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Value>, AppwriteError> {
        let url = self.document_url(collection, document_id);

        tracing::debug!("Fetching document from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED => return Err(AppwriteError::Unauthorized),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to fetch {}/{}: {} - {}", collection, document_id, status, body);
                return Err(AppwriteError::ApiError(format!(
                    "Failed to fetch document: {}",
                    status
                )));
            }
            _ => {}
        }

        let doc: Value = response.json().await?;

        if !doc.is_object() {
            return Err(AppwriteError::InvalidResponse("Document is not an object".into()));
        }

        // Extract document data from Appwrite document format
        let data = doc.get("data").cloned().unwrap_or(doc);

        Ok(Some(data))
    }

    /// List the data of every document whose `attribute` equals `value`
    pub async fn list_documents(
        &self,
        collection: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Value>, AppwriteError> {
        let query = format!("equal(\"{}\", [{}])", attribute, Value::from(value));

        let url = format!(
            "{}/databases/{}/collections/{}/documents?queries[]={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection,
            urlencoding::encode(&query)
        );

        tracing::debug!("Listing documents from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(AppwriteError::Unauthorized),
            status if !status.is_success() => {
                return Err(AppwriteError::ApiError(format!(
                    "Failed to list documents: {}",
                    status
                )));
            }
            _ => {}
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        Ok(documents
            .iter()
            .map(|doc| doc.get("data").unwrap_or(doc).clone())
            .collect())
    }

    /// Create or replace a document
    pub async fn upsert_document(
        &self,
        collection: &str,
        document_id: &str,
        data: Value,
    ) -> Result<(), AppwriteError> {
        let url = self.document_url(collection, document_id);

        let payload = json!({
            "documentId": document_id,
            "data": data,
        });

        let response = self
            .client
            .put(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AppwriteError::Unauthorized),
            status if !status.is_success() => Err(AppwriteError::ApiError(format!(
                "Failed to store document: {}",
                status
            ))),
            _ => {
                tracing::debug!("Stored document {}/{}", collection, document_id);
                Ok(())
            }
        }
    }
}
