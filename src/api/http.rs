use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{CatService, ImageQuery, ImageUpload};
use crate::app::{Result, WhiskerError};
use crate::config::ApiConfig;
use crate::domain::{Breed, Cat, Category};

pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1/";

/// reqwest-backed [`CatService`].
pub struct HttpCatService {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpCatService {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("whisker/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Join a path onto the base URL. The base URL must end with `/` or
    /// the final path segment would be replaced instead of extended.
    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        request
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(classify)?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| WhiskerError::Unknown(format!("Failed to decode response: {}", e)))
    }
}

#[async_trait]
impl CatService for HttpCatService {
    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<Cat>> {
        tracing::debug!(?query, "Searching images");
        let url = self.endpoint("images/search")?;
        let request = self.request(Method::GET, url).query(&query.to_query());
        let cats: Vec<Cat> = self.execute_json(request).await?;
        tracing::debug!("Fetched {} cats", cats.len());
        Ok(cats)
    }

    async fn get_image(&self, image_id: &str) -> Result<Cat> {
        tracing::debug!(image_id, "Fetching image");
        let url = self.endpoint(&format!("images/{}", image_id))?;
        self.execute_json(self.request(Method::GET, url)).await
    }

    async fn upload_image(&self, upload: &ImageUpload) -> Result<Cat> {
        tracing::debug!(filename = %upload.filename, "Uploading image");
        let url = self.endpoint("images/upload")?;

        let part = multipart::Part::bytes(upload.bytes.clone()).file_name(upload.filename.clone());
        let mut form = multipart::Form::new().part("file", part);
        if let Some(sub_id) = &upload.sub_id {
            form = form.text("sub_id", sub_id.clone());
        }
        if let Some(breed_ids) = &upload.breed_ids {
            form = form.text("breed_ids", breed_ids.clone());
        }

        let request = self.request(Method::POST, url).multipart(form);
        self.execute_json(request).await
    }

    async fn delete_image(&self, image_id: &str) -> Result<()> {
        tracing::debug!(image_id, "Deleting image");
        let url = self.endpoint(&format!("images/{}", image_id))?;
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(classify)?;
        check_status(response).await?;
        Ok(())
    }

    async fn list_breeds(
        &self,
        attach_breed: Option<i32>,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> Result<Vec<Breed>> {
        tracing::debug!(?page, ?limit, "Fetching breeds");
        let url = self.endpoint("breeds")?;

        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(attach_breed) = attach_breed {
            pairs.push(("attach_breed", attach_breed.to_string()));
        }
        if let Some(page) = page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = limit {
            pairs.push(("limit", limit.to_string()));
        }

        let request = self.request(Method::GET, url).query(&pairs);
        self.execute_json(request).await
    }

    async fn search_breeds(&self, query: &str) -> Result<Vec<Breed>> {
        tracing::debug!(query, "Searching breeds");
        let url = self.endpoint("breeds/search")?;
        let request = self.request(Method::GET, url).query(&[("q", query)]);
        self.execute_json(request).await
    }

    async fn list_categories(&self, limit: Option<i32>, page: Option<i32>) -> Result<Vec<Category>> {
        tracing::debug!("Fetching categories");
        let url = self.endpoint("categories")?;

        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(page) = page {
            pairs.push(("page", page.to_string()));
        }

        let request = self.request(Method::GET, url).query(&pairs);
        self.execute_json(request).await
    }
}

/// Reject non-2xx responses, carrying the status code and body text.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(code = status.as_u16(), "Remote returned error status");
    Err(WhiskerError::Http {
        code: status.as_u16(),
        message,
    })
}

/// Classify a reqwest failure into the transport/unknown taxonomy.
/// Status errors never reach this path; `check_status` handles those.
fn classify(err: reqwest::Error) -> WhiskerError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        WhiskerError::Transport(err.to_string())
    } else {
        WhiskerError::Unknown(err.to_string())
    }
}
