use std::collections::HashMap;
use std::env;

use reqwest::Client;
use serde::Deserialize;

use trilha_core::{CourseCatalog, CourseId, LessonId};

use crate::error::ApiError;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("TRILHA_API_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let bearer_token = env::var("TRILHA_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Some(Self {
            base_url,
            bearer_token,
        })
    }
}

/// Typed client for the learning platform's REST API.
///
/// The client is optional by design: without `TRILHA_API_URL` every call
/// returns `ApiError::Disabled` and callers fall back to local data.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Option<ApiConfig>,
}

impl ApiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ApiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Fetch the course catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the client is disabled or the request fails.
    pub async fn fetch_catalog(&self) -> Result<CourseCatalog, ApiError> {
        self.get("/courses").await
    }

    /// Fetch server-side completion state for one course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the client is disabled or the request fails.
    pub async fn fetch_course_progress(
        &self,
        course: &CourseId,
    ) -> Result<CourseProgress, ApiError> {
        self.get(&format!("/progress/course/{course}")).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let config = self.config.as_ref().ok_or(ApiError::Disabled)?;
        let url = format!("{}{path}", config.base_url.trim_end_matches('/'));

        let mut request = self.client.get(url);
        if let Some(token) = &config.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

/// Server-side completion summary for one course.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseProgress {
    pub course_id: CourseId,
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub remaining_lessons: u32,
    pub completion_pct: f64,
    pub lesson_status: HashMap<LessonId, bool>,
}
