//! HTTP implementation of the timesheet and catalog APIs

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ApiError, CatalogApi, TimesheetApi};
use crate::config::ApiConfig;
use crate::submit::ClockInPayload;
use crate::types::{
    ActiveTimesheet, CreatedTimesheet, PreviousTimesheet, PreviousWork, SelectOption,
};

/// Timesheet backend client over HTTP/JSON
pub struct HttpTimesheetApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    id: String,
}

impl HttpTimesheetApi {
    /// Create a client from the API section of the config
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::NotConfigured);
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::network(config.base_url.clone(), e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document; 404 maps to `Ok(None)`
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(path, e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => {}
            401 | 403 => return Err(ApiError::unauthorized(path)),
            404 => return Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::http(path, status, body));
            }
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| ApiError::decode(path, e.to_string()))
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        Ok(self.get_optional(path).await?.unwrap_or_default())
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(path, e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => {}
            401 | 403 => return Err(ApiError::unauthorized(path)),
            404 => return Err(ApiError::not_found(path)),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::http(path, status, body));
            }
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::decode(path, e.to_string()))
    }
}

/// Path a timesheet payload is posted to, one per work role
pub(crate) fn timesheet_path(payload: &ClockInPayload) -> String {
    format!("/api/v1/timesheets/{}", payload.work_type.key())
}

#[async_trait]
impl TimesheetApi for HttpTimesheetApi {
    async fn fetch_recent_timesheet(
        &self,
        user_id: &str,
    ) -> Result<Option<PreviousTimesheet>, ApiError> {
        self.get_optional(&format!("/api/v1/users/{}/timesheets/recent", user_id))
            .await
    }

    async fn fetch_previous_work(
        &self,
        timesheet_id: &str,
    ) -> Result<Option<PreviousWork>, ApiError> {
        self.get_optional(&format!("/api/v1/timesheets/{}/work", timesheet_id))
            .await
    }

    async fn create_session(&self, user_id: &str) -> Result<String, ApiError> {
        let response: CreateSessionResponse = self
            .post_json("/api/v1/sessions", &CreateSessionRequest { user_id })
            .await?;
        Ok(response.id)
    }

    async fn create_timesheet(
        &self,
        payload: &ClockInPayload,
    ) -> Result<CreatedTimesheet, ApiError> {
        self.post_json(&timesheet_path(payload), payload).await
    }

    async fn fetch_active_timesheet(
        &self,
        user_id: &str,
    ) -> Result<Option<ActiveTimesheet>, ApiError> {
        self.get_optional(&format!("/api/v1/users/{}/timesheets/active", user_id))
            .await
    }
}

#[async_trait]
impl CatalogApi for HttpTimesheetApi {
    async fn jobsites(&self) -> Result<Vec<SelectOption>, ApiError> {
        self.get_list("/api/v1/jobsites").await
    }

    async fn cost_codes(&self) -> Result<Vec<SelectOption>, ApiError> {
        self.get_list("/api/v1/cost-codes").await
    }

    async fn equipment(&self) -> Result<Vec<SelectOption>, ApiError> {
        self.get_list("/api/v1/equipment").await
    }

    async fn trucks(&self) -> Result<Vec<SelectOption>, ApiError> {
        self.get_list("/api/v1/trucks").await
    }
}
