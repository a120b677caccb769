use std::time::Duration;

use dashboard_core::{Job, JobFilters, JobId, NewJob};
use dashboard_logging::{dash_debug, dash_trace, job_scope};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{map_reqwest_error, ErrorResponse, ServiceError};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Service root, e.g. `http://localhost:5000/api`. Endpoint paths are
    /// appended to it, so a path prefix is kept.
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, ServiceError> {
        let url = Url::parse(base_url)
            .map_err(|err| ServiceError::InvalidUrl(format!("{base_url}: {err}")))?;
        if url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(format!(
                "{base_url}: cannot be a base url"
            )));
        }
        Ok(Self::new(url))
    }
}

/// The four operations the scheduler service exposes. No retry, no caching.
#[async_trait::async_trait]
pub trait JobsApi: Send + Sync {
    async fn list_jobs(&self, filters: JobFilters) -> Result<Vec<Job>, ServiceError>;

    async fn get_job(&self, job_id: JobId) -> Result<Job, ServiceError>;

    /// `job.payload` must already be parsed; this never sees raw payload text.
    async fn create_job(&self, job: &NewJob) -> Result<Job, ServiceError>;

    /// Resolves once the service accepted the run, not when the job is done.
    /// An empty acceptance body yields `Value::Null`.
    async fn run_job(&self, job_id: JobId) -> Result<serde_json::Value, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobsApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestJobsApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.settings.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ServiceError::InvalidUrl(format!(
                    "{}: cannot be a base url",
                    self.settings.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ServiceError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| ErrorResponse::from_body(&bytes));
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
        response.json::<T>().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl JobsApi for ReqwestJobsApi {
    async fn list_jobs(&self, filters: JobFilters) -> Result<Vec<Job>, ServiceError> {
        let mut url = self.endpoint(&["jobs"])?;
        let pairs = filters.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        dash_debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        let jobs: Vec<Job> = Self::decode(response).await?;
        dash_trace!("listed {} jobs", jobs.len());
        Ok(jobs)
    }

    async fn get_job(&self, job_id: JobId) -> Result<Job, ServiceError> {
        let url = self.endpoint(&["jobs", &job_id.to_string()])?;
        dash_trace!("{} GET {}", job_scope(job_id), url);
        let response = self.send(self.client.get(url)).await?;
        Self::decode(response).await
    }

    async fn create_job(&self, job: &NewJob) -> Result<Job, ServiceError> {
        let url = self.endpoint(&["jobs"])?;
        dash_debug!("POST {} task_name={:?}", url, job.task_name);
        let response = self.send(self.client.post(url).json(job)).await?;
        Self::decode(response).await
    }

    async fn run_job(&self, job_id: JobId) -> Result<serde_json::Value, ServiceError> {
        let url = self.endpoint(&["run-job", &job_id.to_string()])?;
        dash_debug!("{} POST {}", job_scope(job_id), url);
        let response = self.send(self.client.post(url)).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&body).map_err(|err| ServiceError::Decode(err.to_string()))
    }
}
