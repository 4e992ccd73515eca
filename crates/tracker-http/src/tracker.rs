use async_trait::async_trait;
use serde::de::DeserializeOwned;

use railyard_tracker::{
    NewRun, ProjectId, ResultsForCases, Run, RunId, Suite, SuiteId, TrackerError,
};

use crate::config::HttpTrackerConfig;
use crate::error::{api_error, map_reqwest_err};

/// `TrackerApi` over the TestRail REST API v2.
pub struct HttpTracker {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl HttpTracker {
    pub fn new(config: HttpTrackerConfig) -> Result<Self, TrackerError> {
        let base_url = config.host.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TrackerError::Config("tracker host is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TrackerError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            user: config.user,
            password: config.password,
        })
    }

    /// TestRail routes every API call through `index.php?/api/v2/...`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/index.php?/api/v2/{path}", self.base_url)
    }

    fn authed(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, TrackerError> {
        let resp = req.send().await.map_err(map_reqwest_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, TrackerError> {
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await.map_err(map_reqwest_err)?;
        serde_json::from_slice(&bytes).map_err(|e| TrackerError::Decode(e.to_string()))
    }
}

#[async_trait]
impl railyard_tracker::TrackerApi for HttpTracker {
    /// `GET index.php?/api/v2/get_suite/:suite_id`
    async fn get_suite(&self, suite_id: SuiteId) -> Result<Suite, TrackerError> {
        let path = format!("get_suite/{suite_id}");
        self.send_json(self.authed(reqwest::Method::GET, &path))
            .await
    }

    /// `POST index.php?/api/v2/add_run/:project_id`
    async fn add_run(&self, project_id: ProjectId, run: &NewRun) -> Result<Run, TrackerError> {
        let path = format!("add_run/{project_id}");
        let body = serde_json::to_vec(run)?;
        let req = self.authed(reqwest::Method::POST, &path).body(body);
        let created: Run = self.send_json(req).await?;
        tracing::debug!(run_id = %created.id, suite_id = %run.suite_id, "testrail run created");
        Ok(created)
    }

    /// `POST index.php?/api/v2/add_results_for_cases/:run_id`
    async fn add_results_for_cases(
        &self,
        run_id: RunId,
        results: &ResultsForCases,
    ) -> Result<(), TrackerError> {
        let path = format!("add_results_for_cases/{run_id}");
        let body = serde_json::to_vec(results)?;
        self.send(self.authed(reqwest::Method::POST, &path).body(body))
            .await?;
        Ok(())
    }

    /// `POST index.php?/api/v2/close_run/:run_id`
    async fn close_run(&self, run_id: RunId) -> Result<(), TrackerError> {
        let path = format!("close_run/{run_id}");
        self.send(self.authed(reqwest::Method::POST, &path).body("{}"))
            .await?;
        Ok(())
    }
}
