//! Requirement (job posting) board.

use crate::api::ApiClient;
use crate::envelope;
use crate::http::{ApiError, ApiResult};
use crate::models::JobPosting;

#[derive(Clone)]
pub struct JobService {
    api: ApiClient,
}

impl JobService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResult<Vec<JobPosting>> {
        envelope::unwrap::<Option<Vec<JobPosting>>>(self.api.get("/jobs").await)
            .map(|r| r.map(Option::unwrap_or_default))
    }

    pub async fn get(&self, job_id: i64) -> ApiResult<JobPosting> {
        envelope::unwrap(self.api.get(&format!("/jobs/{}", job_id)).await)
    }

    pub async fn create(&self, job: &JobPosting) -> ApiResult<JobPosting> {
        validate(job)?;
        envelope::unwrap(self.api.post("/jobs", job).await)
    }

    pub async fn update(&self, job_id: i64, job: &JobPosting) -> ApiResult<JobPosting> {
        validate(job)?;
        envelope::unwrap(self.api.put(&format!("/jobs/{}", job_id), job).await)
    }

    pub async fn delete(&self, job_id: i64) -> ApiResult<()> {
        envelope::unwrap::<serde_json::Value>(self.api.delete(&format!("/jobs/{}", job_id)).await)
            .map(|r| r.map(|_| ()))
    }
}

fn validate(job: &JobPosting) -> Result<(), ApiError> {
    if job.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    if matches!(job.budget, Some(b) if b < 0.0) {
        return Err(ApiError::Validation("Budget cannot be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{api_for, envelope};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer};

    #[tokio::test]
    async fn list_treats_null_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/jobs"))
            .respond_with(envelope(json!(null)))
            .mount(&server)
            .await;

        let (api, _tokens, _dir) = api_for(&server.uri());
        assert!(JobService::new(api).list().await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn create_posts_and_returns_job() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/jobs"))
            .respond_with(envelope(json!({ "jobId": 12, "title": "Physics help", "status": "OPEN" })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _tokens, _dir) = api_for(&server.uri());
        let job = JobPosting {
            title: "Physics help".into(),
            budget: Some(30.0),
            ..JobPosting::default()
        };
        let created = JobService::new(api).create(&job).await.unwrap().data;
        assert_eq!(created.job_id, Some(12));
        assert_eq!(created.status.as_deref(), Some("OPEN"));
    }

    #[tokio::test]
    async fn invalid_jobs_are_rejected_locally() {
        let server = MockServer::start().await;
        let (api, _tokens, _dir) = api_for(&server.uri());
        let service = JobService::new(api);

        let untitled = JobPosting::default();
        assert!(matches!(service.create(&untitled).await, Err(ApiError::Validation(_))));

        let negative = JobPosting {
            title: "x".into(),
            budget: Some(-1.0),
            ..JobPosting::default()
        };
        assert!(matches!(service.update(1, &negative).await, Err(ApiError::Validation(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_hits_job_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/jobs/7"))
            .respond_with(envelope(json!(null)))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _tokens, _dir) = api_for(&server.uri());
        assert!(JobService::new(api).delete(7).await.is_ok());
    }
}
