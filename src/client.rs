//! バックエンドAPIクライアント
//!
//! 非2xxの扱いは `fetch` に集約する。各操作はステータスコードを自分で見ない。

use crate::error::Result;
use crate::upload::SubmissionFiles;
use dara_local_common::{
    submitted_job_id, ApiError, ApiPaths, Error, FieldValue, JobDetail, JobListQuery,
    JobSubmission, JobsResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct ApiClient {
    http: reqwest::Client,
    paths: ApiPaths,
}

impl ApiClient {
    /// `connect_timeout` は接続確立までの上限。アップロードやZIP取得の本体には上限を掛けない
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            http,
            paths: ApiPaths::new(base_url),
        })
    }

    pub fn paths(&self) -> &ApiPaths {
        &self.paths
    }

    /// リクエストを送り、非2xxなら `ApiError` にする
    async fn fetch(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, "request failed before a response arrived");
            Error::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &status_text, &body);
        tracing::debug!(status = status.as_u16(), message = %err.message, "server returned an error");
        Err(err.into())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.fetch(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let value = serde_json::from_str(&body).map_err(Error::Json)?;
        Ok(value)
    }

    /// ジョブを投稿してジョブIDを返す
    pub async fn submit(&self, submission: &JobSubmission, files: &SubmissionFiles) -> Result<String> {
        let url = self.paths.submit(submission.endpoint);
        let form = build_form(submission, files)?;
        tracing::info!(%url, pattern = %submission.pattern_file.name, "submitting job");

        let response = self.fetch(self.http.post(&url).multipart(form)).await?;
        let body = response.text().await.unwrap_or_default();

        let job_id = submitted_job_id(submission.endpoint, &body)?;
        tracing::info!(%job_id, "job queued");
        Ok(job_id)
    }

    pub async fn list_jobs(&self, query: &JobListQuery) -> Result<JobsResponse> {
        let url = self.paths.jobs(query);
        tracing::debug!(%url, "listing jobs");
        self.fetch_json(self.http.get(&url)).await
    }

    pub async fn job_detail(&self, job_id: &str) -> Result<JobDetail> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(Error::MissingJobId.into());
        }
        let url = self.paths.job(job_id);
        tracing::debug!(%url, "fetching job detail");
        self.fetch_json(self.http.get(&url)).await
    }

    /// レポートZIPを取得する
    pub async fn download_report(&self, job_id: &str, index: u32) -> Result<Vec<u8>> {
        let url = self.paths.report_zip(job_id, index);
        tracing::debug!(%url, "downloading report");
        let response = self.fetch(self.http.get(&url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// 共通のフィールド列をreqwestのマルチパートに写す
fn build_form(submission: &JobSubmission, files: &SubmissionFiles) -> Result<Form> {
    let mut form = Form::new();
    for field in submission.multipart_fields() {
        form = match field.value {
            FieldValue::Text(text) => form.text(field.name, text),
            FieldValue::PatternFile => form.part(
                field.name,
                file_part(&files.pattern.bytes, &submission.pattern_file.name)?,
            ),
            FieldValue::StructureFile(i) => {
                let file = files.structures.get(i).ok_or_else(|| {
                    Error::Config(format!("structure file #{} was not loaded", i + 1))
                })?;
                form.part(field.name, file_part(&file.bytes, &file.file_ref.name)?)
            }
        };
    }
    Ok(form)
}

fn file_part(bytes: &[u8], name: &str) -> Result<Part> {
    let part = Part::bytes(bytes.to_vec())
        .file_name(name.to_string())
        .mime_str("application/octet-stream")
        .map_err(|e| Error::Transport(e.to_string()))?;
    Ok(part)
}
