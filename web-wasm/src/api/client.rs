//! fetch によるAPI呼び出し
//!
//! 非2xxの扱いは `send` に集約し、`ApiError` に正規化する。

use dara_local_common::api::{DEVELOPMENT_API_BASE, PRODUCTION_API_BASE};
use dara_local_common::display::SUBMISSION_FALLBACK_MESSAGE;
use dara_local_common::{
    submitted_job_id, ApiError, ApiPaths, Error, FieldValue, JobDetail, JobListQuery,
    JobSubmission, JobsResponse,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// ビルド種別に応じたAPIのパス
pub fn api_paths() -> ApiPaths {
    if cfg!(debug_assertions) {
        ApiPaths::new(DEVELOPMENT_API_BASE)
    } else {
        ApiPaths::new(PRODUCTION_API_BASE)
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn transport(value: JsValue) -> Error {
    Error::Transport(js_message(&value))
}

/// 応答ボディの形が合わない
fn decode(err: serde_wasm_bindgen::Error) -> Error {
    Error::Decode(err.to_string())
}

/// リクエストを送る（ステータスは見ない）
async fn fetch(method: &str, url: &str, body: Option<&JsValue>) -> Result<Response, Error> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(body);
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
    let window = web_sys::window().ok_or_else(|| Error::Transport("window unavailable".into()))?;
    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    value.dyn_into::<Response>().map_err(transport)
}

async fn body_text(response: &Response) -> String {
    match response.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// 非2xxなら `ApiError` にする
async fn send(method: &str, url: &str, body: Option<&JsValue>) -> Result<Response, Error> {
    let response = fetch(method, url, body).await?;
    if response.ok() {
        return Ok(response);
    }
    let body = body_text(&response).await;
    let err = ApiError::from_response(response.status(), &response.status_text(), &body);
    gloo::console::warn!(format!("{} {} -> {}: {}", method, url, response.status(), err.message));
    Err(err.into())
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, Error> {
    let response = send("GET", url, None).await?;
    let promise = response.json().map_err(transport)?;
    let value = JsFuture::from(promise).await.map_err(transport)?;
    serde_wasm_bindgen::from_value(value).map_err(decode)
}

pub async fn list_jobs(query: &JobListQuery) -> Result<JobsResponse, Error> {
    fetch_json(&api_paths().jobs(query)).await
}

pub async fn job_detail(job_id: &str) -> Result<JobDetail, Error> {
    let job_id = job_id.trim();
    if job_id.is_empty() {
        return Err(Error::MissingJobId);
    }
    fetch_json(&api_paths().job(job_id)).await
}

/// 共通のフィールド列をFormDataに写す
fn build_form_data(submission: &JobSubmission, pattern: &File, structures: &[File]) -> Result<FormData, Error> {
    let form = FormData::new().map_err(transport)?;
    for field in submission.multipart_fields() {
        let appended = match field.value {
            FieldValue::Text(text) => form.append_with_str(field.name, &text),
            FieldValue::PatternFile => {
                form.append_with_blob_and_filename(field.name, pattern, &pattern.name())
            }
            FieldValue::StructureFile(i) => {
                let file = structures.get(i).ok_or_else(|| {
                    Error::Config(format!("structure file #{} is no longer selected", i + 1))
                })?;
                form.append_with_blob_and_filename(field.name, file, &file.name())
            }
        };
        appended.map_err(transport)?;
    }
    Ok(form)
}

/// ジョブを投稿してジョブIDを返す
pub async fn submit_job(
    submission: &JobSubmission,
    pattern: &File,
    structures: &[File],
) -> Result<String, Error> {
    let form = build_form_data(submission, pattern, structures)?;
    let url = api_paths().submit(submission.endpoint);
    gloo::console::log!(format!("submitting {} to {}", pattern.name(), url));

    let response = send("POST", &url, Some(form.as_ref())).await?;
    let body = body_text(&response).await;
    submitted_job_id(submission.endpoint, &body)
}

/// 投稿失敗バナーの文言
pub fn submission_message(err: &Error) -> String {
    match err {
        Error::Transport(_) => SUBMISSION_FALLBACK_MESSAGE.to_string(),
        other => other.user_message(),
    }
}
