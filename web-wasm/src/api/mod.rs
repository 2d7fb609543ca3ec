//! バックエンドAPI連携

pub mod client;

pub use client::{api_paths, job_detail, list_jobs, submit_job, submission_message};
