//! Dara Local Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック:
//! 投稿フォームの検証、APIのパスとエラー正規化、画面状態

pub mod types;
pub mod elements;
pub mod form;
pub mod request;
pub mod api;
pub mod error;
pub mod display;
pub mod view;

pub use types::{Diagnostics, JobDetail, JobStatus, JobSummary, JobsResponse, PhaseTable, SolutionResult};
pub use elements::{chemical_system_elements, split_elements};
pub use form::{
    Database, DatabaseFilter, DatabaseSelection, Field, FieldErrors, FileRef, JobSubmission,
    MpFilters, SubmissionForm, SubmitEndpoint,
};
pub use request::{submitted_job_id, FieldValue, FormField};
pub use api::{ApiPaths, JobListQuery, StatusFilter};
pub use error::{ApiError, Error, Result};
pub use view::{DetailState, JobDetailView, JobListView, ListState, RequestGuard, Ticket};
