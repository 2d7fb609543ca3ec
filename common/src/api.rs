//! バックエンドAPIのパスとクエリ

use crate::form::SubmitEndpoint;
use crate::types::JobStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// 本番ビルド（同一オリジン配信）のAPIベース
pub const PRODUCTION_API_BASE: &str = "/api";

/// 開発サーバーのAPIベース
pub const DEVELOPMENT_API_BASE: &str = "http://localhost:8899/api";

/// APIのURL組み立て
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPaths {
    base: String,
}

impl ApiPaths {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn submit(&self, endpoint: SubmitEndpoint) -> String {
        format!("{}{}", self.base, endpoint.path())
    }

    pub fn jobs(&self, query: &JobListQuery) -> String {
        let qs = query.to_query_string();
        if qs.is_empty() {
            format!("{}/jobs", self.base)
        } else {
            format!("{}/jobs?{}", self.base, qs)
        }
    }

    pub fn job(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.base, path_segment(job_id))
    }

    /// レポートZIPのURL（解候補ごとに一意）
    pub fn report_zip(&self, job_id: &str, index: u32) -> String {
        format!("{}/jobs/{}/download/{}/zip", self.base, path_segment(job_id), index)
    }
}

/// パス1区間ぶんのエスケープ（`/` や `?` も符号化する）
fn path_segment(raw: &str) -> String {
    // byte_serialize は空白を '+' にするのでパス用に %20 へ戻す。元の '+' は %2B になっている
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self::new(DEVELOPMENT_API_BASE)
    }
}

/// 一覧のステータス絞り込み
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Only(JobStatus::Pending),
        StatusFilter::Only(JobStatus::Running),
        StatusFilter::Only(JobStatus::Completed),
        StatusFilter::Only(JobStatus::Failed),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All jobs",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn status(&self) -> Option<JobStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }

    pub fn matches(&self, status: JobStatus) -> bool {
        self.status().map_or(true, |wanted| wanted == status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<JobStatus>().map(StatusFilter::Only)
    }
}

/// `GET /jobs` のクエリ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListQuery {
    pub status: StatusFilter,
    pub user: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl JobListQuery {
    pub fn with_status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// 未指定の項目は出力しない。"ALL" は status を省略する
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(status) = self.status.status() {
            serializer.append_pair("status", status.as_str());
        }
        if let Some(user) = self.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            serializer.append_pair("user", user);
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            serializer.append_pair("offset", &offset.to_string());
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let paths = ApiPaths::new("/api/");
        assert_eq!(paths.submit(SubmitEndpoint::V2), "/api/jobs");
        assert_eq!(paths.submit(SubmitEndpoint::Legacy), "/api/search");
        assert_eq!(paths.job("abc"), "/api/jobs/abc");
        assert_eq!(paths.report_zip("abc", 2), "/api/jobs/abc/download/2/zip");
    }

    #[test]
    fn test_job_id_is_path_escaped() {
        let paths = ApiPaths::new("/api");
        assert_eq!(paths.job("a/b?c"), "/api/jobs/a%2Fb%3Fc");
        assert_eq!(paths.report_zip("a/b?c", 1), "/api/jobs/a%2Fb%3Fc/download/1/zip");
        assert_eq!(paths.job("x y+z#"), "/api/jobs/x%20y%2Bz%23");
        // UUID はそのまま
        assert_eq!(
            paths.job("3f2b9c1e-8d4a-4b7e-9f10-2c3d4e5f6a7b"),
            "/api/jobs/3f2b9c1e-8d4a-4b7e-9f10-2c3d4e5f6a7b"
        );
    }

    #[test]
    fn test_all_filter_omits_status() {
        let paths = ApiPaths::new(PRODUCTION_API_BASE);
        assert_eq!(paths.jobs(&JobListQuery::default()), "/api/jobs");
    }

    #[test]
    fn test_failed_filter() {
        let paths = ApiPaths::new(PRODUCTION_API_BASE);
        let query = JobListQuery::with_status(StatusFilter::Only(JobStatus::Failed));
        assert_eq!(paths.jobs(&query), "/api/jobs?status=FAILED");
    }

    #[test]
    fn test_optional_params() {
        let query = JobListQuery {
            status: StatusFilter::Only(JobStatus::Running),
            user: Some("k f".to_string()),
            limit: Some(20),
            offset: Some(40),
        };
        assert_eq!(query.to_query_string(), "status=RUNNING&user=k+f&limit=20&offset=40");

        let query = JobListQuery {
            user: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "");
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "COMPLETED".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(JobStatus::Completed)
        );
        assert!("DONE".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(JobStatus::Pending));
        assert!(StatusFilter::Only(JobStatus::Failed).matches(JobStatus::Failed));
        assert!(!StatusFilter::Only(JobStatus::Failed).matches(JobStatus::Running));
    }
}
