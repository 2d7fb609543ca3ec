//! バックエンドが返すジョブ関連の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - JobSummary: ジョブ一覧の1行
//! - JobDetail: ジョブ詳細（診断情報・解候補を含む）
//! - SolutionResult: 精密化された解候補1件

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// ジョブのライフサイクル状態
///
/// PENDING → RUNNING → {COMPLETED | FAILED} の一方向のみ遷移する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// ステータスバッジの表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }

    /// ステータスバッジのCSSクラス
    pub fn badge_class(&self) -> &'static str {
        match self {
            JobStatus::Pending => "badge badge-pending",
            JobStatus::Running => "badge badge-running",
            JobStatus::Completed => "badge badge-completed",
            JobStatus::Failed => "badge badge-failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// バックエンドが取り得る遷移かどうか
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(JobStatus::Pending),
            "RUNNING" => Ok(JobStatus::Running),
            "COMPLETED" => Ok(JobStatus::Completed),
            "FAILED" => Ok(JobStatus::Failed),
            _ => Err(format!(
                "Unknown status: {}. Use PENDING, RUNNING, COMPLETED, or FAILED",
                s
            )),
        }
    }
}

/// ジョブ一覧の1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub user: String,
    pub pattern_filename: String,
    pub database: String,
    pub status: JobStatus,

    #[serde(default)]
    pub num_phases: u32,

    pub created_at: String,

    #[serde(default)]
    pub started_at: Option<String>,

    #[serde(default)]
    pub finished_at: Option<String>,

    /// FAILED の場合のみ存在
    #[serde(default)]
    pub error_message: Option<String>,
}

/// パターンから計算された診断情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub two_theta_min: f64,
    pub two_theta_max: f64,
    pub intensity_min: f64,
    pub intensity_max: f64,
    pub num_points: u64,
    #[serde(default)]
    pub checks: BTreeMap<String, String>,
}

/// 相の表（列名 + 列名→値の行）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
}

impl PhaseTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// セルの表示文字列。null・欠損は "—"
    pub fn cell(&self, row: usize, column: &str) -> String {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            None | Some(Value::Null) => "—".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// 解候補1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    pub index: u32,
    pub rwp: f64,
    pub num_phases: u32,
    /// チャート描画用の図定義（中身は解釈せずそのまま渡す）
    #[serde(default)]
    pub plotly_figure: Value,
    #[serde(default)]
    pub phases_table: PhaseTable,
    #[serde(default)]
    pub report_zip_url: String,
}

/// ジョブ詳細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub job: JobSummary,
    #[serde(default)]
    pub diagnostics: Option<Diagnostics>,
    #[serde(default)]
    pub solutions: Vec<SolutionResult>,
}

/// `GET /jobs` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_json(status: &str) -> String {
        format!(
            r#"{{
                "job_id": "5f0c2a9e-1111-2222-3333-444455556666",
                "user": "kf",
                "pattern_filename": "YMoO.xy",
                "database": "ICSD",
                "status": "{}",
                "created_at": "2025-03-01T10:00:00"
            }}"#,
            status
        )
    }

    #[test]
    fn test_status_deserialize_uppercase() {
        let summary: JobSummary = serde_json::from_str(&summary_json("RUNNING")).unwrap();
        assert_eq!(summary.status, JobStatus::Running);
        assert_eq!(summary.num_phases, 0); // デフォルト値
        assert!(summary.started_at.is_none());
        assert!(summary.error_message.is_none());
    }

    #[test]
    fn test_status_unknown_rejected() {
        let result = serde_json::from_str::<JobSummary>(&summary_json("CANCELLED"));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("failed".parse::<JobStatus>().unwrap(), JobStatus::Failed);
        assert_eq!(" COMPLETED ".parse::<JobStatus>().unwrap(), JobStatus::Completed);
        assert!("done".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_forward_only() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Running));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Running));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Pending));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn test_badge() {
        assert_eq!(JobStatus::Failed.label(), "Failed");
        assert_eq!(JobStatus::Pending.badge_class(), "badge badge-pending");
    }

    #[test]
    fn test_job_detail_without_diagnostics() {
        let json = format!(r#"{{"job": {}}}"#, summary_json("PENDING"));
        let detail: JobDetail = serde_json::from_str(&json).unwrap();
        assert!(detail.diagnostics.is_none());
        assert!(detail.solutions.is_empty());
    }

    #[test]
    fn test_job_detail_with_solution() {
        let json = format!(
            r#"{{
                "job": {},
                "diagnostics": {{
                    "two_theta_min": 10.0, "two_theta_max": 80.0,
                    "intensity_min": 3.0, "intensity_max": 1200.5,
                    "num_points": 3500,
                    "checks": {{"range": "ok", "noise": "warn"}}
                }},
                "solutions": [{{
                    "index": 1, "rwp": 7.1234, "num_phases": 2,
                    "plotly_figure": {{"data": [], "layout": {{"title": "fit"}}}},
                    "phases_table": {{
                        "columns": ["Phase", "Weight"],
                        "rows": [{{"Phase": "Y2Mo3O12", "Weight": 0.42}}, {{"Phase": "MoO3", "Weight": null}}]
                    }},
                    "report_zip_url": "/reports/1.zip"
                }}]
            }}"#,
            summary_json("COMPLETED")
        );
        let detail: JobDetail = serde_json::from_str(&json).unwrap();
        let diagnostics = detail.diagnostics.expect("診断情報がない");
        assert_eq!(diagnostics.num_points, 3500);
        assert_eq!(diagnostics.checks.get("noise").map(String::as_str), Some("warn"));

        let solution = &detail.solutions[0];
        assert_eq!(solution.plotly_figure["layout"]["title"], "fit");
        assert_eq!(solution.phases_table.cell(0, "Phase"), "Y2Mo3O12");
        assert_eq!(solution.phases_table.cell(0, "Weight"), "0.42");
        assert_eq!(solution.phases_table.cell(1, "Weight"), "—");
        assert_eq!(solution.phases_table.cell(5, "Phase"), "—");
    }

    #[test]
    fn test_jobs_response_defaults() {
        let response: JobsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.jobs.is_empty());
        assert_eq!(response.total, 0);
    }
}
