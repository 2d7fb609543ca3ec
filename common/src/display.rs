//! 表示用の整形
//!
//! CLIの端末出力とWeb画面で同じ文字列を使うための関数群

use crate::types::{Diagnostics, JobStatus, JobSummary, SolutionResult};
use chrono::{DateTime, NaiveDateTime};

/// 値が無いときの表示
pub const PLACEHOLDER: &str = "—";

pub const NO_JOBS_MESSAGE: &str = "No jobs yet. Submit a search to populate this list.";
pub const NO_PHASE_TABLE_MESSAGE: &str = "Phase table not available.";
pub const MISSING_JOB_ID_MESSAGE: &str = "Job ID missing from URL.";
pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Unable to submit search. Please try again in a moment.";

/// タイムスタンプを "YYYY-MM-DD HH:MM:SS" にする
///
/// RFC 3339 とタイムゾーン無しのISO形式を受け付け、解釈できなければそのまま返す。
pub fn format_timestamp(value: Option<&str>) -> String {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return PLACEHOLDER.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }
    raw.to_string()
}

/// 小数点以下 `digits` 桁。NaNは "—"
pub fn format_number(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.*}", digits, value)
}

/// 一覧用の短縮ID（先頭8文字 + …）
pub fn short_id(job_id: &str) -> String {
    let mut chars = job_id.chars();
    let head: String = chars.by_ref().take(8).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// 詳細画面のサマリ項目
pub fn summary_items(job: &JobSummary) -> Vec<(&'static str, String)> {
    vec![
        ("User", job.user.clone()),
        ("Pattern", job.pattern_filename.clone()),
        ("Database", job.database.clone()),
        ("Created", format_timestamp(Some(&job.created_at))),
        ("Started", format_timestamp(job.started_at.as_deref())),
        ("Finished", format_timestamp(job.finished_at.as_deref())),
        ("Phases fetched", job.num_phases.to_string()),
    ]
}

/// 診断情報のカード（ラベル, 値）
pub fn diagnostic_cards(diagnostics: &Diagnostics) -> Vec<(&'static str, String)> {
    vec![
        (
            "2θ range",
            format!(
                "{} – {}",
                format_number(diagnostics.two_theta_min, 1),
                format_number(diagnostics.two_theta_max, 1)
            ),
        ),
        (
            "Intensity",
            format!(
                "{} – {}",
                format_number(diagnostics.intensity_min, 0),
                format_number(diagnostics.intensity_max, 0)
            ),
        ),
        ("Points", diagnostics.num_points.to_string()),
    ]
}

/// チェック結果の1行表示
pub fn checks_line(diagnostics: &Diagnostics) -> String {
    let checks: Vec<String> = diagnostics
        .checks
        .iter()
        .map(|(key, value)| format!("{}:{}", key, value))
        .collect();
    format!("Checks: {}", checks.join(", "))
}

/// 解候補が無いときの説明（ジョブ状態で変わる）
pub fn solutions_empty_message(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Failed => "Job failed before producing solutions.",
        JobStatus::Completed => {
            "Job completed but no solutions were found that passed the filters. \
             Try relaxing database filters or checking the pattern quality."
        }
        JobStatus::Pending | JobStatus::Running => {
            "Solutions will appear here after the worker completes this job."
        }
    }
}

pub fn solution_title(solution: &SolutionResult) -> String {
    format!("Solution #{}", solution.index)
}

pub fn solution_rwp(solution: &SolutionResult) -> String {
    format!("Rwp {}", format_number(solution.rwp, 3))
}

pub fn solution_phase_count(solution: &SolutionResult) -> String {
    format!("{} phases", solution.num_phases)
}
