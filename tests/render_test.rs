//! 端末表示テスト
//!
//! 一覧・詳細の表示内容を検証

use dara_local_common::{
    ApiPaths, JobDetail, JobListView, JobStatus, JobSummary, PhaseTable, SolutionResult,
    StatusFilter,
};
use dara_local_rust::render::{render_job_detail, render_job_list, render_submitted};
use serde_json::json;

fn job(id: &str, status: JobStatus) -> JobSummary {
    JobSummary {
        job_id: id.to_string(),
        user: "kf".to_string(),
        pattern_filename: "scan.xy".to_string(),
        database: "ICSD".to_string(),
        status,
        num_phases: 0,
        created_at: "2025-03-01T10:00:00".to_string(),
        started_at: None,
        finished_at: None,
        error_message: None,
    }
}

fn detail(status: JobStatus, solutions: Vec<SolutionResult>) -> JobDetail {
    JobDetail {
        job: job("0123456789abcdef", status),
        diagnostics: None,
        solutions,
    }
}

fn loaded_view(filter: StatusFilter, jobs: Vec<JobSummary>) -> JobListView {
    let mut view = JobListView::new(filter);
    let ticket = view.begin_refresh();
    view.finish(&ticket, Ok(jobs));
    view
}

/// 0件なら表ではなく案内文
#[test]
fn test_empty_job_list() {
    let view = loaded_view(StatusFilter::All, Vec::new());
    let out = render_job_list(&view);

    assert_eq!(out.trim(), dara_local_common::display::NO_JOBS_MESSAGE);
    assert!(!out.contains("Status"));
}

/// 取得失敗ならエラー文だけ
#[test]
fn test_failed_job_list() {
    let mut view = JobListView::new(StatusFilter::All);
    let ticket = view.begin_refresh();
    view.finish(&ticket, Err("Unable to reach the server. Please try again in a moment.".to_string()));

    let out = render_job_list(&view);
    assert_eq!(out.trim(), "Unable to reach the server. Please try again in a moment.");
}

/// 一覧の表: 短縮IDと状態ラベル
#[test]
fn test_job_list_table() {
    let view = loaded_view(
        StatusFilter::All,
        vec![job("0123456789abcdef", JobStatus::Running), job("fedcba9876543210", JobStatus::Failed)],
    );
    let out = render_job_list(&view);

    assert!(out.starts_with("ID"));
    assert!(out.contains("01234567…"));
    assert!(out.contains(JobStatus::Running.label()));
    assert!(out.contains(JobStatus::Failed.label()));
    assert!(out.contains("2025-03-01 10:00:00"));
}

/// 絞り込みに合わない行は出さない
#[test]
fn test_job_list_respects_filter() {
    let view = loaded_view(
        StatusFilter::Only(JobStatus::Failed),
        vec![job("aaaaaaaaaaaa", JobStatus::Completed), job("bbbbbbbbbbbb", JobStatus::Failed)],
    );
    let out = render_job_list(&view);

    assert!(!out.contains("aaaaaaaa…"));
    assert!(out.contains("bbbbbbbb…"));
}

/// 解候補が無いときの説明は状態で変わる
#[test]
fn test_detail_empty_solutions_by_status() {
    let paths = ApiPaths::default();

    let failed = render_job_detail(&detail(JobStatus::Failed, Vec::new()), &paths);
    assert!(failed.contains("Job failed before producing solutions."));

    let completed = render_job_detail(&detail(JobStatus::Completed, Vec::new()), &paths);
    assert!(completed.contains("Job completed but no solutions were found"));

    let running = render_job_detail(&detail(JobStatus::Running, Vec::new()), &paths);
    assert!(running.contains("Solutions will appear here after the worker completes this job."));
}

/// 失敗ジョブはエラー文を出す
#[test]
fn test_detail_error_message() {
    let mut failed = detail(JobStatus::Failed, Vec::new());
    failed.job.error_message = Some("refinement diverged".to_string());

    let out = render_job_detail(&failed, &ApiPaths::default());
    assert!(out.contains("Error: refinement diverged"));
}

/// 解候補の表とレポートURL
#[test]
fn test_detail_solution() {
    let rows = vec![
        json!({ "phase": "Y2O3", "weight_fraction": 0.75 }),
        json!({ "phase": "MoO3", "weight_fraction": null }),
    ]
    .into_iter()
    .filter_map(|v| v.as_object().cloned())
    .collect();
    let solution = SolutionResult {
        index: 1,
        rwp: 8.1234,
        num_phases: 2,
        plotly_figure: json!({}),
        phases_table: PhaseTable {
            columns: vec!["phase".to_string(), "weight_fraction".to_string()],
            rows,
        },
        report_zip_url: String::new(),
    };

    let out = render_job_detail(&detail(JobStatus::Completed, vec![solution]), &ApiPaths::new("/api"));
    assert!(out.contains("Solution #1 | Rwp 8.123 | 2 phases"));
    assert!(out.contains("Y2O3"));
    assert!(out.contains("0.75"));
    assert!(out.contains("—"));
    assert!(out.contains("Report: /api/jobs/0123456789abcdef/download/1/zip"));
}

/// 投稿完了メッセージ
#[test]
fn test_render_submitted() {
    let out = render_submitted("job-123");
    assert!(out.starts_with("Job queued! ID: job-123"));
    assert!(out.contains("dara-local show job-123"));
}
