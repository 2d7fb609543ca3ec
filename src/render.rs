//! 端末向けの表示

use dara_local_common::display::{
    checks_line, diagnostic_cards, format_timestamp, short_id, solution_phase_count,
    solution_rwp, solution_title, solutions_empty_message, summary_items, NO_JOBS_MESSAGE,
    NO_PHASE_TABLE_MESSAGE, PLACEHOLDER,
};
use dara_local_common::{ApiPaths, JobDetail, JobListView, PhaseTable};
use std::fmt::Write;

/// 文字幅を揃えて表を組む
fn table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(headers));
    let _ = writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in rows {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}

/// ジョブ一覧
pub fn render_job_list(view: &JobListView) -> String {
    if let Some(message) = view.error() {
        return format!("{}\n", message);
    }
    if view.is_empty_state() {
        return format!("{}\n", NO_JOBS_MESSAGE);
    }

    let headers: Vec<String> = ["ID", "User", "Pattern", "Database", "Status", "Created", "Finished"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = view
        .visible_rows()
        .into_iter()
        .map(|job| {
            vec![
                short_id(&job.job_id),
                job.user.clone(),
                job.pattern_filename.clone(),
                job.database.clone(),
                job.status.label().to_string(),
                format_timestamp(Some(&job.created_at)),
                format_timestamp(job.finished_at.as_deref()),
            ]
        })
        .collect();
    table(&headers, &rows)
}

fn render_phase_table(phases: &PhaseTable) -> String {
    if phases.is_empty() {
        return format!("{}\n", NO_PHASE_TABLE_MESSAGE);
    }
    let rows: Vec<Vec<String>> = (0..phases.rows.len())
        .map(|r| phases.columns.iter().map(|c| phases.cell(r, c)).collect())
        .collect();
    table(&phases.columns, &rows)
}

/// ジョブ詳細
pub fn render_job_detail(detail: &JobDetail, paths: &ApiPaths) -> String {
    let job = &detail.job;
    let mut out = String::new();

    let _ = writeln!(out, "Job {}", job.job_id);
    let _ = writeln!(out, "Status: {}", job.status.label());
    if let Some(message) = job.error_message.as_deref().filter(|m| !m.is_empty()) {
        let _ = writeln!(out, "Error: {}", message);
    }
    for (label, value) in summary_items(job) {
        let _ = writeln!(out, "  {:<15}{}", label, value);
    }

    if let Some(diagnostics) = &detail.diagnostics {
        let _ = writeln!(out, "\nDiagnostics");
        for (label, value) in diagnostic_cards(diagnostics) {
            let _ = writeln!(out, "  {:<15}{}", label, value);
        }
        let _ = writeln!(out, "  {}", checks_line(diagnostics));
    }

    let _ = writeln!(out, "\nRefined fits");
    if detail.solutions.is_empty() {
        let _ = writeln!(out, "{}", solutions_empty_message(job.status));
        return out;
    }

    for solution in &detail.solutions {
        let _ = writeln!(
            out,
            "\n{} | {} | {}",
            solution_title(solution),
            solution_rwp(solution),
            solution_phase_count(solution)
        );
        out.push_str(&render_phase_table(&solution.phases_table));
        let _ = writeln!(out, "Report: {}", paths.report_zip(&job.job_id, solution.index));
    }
    out
}

/// 投稿完了メッセージ
pub fn render_submitted(job_id: &str) -> String {
    let id = if job_id.is_empty() { PLACEHOLDER } else { job_id };
    format!(
        "Job queued! ID: {}\n  View detail: dara-local show {}\n  Go to queue: dara-local list",
        id, id
    )
}
