//! ジョブ詳細画面

use dara_local_common::display::{
    checks_line, diagnostic_cards, solution_phase_count, solution_rwp, solution_title,
    solutions_empty_message, summary_items, NO_PHASE_TABLE_MESSAGE,
};
use dara_local_common::{DetailState, JobDetail, JobDetailView, PhaseTable, SolutionResult};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use crate::api;
use crate::components::plot::RefinementPlot;
use crate::components::status_badge::StatusBadge;

/// プロット描画先の要素ID
pub fn plot_element_id(job_id: &str, index: u32) -> String {
    let safe: String = job_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("plot-{}-{}", safe, index)
}

#[component]
fn PhaseTableView(table: PhaseTable) -> impl IntoView {
    if table.is_empty() {
        return view! { <p class="muted-text">{NO_PHASE_TABLE_MESSAGE}</p> }.into_any();
    }

    let header = table
        .columns
        .iter()
        .map(|c| view! { <th>{c.clone()}</th> })
        .collect_view();
    let body = (0..table.rows.len())
        .map(|row| {
            let cells = table
                .columns
                .iter()
                .map(|c| view! { <td>{table.cell(row, c)}</td> })
                .collect_view();
            view! { <tr>{cells}</tr> }
        })
        .collect_view();

    view! {
        <div class="phase-table-wrapper">
            <table class="phase-table">
                <thead>
                    <tr>{header}</tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
    .into_any()
}

#[component]
fn SolutionCard(job_id: String, solution: SolutionResult) -> impl IntoView {
    let download = api::api_paths().report_zip(&job_id, solution.index);
    let element_id = plot_element_id(&job_id, solution.index);

    view! {
        <div class="solution-card">
            <div>
                <p class="eyebrow">{solution_title(&solution)}</p>
                <h4>{solution_rwp(&solution)}</h4>
                <p class="muted-text">{solution_phase_count(&solution)}</p>
            </div>
            <RefinementPlot element_id=element_id figure=solution.plotly_figure.clone() />
            <PhaseTableView table=solution.phases_table.clone() />
            <a class="download-link" href=download target="_blank" rel="noreferrer">
                "Download report ZIP"
            </a>
        </div>
    }
}

#[component]
fn DetailBody(detail: JobDetail) -> impl IntoView {
    let job = detail.job.clone();
    let summary = summary_items(&job)
        .into_iter()
        .map(|(label, value)| {
            view! {
                <li>
                    <span>{label}</span>
                    <span>{value}</span>
                </li>
            }
        })
        .collect_view();

    let diagnostics = detail.diagnostics.as_ref().map(|d| {
        let cards = diagnostic_cards(d)
            .into_iter()
            .map(|(label, value)| {
                view! {
                    <div class="diagnostic-card">
                        <span>{label}</span>
                        {value}
                    </div>
                }
            })
            .collect_view();
        view! {
            <div class="section-card inner">
                <p class="eyebrow">"Diagnostics"</p>
                <div class="diagnostics-grid">{cards}</div>
                <p class="muted-text">{checks_line(d)}</p>
            </div>
        }
    });

    let solutions = if detail.solutions.is_empty() {
        view! { <p class="muted-text">{solutions_empty_message(job.status)}</p> }.into_any()
    } else {
        let job_id = job.job_id.clone();
        view! {
            <div class="solutions-grid">
                {detail
                    .solutions
                    .into_iter()
                    .map(|solution| view! { <SolutionCard job_id=job_id.clone() solution=solution /> })
                    .collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="detail-grid">
            <div class="section-card inner">
                <div class="summary-head">
                    <div>
                        <p class="eyebrow">"Status"</p>
                        <StatusBadge status=job.status />
                    </div>
                    {job
                        .error_message
                        .clone()
                        .filter(|m| !m.is_empty())
                        .map(|m| view! { <span class="helper-text">{m}</span> })}
                </div>
                <ul class="summary-list">{summary}</ul>
            </div>
            {diagnostics}
        </div>
        <div class="section-card">
            <p class="eyebrow">"Solutions"</p>
            <h3>"Refined fits"</h3>
            {solutions}
        </div>
    }
}

#[component]
pub fn JobDetailPage() -> impl IntoView {
    let params = use_params_map();
    let job_id = Memo::new(move |_| params.read().get("job_id"));
    let page = RwSignal::new(JobDetailView::default());

    // IDが変わるたびに取り直す。古いIDの応答はチケットで捨てる
    Effect::new(move |_| {
        let id = job_id.get();
        let Some(ticket) = page.try_update(|p| p.navigate(id.as_deref())).flatten() else {
            return;
        };
        let id = ticket.key().to_string();

        spawn_local(async move {
            let result = api::job_detail(&id).await.map_err(|e| e.user_message());
            if let Err(message) = &result {
                gloo::console::warn!(format!("job {}: {}", id, message));
            }
            page.try_update(|p| p.resolve(&ticket, result));
        });
    });

    on_cleanup(move || {
        page.try_update(|p| p.leave());
    });

    view! {
        <div class="page-stack">
            <div class="section-card">
                <div class="form-actions">
                    <div>
                        <p class="eyebrow">"Job detail"</p>
                        <h3>{move || job_id.get().unwrap_or_default()}</h3>
                    </div>
                    <div class="status-links">
                        <a href="/results">"Back to queue"</a>
                    </div>
                </div>
            </div>

            {move || match page.with(|p| p.state.clone()) {
                DetailState::Loading => {
                    view! { <div class="loading-panel">"Loading job…"</div> }.into_any()
                }
                DetailState::Failed(message) => {
                    view! { <div class="error-panel">{message}</div> }.into_any()
                }
                DetailState::Loaded(detail) => view! { <DetailBody detail=*detail /> }.into_any(),
            }}
        </div>
    }
}
