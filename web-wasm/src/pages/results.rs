//! ジョブ一覧画面
//!
//! 絞り込みはURLクエリ `?status=` に持たせ、リロードや共有でも保たれるようにする。

use dara_local_common::display::{format_timestamp, short_id, NO_JOBS_MESSAGE};
use dara_local_common::{JobListView, StatusFilter};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use leptos_router::NavigateOptions;

use crate::api;
use crate::components::status_badge::StatusBadge;

/// 絞り込みに対応する一覧画面のURL
pub fn results_href(filter: StatusFilter) -> String {
    match filter {
        StatusFilter::All => "/results".to_string(),
        StatusFilter::Only(status) => format!("/results?status={}", status.as_str()),
    }
}

#[component]
pub fn ResultsPage() -> impl IntoView {
    let query = use_query_map();
    let navigate = use_navigate();

    let filter = Memo::new(move |_| {
        query
            .read()
            .get("status")
            .and_then(|s| s.parse::<StatusFilter>().ok())
            .unwrap_or_default()
    });
    let list = RwSignal::new(JobListView::new(StatusFilter::All));

    let refresh = move || {
        let Some(ticket) = list.try_update(|v| {
            v.set_filter(filter.get_untracked());
            v.begin_refresh()
        }) else {
            return;
        };
        let request = list.with_untracked(|v| v.request_query());

        spawn_local(async move {
            let result = api::list_jobs(&request)
                .await
                .map(|response| response.jobs)
                .map_err(|e| e.user_message());
            list.try_update(|v| v.finish(&ticket, result));
        });
    };

    Effect::new(move |_| {
        filter.track();
        refresh();
    });

    let on_filter_change = move |ev: web_sys::Event| {
        let next = event_target_value(&ev)
            .parse::<StatusFilter>()
            .unwrap_or_default();
        navigate(
            &results_href(next),
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    };

    let loading = move || list.with(|v| v.is_loading());

    view! {
        <div class="page-stack">
            <div class="section-card">
                <div class="filter-bar">
                    <label for="status-filter">"Status"</label>
                    <select
                        id="status-filter"
                        prop:value=move || filter.get().as_str()
                        on:change=on_filter_change
                    >
                        {StatusFilter::OPTIONS
                            .iter()
                            .map(|f| view! { <option value=f.as_str()>{f.label()}</option> })
                            .collect_view()}
                    </select>
                    <button type="button" on:click=move |_| refresh() disabled=loading>
                        {move || if loading() { "Refreshing…" } else { "Refresh" }}
                    </button>
                </div>

                {move || {
                    if let Some(message) = list.with(|v| v.error().map(str::to_string)) {
                        return view! { <div class="error-panel">{message}</div> }.into_any();
                    }
                    if loading() {
                        return view! { <div class="loading-panel">"Loading jobs…"</div> }.into_any();
                    }
                    if list.with(|v| v.is_empty_state()) {
                        return view! {
                            <div class="table-card">
                                <p class="muted-text">{NO_JOBS_MESSAGE}</p>
                            </div>
                        }
                            .into_any();
                    }
                    let rows = list.with(|v| v.visible_rows().into_iter().cloned().collect::<Vec<_>>());
                    view! {
                        <div class="table-card">
                            <table class="job-table">
                                <thead>
                                    <tr>
                                        <th>"ID"</th>
                                        <th>"User"</th>
                                        <th>"Pattern"</th>
                                        <th>"Database"</th>
                                        <th>"Status"</th>
                                        <th>"Created"</th>
                                        <th>"Finished"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {rows
                                        .into_iter()
                                        .map(|job| {
                                            let href = format!("/results/{}", job.job_id);
                                            view! {
                                                <tr>
                                                    <td>
                                                        <a href=href>{short_id(&job.job_id)}</a>
                                                    </td>
                                                    <td>{job.user.clone()}</td>
                                                    <td>{job.pattern_filename.clone()}</td>
                                                    <td>{job.database.clone()}</td>
                                                    <td>
                                                        <StatusBadge status=job.status />
                                                    </td>
                                                    <td>{format_timestamp(Some(&job.created_at))}</td>
                                                    <td>{format_timestamp(job.finished_at.as_deref())}</td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }
                        .into_any()
                }}
            </div>
        </div>
    }
}
