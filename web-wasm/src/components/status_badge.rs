//! ステータスバッジ

use dara_local_common::JobStatus;
use leptos::prelude::*;

#[component]
pub fn StatusBadge(status: JobStatus) -> impl IntoView {
    view! { <span class=status.badge_class()>{status.label()}</span> }
}
