//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::hooks::use_location;
use leptos_router::path;

use crate::pages::{
    job_detail::JobDetailPage, results::ResultsPage, search::SearchPage, tutorial::TutorialPage,
};

/// ナビゲーション（パス, ラベル）
const NAV_ITEMS: [(&str, &str); 3] = [
    ("/search", "Submit Search"),
    ("/results", "Job Queue"),
    ("/tutorial", "Tutorial"),
];

/// 現在のパスがナビ項目の配下か
pub fn is_active(pathname: &str, item: &str) -> bool {
    pathname == item || pathname.starts_with(&format!("{}/", item))
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <AppLayout>
                <Routes fallback=|| view! { <Redirect path="/search" /> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/search" /> } />
                    <Route path=path!("/search") view=SearchPage />
                    <Route path=path!("/results") view=ResultsPage />
                    <Route path=path!("/results/:job_id") view=JobDetailPage />
                    <Route path=path!("/tutorial") view=TutorialPage />
                </Routes>
            </AppLayout>
        </Router>
    }
}

/// ヘッダーとナビゲーション
#[component]
fn AppLayout(children: Children) -> impl IntoView {
    let location = use_location();

    view! {
        <div class="app-shell">
            <header class="app-header">
                <div class="brand">
                    <div class="brand-dot" />
                    <div>
                        <p class="brand-label">"Dara Local"</p>
                        <h1>"Streamlined Phase Analysis"</h1>
                    </div>
                </div>
                <nav class="main-nav">
                    {NAV_ITEMS
                        .iter()
                        .map(|(href, label)| {
                            let href = *href;
                            view! {
                                <a
                                    href=href
                                    class=move || {
                                        if is_active(&location.pathname.get(), href) {
                                            "nav-link active"
                                        } else {
                                            "nav-link"
                                        }
                                    }
                                >
                                    {*label}
                                </a>
                            }
                        })
                        .collect_view()}
                </nav>
            </header>
            <main class="app-main">{children()}</main>
        </div>
    }
}
