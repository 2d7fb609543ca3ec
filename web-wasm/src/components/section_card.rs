//! セクションカード

use leptos::prelude::*;

#[component]
pub fn SectionCard(
    title: &'static str,
    #[prop(optional)] subtitle: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <section class="section-card">
            <div class="section-card__header">
                <div>
                    {subtitle.map(|s| view! { <p class="eyebrow">{s}</p> })}
                    <h3>{title}</h3>
                </div>
            </div>
            <div class="section-card__body">{children()}</div>
        </section>
    }
}
