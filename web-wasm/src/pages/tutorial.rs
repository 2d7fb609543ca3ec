//! 使い方

use leptos::prelude::*;

struct Step {
    title: &'static str,
    bullets: &'static [&'static str],
}

const STEPS: &[Step] = &[
    Step {
        title: "1 · Collect & clean your pattern",
        bullets: &[
            "Export the 2θ–intensity data as XY, XYE, RAW, XRDML, TXT, or DAT.",
            "Trim detector spikes and make sure the scan covers at least 20° of 2θ; the diagnostics panel flags narrow ranges.",
            "Have any custom CIF files ready if known phases are missing from the databases.",
        ],
    },
    Step {
        title: "2 · Configure the search form",
        bullets: &[
            "Part 1: upload the pattern, enter the chemical system and required/exclude elements, then choose wavelength and instrument profile.",
            "Part 2: pick ICSD, COD, or MP and set the phase cap. MP additionally offers the E-above-hull limit and an experimental-only switch.",
            "Tag the job with your name and submit. The job enters a shared queue processed by the backend worker.",
        ],
    },
    Step {
        title: "3 · Monitor the queue & diagnostics",
        bullets: &[
            "Job Queue lists pending, running, completed, and failed jobs. Use the status filter and Refresh to follow progress.",
            "Diagnostics show the 2θ range, intensity range, and point count computed from your pattern.",
            "Failed jobs show their error message next to the status badge.",
        ],
    },
    Step {
        title: "4 · Examine solutions & download reports",
        bullets: &[
            "Each solution shows its Rwp, an interactive refinement plot, and the refined phase table.",
            "Download the report ZIP for the full set of results of a solution.",
        ],
    },
];

const TIPS: &[&str] = &[
    "Jobs run one at a time; large searches (200+ phases) may take 10–15 minutes.",
    "If no solutions pass the filters, try relaxing the database filters or checking pattern quality.",
    "The job detail URL can be bookmarked or shared with colleagues on the same server.",
];

#[component]
pub fn TutorialPage() -> impl IntoView {
    view! {
        <div class="page-stack">
            <div class="section-card">
                <p class="eyebrow">"Tutorial"</p>
                <h3>"Phase identification workflow"</h3>
                <p class="muted-text">
                    "Submit a diffraction pattern, follow the job through the queue, and review the refined fits."
                </p>
            </div>

            {STEPS
                .iter()
                .map(|step| {
                    view! {
                        <div class="section-card">
                            <h4>{step.title}</h4>
                            <ul>{step.bullets.iter().map(|b| view! { <li>{*b}</li> }).collect_view()}</ul>
                        </div>
                    }
                })
                .collect_view()}

            <div class="section-card">
                <h4>"Helpful tips"</h4>
                <ul>{TIPS.iter().map(|t| view! { <li>{*t}</li> }).collect_view()}</ul>
            </div>
        </div>
    }
}
