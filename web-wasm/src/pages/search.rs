//! 投稿フォーム画面

use std::str::FromStr;
use std::time::Duration;

use dara_local_common::form::{INSTRUMENT_PROFILES, PATTERN_EXTENSIONS, WAVELENGTH_OPTIONS};
use dara_local_common::{Database, Field, FieldErrors, FileRef, SubmissionForm, SubmitEndpoint};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use web_sys::{Event, File, HtmlInputElement, SubmitEvent};

use crate::api;
use crate::components::section_card::SectionCard;

/// 投稿結果のバナー
#[derive(Debug, Clone, PartialEq)]
enum SubmitOutcome {
    Queued(String),
    Failed(String),
}

/// 成功後に詳細画面へ移るまでの待ち時間
const REDIRECT_DELAY: Duration = Duration::from_secs(1);

fn file_ref(file: &File) -> FileRef {
    FileRef::new(file.name(), file.size() as u64)
}

fn selected_files(ev: &Event) -> Vec<File> {
    let input: HtmlInputElement = event_target(ev);
    input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default()
}

fn pattern_accept() -> String {
    PATTERN_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

#[component]
fn FieldError(errors: RwSignal<FieldErrors>, field: Field) -> impl IntoView {
    move || {
        errors
            .with(|e| e.get(field).map(str::to_string))
            .map(|message| view! { <span class="helper-text">{message}</span> })
    }
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let form = RwSignal::new(SubmissionForm::default());
    let endpoint = RwSignal::new(SubmitEndpoint::default());
    let errors = RwSignal::new(FieldErrors::default());
    let submitting = RwSignal::new(false);
    let outcome = RwSignal::new(None::<SubmitOutcome>);

    // File は Send でないのでローカル保持
    let pattern_file = StoredValue::new_local(None::<File>);
    let structure_files = StoredValue::new_local(Vec::<File>::new());
    let pending_redirect = StoredValue::new(None::<TimeoutHandle>);

    let navigate = use_navigate();

    on_cleanup(move || {
        if let Some(Some(handle)) = pending_redirect.try_get_value() {
            handle.clear();
        }
    });

    let on_pattern_change = move |ev: Event| {
        let file = selected_files(&ev).into_iter().next();
        form.update(|f| f.pattern_file = file.as_ref().map(file_ref));
        pattern_file.set_value(file);
    };

    let on_cifs_change = move |ev: Event| {
        let files = selected_files(&ev);
        form.update(|f| f.structure_files = files.iter().map(file_ref).collect());
        structure_files.set_value(files);
    };

    let on_legacy_toggle = move |ev: Event| {
        let next = if event_target_checked(&ev) {
            SubmitEndpoint::Legacy
        } else {
            SubmitEndpoint::V2
        };
        endpoint.set(next);
        form.update(|f| {
            if !next.databases().contains(&f.database.database()) {
                f.select_database(Database::Icsd);
            }
        });
        errors.set(FieldErrors::default());
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        outcome.set(None);

        let current = endpoint.get_untracked();
        let submission = match form.with_untracked(|f| f.validate(current)) {
            Ok(submission) => submission,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        let Some(pattern) = pattern_file.get_value() else {
            errors.update(|e| e.push(Field::PatternFile, "Pattern file is required"));
            return;
        };
        errors.set(FieldErrors::default());

        let structures = structure_files.get_value();
        let navigate = navigate.clone();
        submitting.set(true);

        spawn_local(async move {
            let result = api::submit_job(&submission, &pattern, &structures).await;
            submitting.try_set(false);

            match result {
                Ok(job_id) => {
                    gloo::console::log!(format!("job queued: {}", job_id));
                    let target = format!("/results/{}", job_id);
                    outcome.try_set(Some(SubmitOutcome::Queued(job_id)));
                    let handle = set_timeout_with_handle(
                        move || navigate(&target, Default::default()),
                        REDIRECT_DELAY,
                    );
                    if let Ok(handle) = handle {
                        pending_redirect.try_set_value(Some(handle));
                    }
                }
                Err(err) => {
                    outcome.try_set(Some(SubmitOutcome::Failed(api::submission_message(&err))));
                }
            }
        });
    };

    let text_input = move |id: &'static str,
                           placeholder: &'static str,
                           get: fn(&SubmissionForm) -> String,
                           set: fn(&mut SubmissionForm, String)| {
        view! {
            <input
                id=id
                placeholder=placeholder
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
        }
    };

    view! {
        <form class="page-stack" on:submit=on_submit>
            <SectionCard title="Part 1 – Pattern & Setup" subtitle="Pattern and instrument">
                <div class="form-grid">
                    <div class="form-field wide">
                        <label for="pattern_file">"Pattern file"</label>
                        <div class="upload-field">
                            <input
                                id="pattern_file"
                                type="file"
                                accept=pattern_accept()
                                on:change=on_pattern_change
                            />
                            {move || {
                                form.with(|f| f.pattern_file.as_ref().map(|p| p.name.clone()))
                                    .map(|name| view! { <p class="file-name">{name}</p> })
                            }}
                        </div>
                        <FieldError errors=errors field=Field::PatternFile />
                    </div>

                    <div class="form-field wide">
                        <label for="custom_cifs">"Custom CIFs (optional)"</label>
                        <div class="upload-field">
                            <input
                                id="custom_cifs"
                                type="file"
                                accept=".cif"
                                multiple=true
                                on:change=on_cifs_change
                            />
                            {move || {
                                let names = form.with(|f| {
                                    f.structure_files
                                        .iter()
                                        .map(|c| c.name.clone())
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                });
                                (!names.is_empty()).then(|| view! { <p class="file-name">{names}</p> })
                            }}
                        </div>
                        <p class="field-note">
                            "Optional: CIF files included as additional phases. Leave empty if not needed."
                        </p>
                        <FieldError errors=errors field=Field::StructureFiles />
                    </div>

                    <div class="form-field">
                        <label for="chemical_system">"Chemical system"</label>
                        {text_input(
                            "chemical_system",
                            "e.g. Y-Mo-O",
                            |f| f.chemical_system.clone(),
                            |f, v| f.chemical_system = v,
                        )}
                        <p class="field-note">"Use dashes to separate elements. Example: Y-Mo-O."</p>
                        <FieldError errors=errors field=Field::ChemicalSystem />
                    </div>

                    <div class="form-field">
                        <label for="required_elements">"Required elements"</label>
                        {text_input(
                            "required_elements",
                            "Comma separated (Y, Mo, O)",
                            |f| f.required_elements.clone(),
                            |f, v| f.required_elements = v,
                        )}
                        <p class="field-note">"Elements that must appear in each candidate phase."</p>
                        <FieldError errors=errors field=Field::RequiredElements />
                    </div>

                    <div class="form-field">
                        <label for="exclude_elements">"Exclude elements"</label>
                        {text_input(
                            "exclude_elements",
                            "Optional (Cl, Na)",
                            |f| f.exclude_elements.clone(),
                            |f, v| f.exclude_elements = v,
                        )}
                        <p class="field-note">"Elements to remove from the candidate pool."</p>
                    </div>

                    <div class="form-field">
                        <label for="wavelength">"Wavelength"</label>
                        <select
                            id="wavelength"
                            prop:value=move || form.with(|f| f.wavelength.clone())
                            on:change=move |ev| form.update(|f| f.wavelength = event_target_value(&ev))
                        >
                            {WAVELENGTH_OPTIONS
                                .iter()
                                .map(|w| view! { <option value=*w>{*w}</option> })
                                .collect_view()}
                        </select>
                        <FieldError errors=errors field=Field::Wavelength />
                    </div>

                    <div class="form-field">
                        <label for="instrument_profile">"Instrument profile"</label>
                        <select
                            id="instrument_profile"
                            prop:value=move || form.with(|f| f.instrument_profile.clone())
                            on:change=move |ev| {
                                form.update(|f| f.instrument_profile = event_target_value(&ev))
                            }
                        >
                            {INSTRUMENT_PROFILES
                                .iter()
                                .map(|p| view! { <option value=*p>{*p}</option> })
                                .collect_view()}
                        </select>
                        <FieldError errors=errors field=Field::InstrumentProfile />
                    </div>
                </div>
            </SectionCard>

            <SectionCard title="Part 2 – Database & Filters" subtitle="Candidate phases">
                <div class="form-grid">
                    <div class="form-field">
                        <label for="database">"Database"</label>
                        <select
                            id="database"
                            prop:value=move || form.with(|f| f.database.database().as_str())
                            on:change=move |ev| {
                                if let Ok(db) = Database::from_str(&event_target_value(&ev)) {
                                    form.update(|f| f.select_database(db));
                                }
                            }
                        >
                            {move || {
                                endpoint
                                    .get()
                                    .databases()
                                    .iter()
                                    .map(|db| view! { <option value=db.as_str()>{db.as_str()}</option> })
                                    .collect_view()
                            }}
                        </select>
                        <FieldError errors=errors field=Field::Database />
                    </div>

                    <div class="form-field">
                        <label for="max_phases">"Max phases"</label>
                        <input
                            id="max_phases"
                            type="number"
                            min=move || endpoint.get().max_phases_range().start().to_string()
                            max=move || endpoint.get().max_phases_range().end().to_string()
                            prop:value=move || form.with(|f| f.max_phases.clone())
                            on:input=move |ev| form.update(|f| f.max_phases = event_target_value(&ev))
                        />
                        <p class="field-note">
                            "Controls how many candidate phases feed into refinement and search."
                        </p>
                        <FieldError errors=errors field=Field::MaxPhases />
                    </div>

                    <Show when=move || form.with(|f| f.shows_mp_filters())>
                        <div class="form-field">
                            <label for="mp_max_e_above_hull">"MP E-above-hull (eV)"</label>
                            <input
                                id="mp_max_e_above_hull"
                                type="number"
                                step="0.01"
                                min="0"
                                max=move || endpoint.get().hull_range().end().to_string()
                                prop:value=move || {
                                    form.with(|f| {
                                        f.database
                                            .mp_filters()
                                            .map(|mp| mp.max_e_above_hull.clone())
                                            .unwrap_or_default()
                                    })
                                }
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    form.update(|f| {
                                        if let Some(mp) = f.database.mp_filters_mut() {
                                            mp.max_e_above_hull = value;
                                        }
                                    })
                                }
                            />
                            <FieldError errors=errors field=Field::MpMaxEAboveHull />
                        </div>

                        <div class="form-field wide">
                            <label class="checkbox-row">
                                <input
                                    type="checkbox"
                                    prop:checked=move || {
                                        form.with(|f| {
                                            f.database.mp_filters().is_some_and(|mp| mp.experimental_only)
                                        })
                                    }
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        form.update(|f| {
                                            if let Some(mp) = f.database.mp_filters_mut() {
                                                mp.experimental_only = checked;
                                            }
                                        })
                                    }
                                />
                                <span>"MP experimental entries only"</span>
                            </label>
                        </div>
                    </Show>

                    <div class="form-field wide">
                        <label class="checkbox-row">
                            <input
                                type="checkbox"
                                prop:checked=move || endpoint.get() == SubmitEndpoint::Legacy
                                on:change=on_legacy_toggle
                            />
                            <span>"Use legacy search endpoint"</span>
                        </label>
                        <p class="field-note">"Deprecated. Submits to /search and reports a workflow ID."</p>
                    </div>
                </div>
            </SectionCard>

            <SectionCard title="Submit" subtitle="Queue this job">
                {move || {
                    outcome
                        .get()
                        .map(|result| match result {
                            SubmitOutcome::Queued(job_id) => {
                                let detail_href = format!("/results/{}", job_id);
                                view! {
                                    <div class="status-banner success">
                                        <div>
                                            <strong>"Job queued!"</strong>
                                            " ID: "
                                            {job_id}
                                        </div>
                                        <div class="status-links">
                                            <a href=detail_href>"View detail"</a>
                                            <a href="/results">"Go to queue"</a>
                                        </div>
                                    </div>
                                }
                                    .into_any()
                            }
                            SubmitOutcome::Failed(message) => {
                                view! {
                                    <div class="status-banner error">
                                        <strong>"Submission failed."</strong>
                                        " "
                                        {message}
                                    </div>
                                }
                                    .into_any()
                            }
                        })
                }}

                <div class="form-grid">
                    <div class="form-field">
                        <label for="user">"Your name"</label>
                        {text_input("user", "Used to tag jobs", |f| f.user.clone(), |f, v| f.user = v)}
                        <FieldError errors=errors field=Field::User />
                    </div>
                    <div class="form-field">
                        <label>"Queue status"</label>
                        <p class="muted-text">
                            "Jobs execute sequentially in the backend worker. Multiple users share the queue."
                        </p>
                    </div>
                </div>

                <div class="form-actions">
                    <p class="muted-text">"Large searches may take 10–15 minutes."</p>
                    <button class="primary-button" type="submit" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Submitting…" } else { "Submit search" }}
                    </button>
                </div>
            </SectionCard>
        </form>
    }
}
