use clap::Parser;
use dara_local_common::{Database, JobListQuery, JobListView, SubmissionForm, SubmitEndpoint};
use dara_local_rust::{cli, client, config, error, render, upload};
use cli::{Cli, Commands};
use client::ApiClient;
use config::Config;
use dialoguer::Input;
use error::{DaraError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose {
        "dara_local_rust=debug,dara_local=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// バックエンド応答待ちの間スピナーを出す
async fn with_spinner<T, F>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn prompt_user() -> Result<String> {
    let input: String = Input::new()
        .with_prompt("Your name")
        .interact_text()
        .map_err(|e| DaraError::Prompt(e.to_string()))?;
    Ok(input)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("✖ {}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load()?;
    let base_url = config.resolve_base_url(cli.base_url.as_deref());
    tracing::debug!(%base_url, "using API base");

    match cli.command {
        Commands::Submit {
            pattern,
            user,
            chemical_system,
            required,
            exclude,
            wavelength,
            instrument,
            database,
            max_phases,
            mp_experimental_only,
            mp_max_e_above_hull,
            cifs,
            legacy,
        } => {
            let endpoint = if legacy { SubmitEndpoint::Legacy } else { SubmitEndpoint::V2 };

            let user = match user.or_else(|| config.default_user.clone()) {
                Some(user) => user,
                None => prompt_user()?,
            };

            let mut form = SubmissionForm::default();
            form.user = user;
            form.pattern_file = Some(upload::describe(&pattern)?);
            form.chemical_system = chemical_system;
            form.required_elements = required;
            form.exclude_elements = exclude;
            form.wavelength = wavelength;
            form.instrument_profile = instrument;
            form.max_phases = max_phases;
            form.structure_files = cifs
                .iter()
                .map(|p| upload::describe(p))
                .collect::<Result<Vec<_>>>()?;
            form.select_database(database);
            if let Some(filters) = form.database.mp_filters_mut() {
                filters.experimental_only = mp_experimental_only;
                filters.max_e_above_hull = mp_max_e_above_hull;
            } else if database != Database::Mp && mp_experimental_only {
                tracing::warn!("--mp-experimental-only is ignored unless --database MP");
            }

            // 検証に失敗したらリクエストは送らない
            let submission = match form.validate(endpoint) {
                Ok(submission) => submission,
                Err(errors) => {
                    tracing::debug!(count = errors.len(), "submission rejected by validation");
                    eprintln!("✖ 入力内容を確認してください");
                    for (field, message) in errors.iter() {
                        eprintln!("  {}: {}", field.label(), message);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            };

            let files = upload::SubmissionFiles::load(&pattern, &cifs)?;
            let client = ApiClient::new(&base_url, Duration::from_secs(config.timeout_seconds))?;
            let job_id = with_spinner("Submitting…", client.submit(&submission, &files)).await?;

            println!("✔ {}", render::render_submitted(&job_id));
        }

        Commands::List { status, user, limit, offset } => {
            let client = ApiClient::new(&base_url, Duration::from_secs(config.timeout_seconds))?;
            let mut view = JobListView::new(status);
            view.user = user;

            let query = JobListQuery {
                limit,
                offset,
                ..view.request_query()
            };
            let ticket = view.begin_refresh();
            let result = with_spinner("Loading jobs…", client.list_jobs(&query)).await;
            view.finish(
                &ticket,
                result.map(|response| response.jobs).map_err(|e| e.user_message()),
            );

            // 取得失敗時はエラー文だけを出す（表は出さない）
            if view.error().is_some() {
                eprint!("{}", render::render_job_list(&view));
                return Ok(ExitCode::FAILURE);
            }
            print!("{}", render::render_job_list(&view));
        }

        Commands::Show { job_id, json } => {
            let client = ApiClient::new(&base_url, Duration::from_secs(config.timeout_seconds))?;
            let detail = with_spinner("Loading job…", client.job_detail(&job_id)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", render::render_job_detail(&detail, client.paths()));
            }
        }

        Commands::Download { job_id, index, output } => {
            let client = ApiClient::new(&base_url, Duration::from_secs(config.timeout_seconds))?;
            let bytes = with_spinner("Downloading report…", client.download_report(&job_id, index)).await?;

            let output = output.unwrap_or_else(|| cli::default_download_path(&job_id, index));
            std::fs::write(&output, &bytes)?;
            println!("✔ Report saved: {} ({} bytes)", output.display(), bytes.len());
        }

        Commands::Config { set_base_url, set_user, show } => {
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ APIベースURLを設定しました");
            }

            if let Some(user) = set_user {
                config.set_default_user(user)?;
                println!("✔ 既定の投稿者名を設定しました");
            }

            if show {
                println!("設定:");
                println!("  APIベースURL: {}", config.resolve_base_url(cli.base_url.as_deref()));
                println!(
                    "  投稿者名: {}",
                    config.default_user.as_deref().unwrap_or("未設定")
                );
                println!("  接続タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
