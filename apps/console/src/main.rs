use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    CatalogSession, DelayedSubmitter, FrontEnd, MissingAuthenticator, SubmissionSession,
};
use shared::{
    domain::{FieldId, FilterDimension, RecordId, SortField},
    protocol::UiEvent,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod account;
mod config;
mod events;
mod presenter;

use account::{run_account, AccountRequest};
use config::{load_settings, DEFAULT_CONFIG_PATH};
use events::{browse_events, parse_field_assignment, submission_events, BrowseRequest};
use presenter::JsonPresenter;

#[derive(Parser, Debug)]
#[command(about = "Headless single-cell dataset catalog")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search, filter, sort and page through the catalog table.
    Browse {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        species: Option<String>,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// `<field>-<asc|desc>`, e.g. `year-desc`.
        #[arg(long)]
        sort: Option<String>,
        /// Column header clicks, applied in order.
        #[arg(long = "click", value_parser = parse_sort_field)]
        clicks: Vec<SortField>,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        page: Option<usize>,
    },
    /// Show one record with its related datasets.
    Show { id: i64 },
    /// Walk the submission wizard with the given field values and submit.
    Submit {
        #[arg(long = "field", value_parser = parse_field_arg)]
        fields: Vec<(FieldId, String)>,
        #[arg(long)]
        agree_terms: bool,
    },
    /// Sign in. No credential backend is configured, so valid input is rejected upstream.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    /// Fill and send the registration form.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        institution: Option<String>,
        #[arg(long)]
        agree_terms: bool,
    },
}

impl Command {
    fn account_request(&self) -> Option<AccountRequest> {
        match self {
            Command::Login {
                email,
                password,
                remember_me,
            } => Some(AccountRequest::Login {
                email: email.clone(),
                password: password.clone(),
                remember_me: *remember_me,
            }),
            Command::Register {
                name,
                email,
                password,
                confirm_password,
                institution,
                agree_terms,
            } => Some(AccountRequest::Register {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                confirm_password: confirm_password.clone(),
                institution: institution.clone(),
                agree_terms: *agree_terms,
            }),
            _ => None,
        }
    }
}

fn parse_sort_field(raw: &str) -> Result<SortField, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

fn parse_field_arg(raw: &str) -> Result<(FieldId, String), String> {
    parse_field_assignment(raw).map_err(|err| format!("{err:#}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    if let Some(request) = cli.command.account_request() {
        let report = run_account(MissingAuthenticator, &request).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return match report.error {
            Some(err) => Err(anyhow!("{:?}: {}", err.code, err.message)),
            None => Ok(()),
        };
    }

    let settings = load_settings(&cli.config);
    info!(?settings, "settings loaded");
    let records = settings.load_records()?;

    let mut front = FrontEnd::new(
        CatalogSession::new(records, settings.view_state()?),
        SubmissionSession::new(DelayedSubmitter::new(settings.submit_delay())),
        JsonPresenter::new(),
    )
    .with_search_debounce(settings.search_debounce());

    let events = match cli.command {
        Command::Browse {
            search,
            species,
            platform,
            status,
            sort,
            clicks,
            page_size,
            page,
        } => {
            front.render();
            let filters = [
                (FilterDimension::Species, species),
                (FilterDimension::Platform, platform),
                (FilterDimension::Status, status),
            ]
            .into_iter()
            .filter_map(|(dimension, value)| value.map(|value| (dimension, value)))
            .collect();
            browse_events(&BrowseRequest {
                search,
                filters,
                sort,
                click: clicks,
                page_size,
                page,
            })?
        }
        Command::Show { id } => vec![UiEvent::ShowRecord(RecordId(id))],
        Command::Submit {
            fields,
            agree_terms,
        } => {
            front.render();
            submission_events(&fields, agree_terms)
        }
        // Answered by the account forms above.
        Command::Login { .. } | Command::Register { .. } => Vec::new(),
    };

    let mut failure = None;
    for event in events {
        let name = event.name();
        if let Err(err) = front.dispatch(event).await {
            warn!(event = name, code = ?err.code, message = %err.message, "event rejected");
            failure = Some(err);
            break;
        }
    }
    front.settle().await;

    println!("{}", front.presenter().to_json()?);

    match failure {
        Some(err) => Err(anyhow!("{:?}: {}", err.code, err.message)),
        None => Ok(()),
    }
}
