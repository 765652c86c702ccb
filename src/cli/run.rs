use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use comfy_table::{Cell, Table};

use crate::affiliate::client::{HttpLookup, QueryExecutor};
use crate::affiliate::{OutcomeRecord, OutcomeStatus};
use crate::auth::credentials;
use crate::auth::token::TokenManager;
use crate::batch::BatchRunner;
use crate::config;
use crate::doctype::DocTypeRegistry;
use crate::error::AppError;
use crate::output::csv;

struct CategorySummary {
    id: &'static str,
    queried: usize,
    registered: usize,
    not_registered: usize,
    errors: usize,
}

pub async fn run(dir: &Path, only: &[String], delay_ms: u64) -> anyhow::Result<()> {
    let Some(credentials) = credentials::load(dir) else {
        return Err(AppError::CredentialsUnavailable.into());
    };

    let client = reqwest::Client::builder()
        .timeout(config::REQUEST_TIMEOUT)
        .build()?;
    let tokens = Arc::new(TokenManager::new(
        client.clone(),
        credentials,
        credentials::seed_token(dir),
    ));
    if tokens.bootstrap().await.is_none() {
        return Err(AppError::TokenUnavailable.into());
    }

    let doctypes = DocTypeRegistry::load(&dir.join(config::DOC_TYPE_FILE));
    if doctypes.is_empty() {
        tracing::info!(
            "No document-type definitions loaded, every category uses code {}",
            config::DEFAULT_DOC_TYPE
        );
    }

    let executor = QueryExecutor::new(Arc::new(HttpLookup::new(client)), tokens);
    let runner = BatchRunner::new(&executor, &doctypes, Duration::from_millis(delay_ms));

    let selected: Vec<_> = config::CATEGORIES
        .iter()
        .filter(|c| only.is_empty() || only.iter().any(|o| o == c.id))
        .collect();
    if selected.is_empty() {
        println!("No matching categories. Available categories:");
        for category in config::CATEGORIES {
            println!("  - {}", category.id);
        }
        return Ok(());
    }

    let mut written = Vec::new();
    let mut summaries = Vec::new();
    for category in selected {
        let Some(records) = runner.run_category(dir, category).await? else {
            continue;
        };
        let path = csv::write_outcomes(&dir.join(category.output_file), &records)?;
        println!("Wrote {}", path.display());
        summaries.push(summarize(category.id, &records));
        written.push(path);
    }

    if written.is_empty() {
        println!("No input files found; nothing to do. Looked for:");
        for category in config::CATEGORIES {
            println!("  - {}", category.input_file);
        }
        return Ok(());
    }

    super::consolidate::consolidate(dir, &written)?;
    print_summary(&summaries);
    Ok(())
}

fn summarize(id: &'static str, records: &[OutcomeRecord]) -> CategorySummary {
    CategorySummary {
        id,
        queried: records.len(),
        registered: records
            .iter()
            .filter(|r| r.status == OutcomeStatus::Registrado)
            .count(),
        not_registered: records
            .iter()
            .filter(|r| r.status == OutcomeStatus::NoRegistrado)
            .count(),
        errors: records.iter().filter(|r| r.status.is_error()).count(),
    }
}

fn print_summary(summaries: &[CategorySummary]) {
    println!("\n--- Run Summary ---");
    let mut table = Table::new();
    table.set_header(vec![
        "Category",
        "Queried",
        "Registered",
        "Not registered",
        "Errors",
    ]);

    for s in summaries {
        table.add_row(vec![
            Cell::new(s.id),
            Cell::new(s.queried),
            Cell::new(s.registered),
            Cell::new(s.not_registered),
            Cell::new(s.errors),
        ]);
    }

    println!("{table}");
}
