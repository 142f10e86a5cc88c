use std::error::Error;

use tracing_subscriber::EnvFilter;

use editor_reviewer::session::ReviewOutcome;
use editor_reviewer::{ReviewConfig, ReviewSession, diagnostics};

/// Review the files passed on the command line and print the grouped
/// findings, the terminal analog of the editor's problems/tree surfaces.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Optional .env for OLLAMA_URL / OLLAMA_MODEL overrides.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: editor-reviewer <file> [<file> ...]");
        std::process::exit(2);
    }

    let cfg = ReviewConfig::from_env();
    let source_tag = cfg.source_tag.clone();
    let mut session = ReviewSession::new(cfg);
    session.warmup().await;

    for path in &paths {
        let text = std::fs::read_to_string(path)?;
        match session.review_document(path, &text).await? {
            ReviewOutcome::Completed(count) => {
                let records = diagnostics::to_records(session.store().get(path), &text, &source_tag);
                println!("{path}: {count} finding(s)");
                for r in &records {
                    println!(
                        "  [{}] {}:{} {}",
                        r.severity.as_str(),
                        r.span.start.line + 1,
                        r.span.start.column,
                        r.message
                    );
                }
            }
            ReviewOutcome::OnCooldown => println!("{path}: skipped (cooldown)"),
        }
    }

    println!("total findings: {}", session.store().aggregate_count());
    Ok(())
}
