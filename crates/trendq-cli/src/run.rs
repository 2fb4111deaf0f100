//! Run wiring for the CLI: input loading, collaborator construction, and
//! summary reporting.
//!
//! Everything here is called from `main` after argument parsing. Input
//! problems surface as `anyhow` errors with file context; run outcomes are
//! printed from the [`RunSummary`] the coordinator returns, including the
//! partial summary carried by a session abort.

use std::sync::Arc;

use anyhow::Context;

use trendq_client::{Pacer, PacingPolicy, TrendsClient};
use trendq_core::{
    load_app_config, parse_keyword_lines, AliasTable, CategoryId, Keyword, MonthDate, RangeMode,
};
use trendq_runner::{
    CancelFlag, RunCoordinator, RunError, RunRequest, RunSummary, ThrottledFetcher,
};
use trendq_store::DirStore;

use crate::Cli;

/// Months of history an explicit range covers when no dates are given.
const DEFAULT_LOOKBACK_MONTHS: u32 = 2;

/// Picks the range mode from the mutually exclusive mode flags.
pub(crate) fn resolve_mode(cli: &Cli, now: MonthDate) -> RangeMode {
    if let Some(since) = cli.all_quarters {
        RangeMode::Quarterly { since }
    } else if let Some(since) = cli.all_years {
        RangeMode::Yearly { since }
    } else {
        RangeMode::Explicit {
            start: cli
                .start_date
                .unwrap_or_else(|| now.minus_months(DEFAULT_LOOKBACK_MONTHS)),
            end: cli.end_date.unwrap_or(now),
        }
    }
}

/// Loads keyword phrases from the flag list or the keyword file, then applies
/// the alias table (if one was given) to each phrase.
pub(crate) fn load_keywords(cli: &Cli) -> anyhow::Result<Vec<Keyword>> {
    let phrases = match &cli.file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read keyword file {}", path.display()))?;
            parse_keyword_lines(raw.lines())
        }
        None => parse_keyword_lines(cli.keywords.iter().map(String::as_str)),
    };

    let aliases = match &cli.aliases {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read alias file {}", path.display()))?;
            AliasTable::from_lines(raw.lines())?
        }
        None => AliasTable::default(),
    };
    if !aliases.is_empty() {
        tracing::debug!(entries = aliases.len(), "alias table loaded");
    }

    Ok(phrases.iter().map(|p| aliases.resolve(p)).collect())
}

pub(crate) async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_app_config()?;
    let now = MonthDate::current();

    let request = RunRequest {
        keywords: load_keywords(&cli)?,
        mode: resolve_mode(&cli, now),
        categories: cli
            .categories
            .iter()
            .map(|id| CategoryId::new(id.clone()))
            .collect(),
        now,
    };

    let policy = PacingPolicy::from_arg(&cli.throttle)?;
    let client = TrendsClient::new(&config).context("failed to build portal client")?;
    let fetcher = ThrottledFetcher::new(
        Arc::new(client),
        Pacer::new(policy),
        config.max_retries,
        config.retry_backoff_base_ms,
    );
    let store = Arc::new(DirStore::new(cli.output.clone()));
    let coordinator = RunCoordinator::new(fetcher, store);

    if cli.dry_run {
        let items = coordinator.plan_only(&request).await?;
        for item in &items {
            println!("{}", item.key);
        }
        println!("dry-run: {} item(s) would be fetched", items.len());
        return Ok(());
    }

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received — finishing the current item, then stopping");
            handler_flag.cancel();
        }
    });

    match coordinator.run(&request, &cancel).await {
        Ok(summary) => {
            print_summary(&cli, &summary)?;
            Ok(())
        }
        Err(RunError::SessionInvalid {
            key,
            reason,
            summary,
        }) => {
            print_summary(&cli, &summary)?;
            anyhow::bail!("session rejected while fetching {key}: {reason}");
        }
        Err(err @ RunError::Config(_)) => Err(err.into()),
    }
}

fn print_summary(cli: &Cli, summary: &RunSummary) -> anyhow::Result<()> {
    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}
