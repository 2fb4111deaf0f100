use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use trendq_core::MonthDate;

mod run;


#[derive(Debug, Parser)]
#[command(name = "trendq")]
#[command(about = "Batch interest-over-time collector with resumable CSV output")]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["keywords", "file"])
))]
struct Cli {
    /// Keyword phrase to query (repeatable).
    #[arg(long = "keyword", value_name = "PHRASE")]
    keywords: Vec<String>,

    /// File with one keyword phrase per line.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Pipe-delimited `display|canonical` alias file.
    #[arg(long, value_name = "PATH")]
    aliases: Option<PathBuf>,

    /// Topic category identifier, e.g. 0-7-107 (repeatable).
    #[arg(long = "category", value_name = "ID")]
    categories: Vec<String>,

    /// Fetch one series per complete calendar quarter since this month.
    #[arg(
        long,
        value_name = "YYYY-MM",
        conflicts_with_all = ["all_years", "start_date", "end_date"]
    )]
    all_quarters: Option<MonthDate>,

    /// Fetch one series per complete calendar year since this month.
    #[arg(long, value_name = "YYYY-MM", conflicts_with_all = ["start_date", "end_date"])]
    all_years: Option<MonthDate>,

    /// First month of an explicit range (default: two months ago).
    #[arg(long, value_name = "YYYY-MM")]
    start_date: Option<MonthDate>,

    /// Last month of an explicit range (default: the current month).
    #[arg(long, value_name = "YYYY-MM")]
    end_date: Option<MonthDate>,

    /// Directory that receives one CSV file per work item.
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// Pause between fetches: `none`, a fixed number of seconds, or `random`.
    #[arg(long, value_name = "SECONDS", default_value = "none")]
    throttle: String,

    /// Plan and filter only; print the remaining work items and exit.
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON instead of text.
    #[arg(long)]
    summary_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    run::execute(cli).await
}
