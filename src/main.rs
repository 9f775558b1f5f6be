use anyhow::Context;
use tracing_subscriber::EnvFilter;
use travel_scout::{AppConfig, SearchService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (from, to, check_in, check_out) = match args.as_slice() {
        [from, to, check_in] => (from, to, check_in, None),
        [from, to, check_in, check_out] => (from, to, check_in, Some(check_out.as_str())),
        _ => {
            eprintln!("usage: travel_scout <from> <to> <check-in> [check-out]");
            eprintln!("       dates are YYYY-MM-DD");
            std::process::exit(2);
        }
    };

    let service = SearchService::new(AppConfig::from_env())?;
    let response = service
        .search_params(from, to, check_in, check_out)
        .await
        .context("search failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
