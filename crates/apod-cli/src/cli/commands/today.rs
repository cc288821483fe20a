//! `apod today` – one entry, today's or for `--date`.

use anyhow::Result;
use apod_core::{CancellationToken, FeedClient};

use super::output::print_json;

pub async fn run_today(
    client: &FeedClient,
    date: Option<&str>,
    cancel: &CancellationToken,
) -> Result<()> {
    let record = client.get_one(date, Some(cancel)).await?;
    tracing::info!("fetched entry for {}", record.date());
    print_json(&record)
}
