//! `apod random` – randomly chosen entries.

use anyhow::Result;
use apod_core::{CancellationToken, FeedClient};

use super::output::print_json;

pub async fn run_random(client: &FeedClient, count: u32, cancel: &CancellationToken) -> Result<()> {
    let records = client.get_random(count, Some(cancel)).await?;
    if records.len() != count as usize {
        tracing::info!("requested {} entries, server returned {}", count, records.len());
    }
    print_json(&records)
}
