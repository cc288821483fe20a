//! `apod range` – every entry between two dates.

use anyhow::Result;
use apod_core::{CancellationToken, FeedClient};

use super::output::print_json;

pub async fn run_range(
    client: &FeedClient,
    start: &str,
    end: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    // YYYY-MM-DD compares correctly as text.
    if start > end {
        tracing::warn!("start date {} is after end date {}", start, end);
    }
    let records = client.get_range(start, end, Some(cancel)).await?;
    print_json(&records)
}
