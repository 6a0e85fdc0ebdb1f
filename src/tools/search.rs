use serde_json::{Value, json};

use crate::{Res, spotify::client::SpotifyClient};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Combined track/album/artist search.
pub async fn search_music(client: &SpotifyClient, query: &str, limit: Option<u32>) -> Res<Value> {
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let results = client.search(query, limit).await?;

    Ok(json!({
        "success": true,
        "query": query,
        "results": results,
    }))
}
