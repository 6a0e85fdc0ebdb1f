use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    management::{CredentialStore, TokenManager},
    spotify::client::SpotifyClient,
    types::DeviceTableRow,
};

/// Lists the user's available playback devices as a table.
pub async fn devices() {
    let manager = Arc::new(TokenManager::from_env(CredentialStore::default_path()));
    match manager.load_persisted().await {
        Ok(Some(_)) => {}
        _ => error!("Not authenticated. Please run `spotibridge auth` first."),
    }

    let client = SpotifyClient::new(manager);

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching devices...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let devices = match client.devices().await {
        Ok(devices) => {
            pb.finish_and_clear();
            devices
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch devices: {}", e);
        }
    };

    if devices.is_empty() {
        info!("No devices available. Open Spotify on a device and try again.");
        return;
    }

    let rows: Vec<DeviceTableRow> = devices
        .into_iter()
        .map(|d| DeviceTableRow {
            name: d.name,
            kind: d.kind,
            active: if d.is_active { "yes".to_string() } else { "no".to_string() },
            volume: format!("{}%", d.volume_percent),
            id: d.id.unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
