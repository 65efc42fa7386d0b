use tabled::Table;

use crate::{
    cli::{connect, spinner},
    config::Config,
    error,
    spotify::CatalogClient,
    types::DeviceTableRow,
    warning,
};

pub async fn list_devices(config: &Config) {
    let client = connect(config).await;

    let pb = spinner("Fetching devices...");
    let devices = client.devices().await;
    pb.finish_and_clear();

    let devices = match devices {
        Ok(devices) => devices,
        Err(e) => error!("Cannot fetch devices. Err: {}", e),
    };

    if devices.is_empty() {
        warning!("No devices available. Open Spotify on a phone, desktop or speaker first");
        return;
    }

    let rows: Vec<DeviceTableRow> = devices
        .into_iter()
        .map(|d| DeviceTableRow {
            name: d.name,
            kind: d.kind,
            active: d.is_active,
            id: d.id.unwrap_or_default(),
        })
        .collect();
    println!("{}", Table::new(rows));
}
