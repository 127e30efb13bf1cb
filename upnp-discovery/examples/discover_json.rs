//! Listen for UPnP devices and print them as JSON for scripting
//!
//! Usage: cargo run -p upnp-browser-discovery --example discover_json [seconds]

use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let window = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    let devices = upnp_discovery::discover(Duration::from_secs(window)).await?;

    println!("{}", serde_json::to_string_pretty(&devices)?);
    Ok(())
}
