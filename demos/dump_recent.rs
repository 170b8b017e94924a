// Print stored samples as JSON, optionally limited to the last day/week/month.
//
// Usage: cargo run --example dump_recent -- [DB_PATH] [day|week|month]
//   DB_PATH  default: ./data/speedtest.db

use speedlog::store::MeasurementStore;
use speedlog::window::{Period, resolve};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("./data/speedtest.db");
    let period = args.get(2).map(|s| s.parse::<Period>()).transpose()?;

    let store = MeasurementStore::open(path)?;
    let samples = store.query(&resolve(period)).await?;
    store.close().await;

    println!("{}", serde_json::to_string_pretty(&samples)?);
    Ok(())
}
