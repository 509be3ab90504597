//! Download a few days of surface elevation and temperature at one point.
//!
//! ```text
//! cargo run -p hycom-downloader --example point_timeseries
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use hycom_downloader::{init_tracing, HycomConfig, HycomDownloader, LogConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&LogConfig::default())?;

    let from = NaiveDate::from_ymd_opt(2015, 1, 1).ok_or_else(|| anyhow::anyhow!("bad date"))?;
    let to = NaiveDate::from_ymd_opt(2015, 1, 3).ok_or_else(|| anyhow::anyhow!("bad date"))?;

    let downloader = HycomDownloader::new(HycomConfig::default())?;
    let table = downloader
        .download_data(
            from,
            to,
            43.5,
            14.2,
            Some(vec!["surf_el".to_string(), "water_temp".to_string()]),
        )
        .await?;

    println!("{}", table.column_names().join("\t"));
    for row in table.rows() {
        let line: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        println!("{}", line.join("\t"));
    }
    println!("{} rows", table.len());

    Ok(())
}
