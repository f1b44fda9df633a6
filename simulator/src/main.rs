mod reading;

use clap::Parser;
use reading::Sensor;
use std::time::Duration;
use tracing::{error, info, warn};

/// Plays the role of the sensor device, posting readings to the weather server.
#[derive(Debug, Parser)]
#[command(name = "simulator", version)]
struct Args {
    /// Base URL of the weather server
    #[arg(long, env = "SERVER_URL", default_value = "http://localhost:5000")]
    server_url: String,

    /// Delay between readings in milliseconds
    #[arg(long, env = "INTERVAL_MS", default_value_t = 4000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Stop after this many send attempts (runs forever if omitted)
    #[arg(long, env = "COUNT")]
    count: Option<u64>,

    /// Starting temperature in °C
    #[arg(long, default_value_t = 22.0)]
    temp: f64,

    /// Starting relative humidity in %
    #[arg(long, default_value_t = 50.0)]
    hum: f64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting sensor simulator");
    info!("Server: {}, interval: {}ms", args.server_url, args.interval_ms);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let endpoint = format!("{}/data", args.server_url.trim_end_matches('/'));
    let mut sensor = Sensor::new(args.temp, args.hum);
    let mut interval = tokio::time::interval(Duration::from_millis(args.interval_ms));
    let mut sampled = 0u64;
    let mut accepted = 0u64;

    loop {
        interval.tick().await;

        let reading = sensor.sample(&mut rand::thread_rng());
        sampled += 1;
        info!("Read sensor data: temp={}, hum={}", reading.temp, reading.hum);

        // A failed send is not retried; the next cycle sends a fresh reading
        match client.post(&endpoint).json(&reading).send().await {
            Ok(response) if response.status().is_success() => {
                accepted += 1;
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("Server rejected reading ({}): {}", status, body);
            }
            Err(e) => {
                warn!("Failed to send reading: {}", e);
            }
        }

        if let Some(count) = args.count {
            if sampled >= count {
                info!("Sent {} readings ({} accepted), stopping", sampled, accepted);
                break;
            }
        }
    }
}
