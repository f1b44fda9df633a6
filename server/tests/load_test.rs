//! Load test against a running server.
//! Run with: SERVER_URL=http://localhost:5000 cargo test -p weather-server --test load_test -- --ignored

use rand::Rng;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

fn server_url() -> String {
    std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

#[tokio::test]
#[ignore]
async fn test_concurrent_posts_all_land_in_history() {
    println!("\n🚀 Starting Load Test: concurrent POST /data");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let base = server_url();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    let before = client
        .get(format!("{}/history", base))
        .send()
        .await
        .unwrap()
        .json::<Vec<Value>>()
        .await
        .unwrap()
        .len();

    let total = 500;
    let concurrency = 25;
    let start = Instant::now();

    let handles: Vec<_> = (0..concurrency)
        .map(|_| {
            let client = client.clone();
            let base = base.clone();
            tokio::spawn(async move {
                let mut ok = 0;
                for _ in 0..total / concurrency {
                    let (temp, hum) = {
                        let mut rng = rand::thread_rng();
                        (rng.gen_range(15.0..35.0), rng.gen_range(30.0..80.0))
                    };
                    let response = client
                        .post(format!("{}/data", base))
                        .json(&json!({"temp": temp, "hum": hum}))
                        .send()
                        .await;
                    if matches!(response, Ok(ref r) if r.status().is_success()) {
                        ok += 1;
                    }
                }
                ok
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        accepted += handle.await.unwrap();
    }
    let duration = start.elapsed();

    let history = client
        .get(format!("{}/history", base))
        .send()
        .await
        .unwrap()
        .json::<Vec<Value>>()
        .await
        .unwrap();

    println!("\n📈 Results:");
    println!("  Accepted:       {}/{}", accepted, total);
    println!("  Duration:       {:.2}s", duration.as_secs_f64());
    println!(
        "  Rate:           {:.2} req/s",
        accepted as f64 / duration.as_secs_f64()
    );

    assert_eq!(accepted, total, "every reading should be accepted");
    assert_eq!(history.len(), before + total);

    let latest = client
        .get(format!("{}/data", base))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    let last = history.last().unwrap();
    assert_eq!(latest["temp"], last["temp"]);
    assert_eq!(latest["hum"], last["hum"]);
}
