// src/bin/probe.rs
// Smoke-test client for a running nearby-poi instance.
// Hits /health, /nearby-pois and /ride-price and prints what came back.

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::time::{Duration, Instant};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

// Tehran city center, a safe default for manual smoke runs
const DEFAULT_LAT: &str = "35.6997";
const DEFAULT_LNG: &str = "51.3380";

struct Probe {
    client: Client,
    base_url: String,
}

impl Probe {
    fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, base_url }
    }

    async fn check_health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        if !response.status().is_success() {
            bail!("health check returned {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        println!("{}✓ health{}: {}", GREEN, RESET, body);
        Ok(())
    }

    async fn check_nearby(&self, post_token: &str, lat: &str, lng: &str) -> Result<()> {
        let url = format!(
            "{}/nearby-pois?post_token={}&lat={}&lng={}",
            self.base_url, post_token, lat, lng
        );
        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let elapsed = started.elapsed().as_secs_f64();

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if !status.is_success() {
            bail!("nearby-pois returned {}: {}", status, body);
        }

        let categories = body.as_object().map(|o| o.len()).unwrap_or(0);
        println!(
            "{}✓ nearby-pois{}: {} categories in {:.1}s",
            GREEN, RESET, categories, elapsed
        );
        for (category, pois) in body.as_object().into_iter().flatten() {
            let count = pois.as_array().map(|a| a.len()).unwrap_or(0);
            println!("    {}{}{}: {} POIs", BOLD, category, RESET, count);
        }
        Ok(())
    }

    async fn check_price(&self, lat: &str, lng: &str) -> Result<()> {
        // Destination is a fixed offset so the route is short but non-trivial
        let dest_lat: f64 = lat.parse().context("bad lat")?;
        let dest_lng: f64 = lng.parse().context("bad lng")?;
        let url = format!(
            "{}/ride-price?origin_lat={}&origin_lng={}&destination_lat={}&destination_lng={}",
            self.base_url,
            lat,
            lng,
            dest_lat + 0.02,
            dest_lng + 0.02
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if !status.is_success() {
            // Price providers need live credentials, so treat this as a warning
            println!(
                "{}⚠ ride-price{} returned {}: {}",
                YELLOW, RESET, status, body
            );
            return Ok(());
        }

        println!("{}✓ ride-price{}: {}", GREEN, RESET, body);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url = env::var("PROBE_BASE_URL").unwrap_or_else(|_| "http://localhost:8004".to_string());
    let lat = env::var("PROBE_LAT").unwrap_or_else(|_| DEFAULT_LAT.to_string());
    let lng = env::var("PROBE_LNG").unwrap_or_else(|_| DEFAULT_LNG.to_string());
    let post_token = env::var("PROBE_POST_TOKEN").unwrap_or_else(|_| "probe-token".to_string());

    println!("{}Probing {}{}", BOLD, base_url, RESET);

    let probe = Probe::new(base_url);

    if let Err(e) = probe.check_health().await {
        println!("{}✗ health{}: {:#}", RED, RESET, e);
        std::process::exit(1);
    }

    // Second nearby call with the same coordinate should be a cache hit
    probe.check_nearby(&post_token, &lat, &lng).await?;
    let started = Instant::now();
    probe.check_nearby(&post_token, &lat, &lng).await?;
    println!(
        "    repeat lookup took {:.2}s (cached)",
        started.elapsed().as_secs_f64()
    );

    probe.check_price(&lat, &lng).await?;

    println!("{}Done.{}", GREEN, RESET);
    Ok(())
}
