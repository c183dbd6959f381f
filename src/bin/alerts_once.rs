//! Run the alerts pipeline once and print the ranked list to stdout.

use chrono::{DateTime, Local, Utc};
use district_alerts::{build_pipeline, Alert, FilterConfig};

/// e.g. "Tuesday, 1 July, 6:00 pm"
fn readable_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local)
        .format("%A, %-d %B, %-I:%M %P")
        .to_string()
}

fn print_alert(a: &Alert) {
    let marker = if a.qualifies { "*" } else { " " };
    println!("{marker} {}", a.title());
    if let Some(onset) = a.onset {
        println!("    Starts: {}", readable_time(onset));
    }
    if let Some(url) = &a.info_url {
        println!("    More information: {url}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = FilterConfig::load_default()?;
    let pipeline = build_pipeline(config);

    match pipeline.run(Utc::now()).await {
        Ok(alerts) if alerts.is_empty() => println!("No alerts found."),
        Ok(alerts) => alerts.iter().for_each(print_alert),
        Err(e) => {
            tracing::error!(error = %e, "error loading alerts");
            println!("Failed to load alerts.");
            std::process::exit(1);
        }
    }
    Ok(())
}
