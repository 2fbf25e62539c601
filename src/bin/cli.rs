//! GridScope CLI
//!
//! Command-line client for a running GridScope server:
//! - Check status and switch panels
//! - Submit files to the upload simulator
//! - Read live readings and the event log
//! - Raise and dismiss notifications

use clap::{Parser, Subcommand, ValueEnum};
use gridscope::api::dto::{NotifyRequest, UploadRequest};
use gridscope::dashboard::{FileDescriptor, FilterSelection, Severity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridscope-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the GridScope power quality dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server and dashboard status
    Status,

    /// Activate a panel (dashboard, upload, logs, insights)
    Show {
        panel: String,
    },

    /// Submit files to the upload simulator
    Upload {
        /// Files to submit; only name and size are sent
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show the current readings
    Metrics,

    /// Show the event log, optionally changing the filter first
    Logs {
        /// Event type to keep (e.g. "Voltage Sag")
        #[arg(short, long)]
        event: Option<String>,
        /// Severity to keep (e.g. "Critical")
        #[arg(short, long)]
        severity: Option<String>,
    },

    /// Show a notification
    Notify {
        message: String,
        #[arg(short, long, value_enum, default_value = "info")]
        severity: SeverityArg,
    },

    /// Dismiss a notification by id
    Dismiss {
        id: u64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Info,
    Success,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Success => Severity::Success,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;
                    let view: serde_json::Value = client
                        .get(format!("{}/api/v1/view", cli.api_url))
                        .send()
                        .await?
                        .json()
                        .await?;

                    if cli.format == "json" {
                        let both = serde_json::json!({ "health": health, "view": view });
                        println!("{}", serde_json::to_string_pretty(&both)?);
                        return Ok(());
                    }

                    println!("GridScope v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Dashboard: {}", health["dashboard"].as_str().unwrap_or("unknown"));
                    println!(
                        "Active panel: {}",
                        view["active_panel"].as_str().unwrap_or("(none)")
                    );
                    println!(
                        "Uploads: {} completed, {} in progress",
                        array_len(&view["uploads"]["files"]),
                        array_len(&view["uploads"]["in_progress"])
                    );
                    println!("Notifications: {}", array_len(&view["notifications"]));
                    println!(
                        "WebSocket clients: {}",
                        health["ws_connections"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to GridScope API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the GridScope server is running:");
                    eprintln!("  cargo run --bin gridscope");
                    std::process::exit(1);
                }
            }
        }

        Commands::Show { panel } => {
            let response = client
                .post(format!("{}/api/v1/sections/{}", cli.api_url, panel))
                .send()
                .await?;
            let change = expect_json(response, "Show").await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&change)?);
            } else {
                match change["active"].as_str() {
                    Some(active) => println!("Active panel: {}", active),
                    None => println!("No panel named '{}'; nothing is active", panel),
                }
                if let Some(charts) = change["charts_constructed"].as_array() {
                    for chart in charts {
                        println!("  initialized {}", chart.as_str().unwrap_or("-"));
                    }
                }
            }
        }

        Commands::Upload { paths } => {
            let mut files = Vec::new();
            for path in &paths {
                let metadata = match std::fs::metadata(path) {
                    Ok(m) if m.is_file() => m,
                    _ => {
                        eprintln!("File not found: {:?}", path);
                        std::process::exit(1);
                    }
                };
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                files.push(FileDescriptor::new(name, metadata.len()));
            }

            let response = client
                .post(format!("{}/api/v1/uploads", cli.api_url))
                .json(&UploadRequest { files })
                .send()
                .await?;
            let receipt = expect_json(response, "Upload").await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                for accepted in receipt["accepted"].as_array().into_iter().flatten() {
                    println!(
                        "Uploading {} (id {})",
                        accepted["name"].as_str().unwrap_or("-"),
                        accepted["id"].as_u64().unwrap_or(0)
                    );
                }
                for rejected in receipt["rejected"].as_array().into_iter().flatten() {
                    println!("Rejected {}: only CSV or MAT files", rejected.as_str().unwrap_or("-"));
                }
            }
        }

        Commands::Metrics => {
            let response = client
                .get(format!("{}/api/v1/metrics/latest", cli.api_url))
                .send()
                .await?;
            let data = expect_json(response, "Metrics").await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{:<20} {:>10} {}", "Reading", "Value", "Unit");
                println!("{}", "-".repeat(36));
                for readout in data["readouts"].as_array().into_iter().flatten() {
                    println!(
                        "{:<20} {:>10} {}",
                        readout["label"].as_str().unwrap_or("-"),
                        readout["text"].as_str().unwrap_or("-"),
                        readout["unit"].as_str().unwrap_or("")
                    );
                }
            }
        }

        Commands::Logs { event, severity } => {
            if event.is_some() || severity.is_some() {
                let mut selection = FilterSelection {
                    event_type: "All Events".to_string(),
                    severity: "All Severities".to_string(),
                };
                if let Some(event) = event {
                    selection.event_type = event;
                }
                if let Some(severity) = severity {
                    selection.severity = severity;
                }

                let response = client
                    .put(format!("{}/api/v1/logs/filter", cli.api_url))
                    .json(&selection)
                    .send()
                    .await?;
                expect_json(response, "Filter").await?;
            }

            let response = client
                .get(format!("{}/api/v1/logs", cli.api_url))
                .send()
                .await?;
            let logs = expect_json(response, "Logs").await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&logs)?);
            } else {
                print_logs(&logs);
            }
        }

        Commands::Notify { message, severity } => {
            let response = client
                .post(format!("{}/api/v1/notifications", cli.api_url))
                .json(&NotifyRequest {
                    message,
                    severity: severity.into(),
                })
                .send()
                .await?;
            let note = expect_json(response, "Notify").await?;
            println!(
                "Notification {} shown ({})",
                note["id"].as_u64().unwrap_or(0),
                note["severity"].as_str().unwrap_or("-")
            );
        }

        Commands::Dismiss { id } => {
            let response = client
                .delete(format!("{}/api/v1/notifications/{}", cli.api_url, id))
                .send()
                .await?;

            if response.status().is_success() {
                println!("Dismissed notification {}", id);
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Dismiss failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::Config { output } => {
            let config = gridscope::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Parse a success body, or print the error and exit
async fn expect_json(
    response: reqwest::Response,
    action: &str,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("{} failed ({}): {}", action, status, text);
        std::process::exit(1);
    }
    Ok(response.json().await?)
}

fn array_len(value: &serde_json::Value) -> usize {
    value.as_array().map(|a| a.len()).unwrap_or(0)
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_logs(logs: &serde_json::Value) {
    println!(
        "Filter: {} / {}  ({} visible)",
        logs["selection"]["event_type"].as_str().unwrap_or("-"),
        logs["selection"]["severity"].as_str().unwrap_or("-"),
        logs["visible_count"].as_u64().unwrap_or(0)
    );
    println!();
    println!(
        "{:<17} {:<20} {:<9} {:<12} {}",
        "Time", "Event", "Severity", "Source", "Message"
    );
    println!("{}", "-".repeat(90));

    for row in logs["rows"].as_array().into_iter().flatten() {
        if !row["visible"].as_bool().unwrap_or(false) {
            continue;
        }
        println!(
            "{:<17} {:<20} {:<9} {:<12} {}",
            row["timestamp"].as_str().unwrap_or("-"),
            row["event_type"].as_str().unwrap_or("-"),
            row["severity"].as_str().unwrap_or("-"),
            row["source"].as_str().unwrap_or("-"),
            row["message"].as_str().unwrap_or("-")
        );
    }
}
