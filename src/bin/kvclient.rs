use anyhow::Result;
use clap::Parser;
use paxkv::{ActivityLog, PeerClient};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "kvclient")]
#[command(about = "Interactive client for the replicated key-value store")]
struct Cli {
    server_address: String,
    server_port: u16,
}

const PREPOPULATION: [&str; 5] = [
    "put player Kohli",
    "put position batting",
    "put strength placement",
    "put weakness leg spin",
    "put favorite aggression",
];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = ActivityLog::new("clientLog.txt");
    let client_id = client_identifier();
    let base_url = format!("http://{}:{}", cli.server_address, cli.server_port);
    let client = PeerClient::new(Duration::from_secs(10))?;

    for input in PREPOPULATION {
        let response = client.execute(&base_url, &client_id, input).await?;
        log.activity(&format!(
            "Pre-populated by client {client_id}, received response: {response}"
        ));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("Enter command (type 'exit' to quit):");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = line.trim();
        if command.eq_ignore_ascii_case("exit") {
            println!("exiting client");
            log.activity("Client closed");
            break;
        }
        if command.is_empty() {
            println!("Please enter a command.");
            continue;
        }

        log.activity(&format!("Client {client_id} sent command: {command}"));
        match client.execute(&base_url, &client_id, command).await {
            Ok(response) => {
                log.activity(&format!(
                    "Client {client_id} received response: {response}"
                ));
                println!("Response: {response}");
            }
            Err(e) => {
                log.error(&format!("Request failed: {e}"));
                eprintln!("Request failed: {e}");
            }
        }
    }

    Ok(())
}

fn client_identifier() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{host}-{}", std::process::id())
}
