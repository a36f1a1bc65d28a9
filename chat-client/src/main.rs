use anyhow::Result;
use clap::Parser;
use colored::*;
use domain::User;
use log::*;
use tokio::io::{AsyncBufReadExt, BufReader};

mod api_client;
mod output;
mod sse_client;

use api_client::{outgoing_message, ApiClient};
use output::{print_error, print_status};
use sse_client::Connection;

#[derive(Parser)]
#[command(name = "chat-client")]
#[command(about = "Terminal chat client: prints every broadcast message and sends each typed line")]
struct Cli {
    /// Name shown to other users
    #[arg(short = 'N', long, default_value = "Anon")]
    name: String,

    /// Base URL of the chat server
    #[arg(long, env = "CHAT_BASE_URL", default_value = "http://localhost:4000")]
    base_url: String,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    let started_at = chrono::Utc::now().to_rfc3339();
    let user = User::new(cli.name, &started_at);
    debug!("Chatting as {} ({})", user.name, user.id);

    let api_client = ApiClient::new(reqwest::Client::new(), cli.base_url);
    let connection = Connection::establish(api_client.base_url(), &user)?;

    print_status(&format!(
        "Connected to {} as {}",
        api_client.base_url(),
        user.name.bright_white().bold()
    ));

    let receiving = tokio::spawn(connection.receive_loop());
    send_loop(&api_client, &user, &started_at).await;

    if let Err(e) = receiving.await {
        warn!("Receive loop did not finish cleanly: {e}");
    }

    Ok(())
}

/// Posts every line typed on stdin until input ends or a send fails.
async fn send_loop(api_client: &ApiClient, user: &User, started_at: &str) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Input closed, no more messages to send");
                break;
            }
            Err(e) => {
                print_error(&format!("Error reading input: {e}"));
                break;
            }
        };

        let message = outgoing_message(user, started_at, &line);
        if let Err(e) = api_client.broadcast(&message).await {
            print_error(&format!("Error Sending Message: {e:#}"));
            break;
        }
    }
}
