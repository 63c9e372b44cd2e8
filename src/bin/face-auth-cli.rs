use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "face-auth-cli")]
#[command(about = "Command-line client for the face-auth service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is running
    Status,
    /// Register a new user
    Register {
        username: String,
        /// Face token (e.g. a base64 capture)
        face_data: String,
    },
    /// Log in as an existing user
    Login {
        username: String,
        /// Face token (e.g. a base64 capture)
        face_data: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/api/status", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Register {
            username,
            face_data,
        } => {
            let res = client
                .post(format!("{}/api/register", cli.url))
                .json(&json!({ "username": username, "faceData": face_data }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login {
            username,
            face_data,
        } => {
            let res = client
                .post(format!("{}/api/login", cli.url))
                .json(&json!({ "username": username, "faceData": face_data }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => {
            if !status.is_success() {
                eprintln!("Error: service returned status {}", status);
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: service returned status {}", status);
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
    }
    Ok(())
}
