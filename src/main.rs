use std::fs::File;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use promptpilot::client::{AuthGate, Credentials, auth};
use promptpilot::core::config::{self, CliOverrides};
use promptpilot::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "promptpilot", about = "Chat assistant that rewrites your prompts into better ones")]
struct Args {
    /// Backend base URL (overrides config file and PROMPTPILOT_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Open the chat without waiting for the backend health check
    #[arg(long)]
    skip_health_check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and print its access token (password is read from stdin)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to promptpilot.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("promptpilot.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            backend_url: args.backend_url,
            skip_health_check: args.skip_health_check,
        },
    );
    info!("Prompt Pilot starting up against {}", resolved.base_url);

    if let Some(Command::Signup { name, email }) = args.command {
        return run_signup(&resolved.base_url, name, email).await;
    }

    let gate = AuthGate::new(resolved.auth_token.clone());
    if resolved.auth_required && !gate.is_authenticated() {
        warn!("No auth token configured, refusing to open the chat");
        eprintln!(
            "You need to sign up before using Prompt Pilot.\n\
             Run `promptpilot signup --name <NAME> --email <EMAIL>` and put the token in \
             ~/.promptpilot/config.toml under [auth] or in PROMPTPILOT_TOKEN."
        );
        return ExitCode::FAILURE;
    }

    match tui::run(resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal error: {}", e);
            eprintln!("Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_signup(base_url: &str, name: String, email: String) -> ExitCode {
    let password = match read_password() {
        Ok(p) if !p.is_empty() => p,
        Ok(_) => {
            eprintln!("Password must not be empty");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Could not read password: {e}");
            return ExitCode::FAILURE;
        }
    };

    let credentials = Credentials {
        name,
        email,
        password,
    };
    match auth::signup(base_url, &credentials).await {
        Ok(token) => {
            info!("Signup succeeded for {}", credentials.email);
            println!("{token}");
            eprintln!("Signed up. Add this token to ~/.promptpilot/config.toml ([auth] token) or PROMPTPILOT_TOKEN.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!("Signup failed: {}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn read_password() -> io::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
