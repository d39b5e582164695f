//! CLI front end for the lingua API client.
//!
//! ```ignore
//! use lingua::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(&client, command).await?;
//! ```

pub mod args;
pub mod logging;

pub use args::{parse_args, CliCommand};

use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;

use crate::client::ApiClient;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: lingua <command>

Commands:
  login <username> <password>             Sign in and remember the session
  register <username> <email> <password>  Create an account
  verify <email> <code>                   Confirm an email address
  get <path>                              Authenticated GET, prints the body
  logout                                  Sign out and forget the session
  status                                  Show the current session
  --version                               Print the version";

/// Execute `command` against `client`.
pub async fn run_cli_command(client: &ApiClient, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => println!("lingua {}", VERSION),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Invalid(reason) => bail!("{}\n\n{}", reason, USAGE),
        CliCommand::Login { username, password } => {
            client
                .login(&username, &password)
                .await
                .wrap_err("Login failed")?;
            println!("Signed in as {}", username);
        }
        CliCommand::Register {
            username,
            email,
            password,
        } => {
            client
                .register(&username, &email, &password)
                .await
                .wrap_err("Registration failed")?;
            println!("Account created. Check {} for a verification code.", email);
        }
        CliCommand::Verify { email, code } => {
            client
                .verify_email(&email, &code)
                .await
                .wrap_err("Verification failed")?;
            println!("Email verified");
        }
        CliCommand::Get { path } => {
            restore(client).await?;
            let response = client.get(&path).await.wrap_err_with(|| format!("GET {} failed", path))?;
            println!("{}", response.text().unwrap_or_default());
        }
        CliCommand::Logout => {
            client.logout().await.wrap_err("Logout failed")?;
            println!("Signed out");
        }
        CliCommand::Status => {
            if !restore(client).await? {
                println!("Not signed in");
                return Ok(());
            }
            let snapshot = client.session_snapshot();
            match snapshot.subject {
                Some(ref subject) => println!("Signed in as {}", subject),
                None => println!("Signed in"),
            }
            if let Some(expires_at) = snapshot.expires_at {
                println!("Access token expires at {}", expires_at.to_rfc3339());
            }
        }
    }
    Ok(())
}

/// Access credentials are memory-only, so every process starts by trading
/// the stored refresh credential for one.
async fn restore(client: &ApiClient) -> Result<bool> {
    client
        .restore_session()
        .await
        .wrap_err("Could not restore the session")
}
