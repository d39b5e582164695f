//! Command-line argument parsing for the lingua CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Sign in and store the refresh credential
    Login { username: String, password: String },
    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Confirm an email address
    Verify { email: String, code: String },
    /// Authenticated GET, printing the response body
    Get { path: String },
    /// Revoke and forget the stored session
    Logout,
    /// Show whether a session can be restored
    Status,
    /// Print usage
    Help,
    /// Arguments that do not form a command
    Invalid(String),
}

/// Parse command-line arguments (program name first) into a command.
///
/// # Examples
///
/// ```
/// use lingua::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["lingua".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    let Some(command) = args.first() else {
        return CliCommand::Help;
    };

    match (command.as_str(), rest.as_slice()) {
        ("--version" | "-V", _) => CliCommand::Version,
        ("--help" | "-h" | "help", _) => CliCommand::Help,
        ("login", [username, password]) => CliCommand::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
        ("register", [username, email, password]) => CliCommand::Register {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        },
        ("verify", [email, code]) => CliCommand::Verify {
            email: email.to_string(),
            code: code.to_string(),
        },
        ("get", [path]) => CliCommand::Get {
            path: path.to_string(),
        },
        ("logout", []) => CliCommand::Logout,
        ("status", []) => CliCommand::Status,
        ("login" | "register" | "verify" | "get" | "logout" | "status", _) => {
            CliCommand::Invalid(format!("wrong number of arguments for '{}'", command))
        }
        (other, _) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("lingua")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::Help);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse(&["login", "ania", "hunter2"]),
            CliCommand::Login {
                username: "ania".to_string(),
                password: "hunter2".to_string()
            }
        );
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(
            parse(&["register", "ania", "ania@example.com", "hunter2"]),
            CliCommand::Register {
                username: "ania".to_string(),
                email: "ania@example.com".to_string(),
                password: "hunter2".to_string()
            }
        );
    }

    #[test]
    fn test_parse_get() {
        assert_eq!(
            parse(&["get", "/api/flashcards"]),
            CliCommand::Get {
                path: "/api/flashcards".to_string()
            }
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse(&["logout"]), CliCommand::Logout);
        assert_eq!(parse(&["status"]), CliCommand::Status);
        assert_eq!(
            parse(&["verify", "ania@example.com", "123456"]),
            CliCommand::Verify {
                email: "ania@example.com".to_string(),
                code: "123456".to_string()
            }
        );
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert!(matches!(parse(&["login", "ania"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["logout", "now"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse(&["sync"]),
            CliCommand::Invalid("unknown command 'sync'".to_string())
        );
    }
}
