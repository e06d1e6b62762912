pub mod backend;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_STATUS: &str = "status";
pub const CMD_HEALTH: &str = "health";
pub const CMD_PROVIDERS: &str = "providers";
pub const CMD_LOGIN: &str = "login";
pub const CMD_SIGNUP: &str = "signup";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_DATA: &str = "data";
pub const CMD_ACTION: &str = "action";
pub const CMD_OAUTH_URL: &str = "oauth-url";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NAME: &str = "name";
pub const ARG_ACTION_NAME: &str = "action-name";
pub const ARG_PROVIDER: &str = "provider";

fn credentials(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL)
                .long("email")
                .help("Account email")
                .env("AUTHGATE_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long("password")
                .help("Account password")
                .env("AUTHGATE_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("authgate")
        .about("Cookie-session API client with transparent session refresh")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new(CMD_STATUS).about("Show the backend session status"))
        .subcommand(Command::new(CMD_HEALTH).about("Query the public health endpoint"))
        .subcommand(Command::new(CMD_PROVIDERS).about("List the enabled OAuth providers"))
        .subcommand(credentials(
            Command::new(CMD_LOGIN).about("Log in with email and password, printing the session cookie"),
        ))
        .subcommand(
            credentials(Command::new(CMD_SIGNUP).about("Create a local account")).arg(
                Arg::new(ARG_NAME)
                    .long("name")
                    .help("Display name")
                    .required(true),
            ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("End the session"))
        .subcommand(Command::new(CMD_DATA).about("Fetch protected data"))
        .subcommand(
            Command::new(CMD_ACTION)
                .about("Run a protected action")
                .arg(Arg::new(ARG_ACTION_NAME).value_name("NAME").required(true)),
        )
        .subcommand(
            Command::new(CMD_OAUTH_URL)
                .about("Print the authorization URL of an OAuth provider")
                .arg(Arg::new(ARG_PROVIDER).value_name("PROVIDER").required(true)),
        );

    let command = backend::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "authgate");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Cookie-session API client with transparent session refresh".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        temp_env::with_vars(
            [
                ("AUTHGATE_API_URL", None::<&str>),
                ("AUTHGATE_SESSION_COOKIE", None),
                ("AUTHGATE_TIMEOUT_SECONDS", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "authgate",
                    "data",
                    "--api-url",
                    "https://api.example.com",
                    "--cookie",
                    "jwt=abc",
                    "--timeout",
                    "5",
                ]);

                assert_eq!(matches.subcommand_name(), Some(CMD_DATA));
                assert_eq!(
                    matches.get_one::<String>(backend::ARG_API_URL).cloned(),
                    Some("https://api.example.com".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(backend::ARG_COOKIE).cloned(),
                    Some("jwt=abc".to_string())
                );
                assert_eq!(matches.get_one::<u64>(backend::ARG_TIMEOUT).copied(), Some(5));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("AUTHGATE_API_URL", Some("https://env.example")),
                ("AUTHGATE_SESSION_COOKIE", Some("jwt=env")),
                ("AUTHGATE_TIMEOUT_SECONDS", Some("30")),
                ("AUTHGATE_LOG_LEVEL", Some("info")),
                ("AUTHGATE_LOG_JSON", Some("true")),
            ],
            || {
                let matches = new().get_matches_from(vec!["authgate", "status"]);
                assert_eq!(
                    matches.get_one::<String>(backend::ARG_API_URL).cloned(),
                    Some("https://env.example".to_string())
                );
                assert_eq!(matches.get_one::<u64>(backend::ARG_TIMEOUT).copied(), Some(30));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
                assert!(matches.get_flag(logging::ARG_LOG_JSON));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("AUTHGATE_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["authgate", "health"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("AUTHGATE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["authgate".to_string(), "status".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_login_requires_credentials() {
        temp_env::with_vars(
            [
                ("AUTHGATE_EMAIL", None::<&str>),
                ("AUTHGATE_PASSWORD", None),
            ],
            || {
                let result = new().try_get_matches_from(vec!["authgate", "login", "--email", "a@b.c"]);
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(new().try_get_matches_from(vec!["authgate"]).is_err());
    }
}
