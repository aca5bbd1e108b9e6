use clap::{builder::BoolishValueParser, Arg, ArgAction, Command};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_JWT_KEY_ID: &str = "jwt-key-id";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_REQUIRE_TEAM_MEMBERSHIP: &str = "require-team-membership";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("HMAC secret for session tokens (at least 32 bytes)")
                .env("TEAMGATE_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_JWT_KEY_ID)
                .long(ARG_JWT_KEY_ID)
                .help("Key id written to the token header and required on decode")
                .env("TEAMGATE_JWT_KEY_ID"),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure")
                .env("TEAMGATE_COOKIE_SECURE")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_REQUIRE_TEAM_MEMBERSHIP)
                .long(ARG_REQUIRE_TEAM_MEMBERSHIP)
                .help("Only allow reading teams the session belongs to")
                .env("TEAMGATE_REQUIRE_TEAM_MEMBERSHIP")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
}
