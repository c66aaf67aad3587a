use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{Claims, SubjectId, TokenVerifier};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a bearer token signed with JWT_SECRET")]
    Issue {
        #[arg(long, help = "Subject (user id)")]
        sub: SubjectId,
        #[arg(long, help = "Role claim, e.g. admin")]
        role: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<i64>,
    },

    #[command(about = "Verify a token and print its claims")]
    Inspect {
        #[arg(help = "JWT to verify")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let verifier = TokenVerifier::new(&config.security.jwt_secret)?;

    match cmd {
        TokenCommands::Issue { sub, role, hours } => {
            let hours = hours.unwrap_or(config.security.jwt_expiry_hours as i64);
            let claims = Claims::new(sub, role, Duration::hours(hours));
            let token = verifier.issue(&claims)?;
            output_success(
                output_format,
                &format!("Issued token for subject {}", sub),
                Some(json!({ "token": token, "expires_at": expiry(claims.exp) })),
            )
        }
        TokenCommands::Inspect { token } => match verifier.verify(&token) {
            Ok(claims) => output_success(
                output_format,
                "Token is valid",
                Some(json!({
                    "sub": claims.sub,
                    "role": claims.role,
                    "expires_at": expiry(claims.exp),
                })),
            ),
            Err(e) => {
                output_error(output_format, &e.to_string(), Some("INVALID_TOKEN"))?;
                anyhow::bail!("token rejected")
            }
        },
    }
}

fn expiry(exp: i64) -> String {
    Utc.timestamp_opt(exp, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| exp.to_string())
}
