use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use clap::Parser;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use uuid::Uuid;

const ROLES: [&str; 4] = ["admin", "tutor", "student", "parent"];

/// Mint a portal session JWT signed with an Ed25519 private key, for local testing.
///
/// The role is written to `metadata.role`, the same place the identity provider puts it.
/// Use the output as `Authorization: Bearer <token>` or as the `__session` cookie.
#[derive(Parser, Debug)]
#[command(name = "session-gen", version, about)]
struct Args {
    /// Portal role: admin / tutor / student / parent
    #[arg(long)]
    role: String,

    /// Path to the Ed25519 private key in PEM (PKCS#8)
    #[arg(long, value_name = "FILE")]
    private_pem: PathBuf,

    /// Must match AUTH_ISSUER on the portal
    #[arg(long)]
    issuer: String,

    /// Must match AUTH_AUDIENCE on the portal
    #[arg(long)]
    audience: String,

    /// Subject (user id). Default: user_<random uuid>.
    #[arg(long)]
    sub: Option<String>,

    /// Lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    ttl: u64,

    /// Sign even if the role is not one the portal knows (to exercise rejection)
    #[arg(long, default_value_t = false)]
    allow_unknown_role: bool,
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let role = args.role.trim().to_ascii_lowercase();
    if !args.allow_unknown_role && !ROLES.contains(&role.as_str()) {
        return Err(format!("unknown role {:?} (expected one of {:?})", args.role, ROLES).into());
    }

    let pem = fs::read_to_string(&args.private_pem)?;
    let key = EncodingKey::from_ed_pem(pem.as_bytes())?;

    let iat = now_unix();
    let sub = args
        .sub
        .unwrap_or_else(|| format!("user_{}", Uuid::new_v4().simple()));

    let claims = serde_json::json!({
        "iss": args.issuer,
        "aud": args.audience,
        "sub": sub,
        "iat": iat,
        "exp": iat + args.ttl,
        "jti": Uuid::new_v4().to_string(),
        "metadata": { "role": role },
    });

    let mut header = Header::new(Algorithm::EdDSA);
    header.typ = Some("JWT".to_string());
    let token = jsonwebtoken::encode(&header, &claims, &key)?;

    println!("{}", token);
    Ok(())
}
