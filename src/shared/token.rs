use anyhow::Context;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Claims for a channel subscription token, verified by the broker.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelClaims {
    pub sub: String,
    pub channels: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

/// Signs an HS512 JWT over the claims.
pub fn sign_channel_token(claims: &ChannelClaims, secret: &str) -> anyhow::Result<String> {
    let header = serde_json::to_vec(&Header {
        alg: "HS512",
        typ: "JWT",
    })
    .context("failed to serialize token header")?;
    let payload = serde_json::to_vec(claims).context("failed to serialize channel claims")?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .context("failed to initialize token signer")?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}
