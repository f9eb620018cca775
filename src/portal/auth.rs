use crate::config::AuthConfig;
use crate::error::{ClaimError, Result};
use crate::portal::{Credential, Portal, SignInRequest};
use crate::wallet::DerivedWallet;
use chrono::{SecondsFormat, Utc};
use ethers::signers::Signer;
use serde_json::Value;
use tracing::debug;

/// Build a standard sign-in-with-Ethereum (EIP-4361) message for a challenge
/// nonce.
pub fn build_siwe_message(address: &str, nonce: &str, auth: &AuthConfig) -> String {
    let issued_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        "{domain} wants you to sign in with your Ethereum account:\n\
         {address}\n\n\
         {statement}\n\n\
         URI: {uri}\n\
         Version: 1\n\
         Chain ID: {chain_id}\n\
         Nonce: {nonce}\n\
         Issued At: {issued_at}",
        domain = auth.domain,
        address = address,
        statement = auth.statement,
        uri = auth.uri,
        chain_id = auth.chain_id,
        nonce = nonce,
        issued_at = issued_at,
    )
}

fn nonce_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Choose the message to sign for a challenge payload.
///
/// Precedence: a ready-made `message` from the portal, then the operator
/// template with `{address}`/`{nonce}` substituted, then a SIWE message.
pub fn pick_message(nonce_payload: &Value, address: &str, auth: &AuthConfig) -> Result<String> {
    if let Some(message) = nonce_payload.get("message").and_then(Value::as_str) {
        return Ok(message.to_string());
    }

    let nonce = nonce_payload
        .get("nonce")
        .or_else(|| nonce_payload.pointer("/data/nonce"))
        .and_then(nonce_as_string)
        .ok_or_else(|| {
            ClaimError::Auth(format!(
                "nonce payload missing nonce/message for {}",
                address
            ))
        })?;

    if let Some(template) = &auth.message_template {
        return Ok(template
            .replace("{address}", address)
            .replace("{nonce}", &nonce));
    }

    Ok(build_siwe_message(address, &nonce, auth))
}

/// Full challenge-response login for one wallet: nonce, message, signature,
/// sign-in, bearer token.
pub async fn authenticate<P: Portal + ?Sized>(
    portal: &P,
    wallet: &DerivedWallet,
    auth: &AuthConfig,
    platform: &str,
) -> Result<Credential> {
    let address = wallet.address_string();
    let nonce_payload = portal.fetch_nonce(&address).await?;
    let message = pick_message(&nonce_payload, &address, auth)?;

    let signature = wallet.signer().sign_message(&message).await?;

    let login = portal
        .sign_in(&SignInRequest {
            wallet: address.clone(),
            platform: platform.to_string(),
            message,
            signature: format!("0x{}", signature),
        })
        .await?;

    let access_token = login
        .get("accessToken")
        .and_then(Value::as_str)
        .ok_or_else(|| ClaimError::Auth(format!("no accessToken returned for {}", address)))?;

    debug!("Authenticated {}", address);

    Ok(Credential {
        access_token: access_token.to_string(),
    })
}
