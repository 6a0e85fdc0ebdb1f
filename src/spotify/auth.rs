use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Client;

use crate::{Res, config, error::Error, types::TokenGrantResponse};

/// Generates the random `state` nonce carried through the authorization
/// redirect and verified by the callback handler.
pub fn generate_state_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Builds the authorization URL the user opens in a browser.
pub fn authorize_url(state_nonce: &str) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&state={state}&scope={scope}",
        auth_url = &config::auth_url(),
        client_id = &config::client_id(),
        redirect_uri = &config::redirect_uri(),
        state = state_nonce,
        scope = &config::scope()
    )
}

/// Exchanges an authorization code for a token pair.
///
/// Authorization-code grant with HTTP Basic client authentication, as the
/// accounts service requires for confidential clients. The code is
/// single-use and short-lived, so the exchange happens immediately after
/// the callback delivers it. Any failure maps to [`Error::AuthExchange`].
pub async fn exchange_authorization_code(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
) -> Res<TokenGrantResponse> {
    let res = http
        .post(token_url)
        .header("Authorization", basic_auth_header(client_id, client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &config::redirect_uri()),
        ])
        .send()
        .await
        .map_err(|e| Error::AuthExchange(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(Error::AuthExchange(format!("{}: {}", status, body.trim())));
    }

    res.json::<TokenGrantResponse>()
        .await
        .map_err(|e| Error::AuthExchange(e.to_string()))
}

/// Exchanges a refresh token for a new access token.
///
/// The response usually omits the refresh token; the caller carries the
/// stored one over in that case. Any failure maps to [`Error::Refresh`].
pub async fn exchange_refresh_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Res<TokenGrantResponse> {
    let res = http
        .post(token_url)
        .header("Authorization", basic_auth_header(client_id, client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(|e| Error::Refresh(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(Error::Refresh(format!("{}: {}", status, body.trim())));
    }

    res.json::<TokenGrantResponse>()
        .await
        .map_err(|e| Error::Refresh(e.to_string()))
}

fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}
