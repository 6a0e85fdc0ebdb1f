use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{management::TokenManager, types::PendingAuthorization, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(pending): Extension<Arc<Mutex<PendingAuthorization>>>,
    Extension(manager): Extension<Arc<TokenManager>>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        warning!("Authorization denied: {}", error);
        return Html("<h4>Authorization failed.</h4><p>You can close this window.</p>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>No authorization code received.</h4><p>Please try again.</p>");
    };

    let mut state = pending.lock().await;
    if params.get("state").map(String::as_str) != Some(state.state_nonce.as_str()) {
        warning!("Callback state mismatch; rejecting authorization response.");
        return Html("<h4>State mismatch.</h4><p>Please restart the authorization flow.</p>");
    }

    match manager.complete_authorization(code).await {
        Ok(record) => {
            state.record = Some(record);
            Html("<h2>Authentication successful.</h2><p>You can close this window and return to your terminal.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4><p>You can close this window.</p>")
        }
    }
}
