use urlencoding::encode;

use crate::model::{Credentials, JsonRequest, Secret};

/// Builds the `jsonRequest=<json>` form body for one reporter command.
///
/// Every value is percent-encoded on its own before it is put into the JSON document. The
/// account is left out entirely when it is missing or zero, the server rejects an empty one.
pub fn encode_request(credentials: &Credentials, version: &str, command: &str) -> String {
    let query_input = format!("[p=Reporter.properties, {command}]");
    let account = credentials
        .account
        .filter(|account| *account != 0)
        .map(|account| account.to_string());
    let (access_token, password) = match &credentials.secret {
        Secret::AccessToken(token) => (Some(encode(token)), None),
        Secret::Password(password) => (None, Some(encode(password))),
    };

    let user_id = encode(&credentials.user_id);
    let version = encode(version);
    let mode = encode(credentials.mode.as_str());
    let query_input = encode(&query_input);
    let account = account.as_deref().map(encode);

    let request = JsonRequest {
        userid: &user_id,
        version: &version,
        mode: &mode,
        query_input: &query_input,
        account: account.as_deref(),
        accesstoken: access_token.as_deref(),
        password: password.as_deref(),
    };

    // Serializing a struct of string fields cannot fail.
    let json = serde_json::to_string(&request).unwrap_or_default();
    format!("jsonRequest={json}")
}
