use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::Error;
use crate::keychain::{access_token_from, CredentialStore};
use crate::model::{Credentials, Mode};
use crate::output;
use crate::service::ReportLoader;

/// Runs the two phase `generateToken` exchange and emits the answer. With
/// `update_keychain_item` the new access token is stored under that name.
///
/// Returns whether the keychain item was updated.
pub async fn generate_token(
    loader: &impl ReportLoader,
    store: &impl CredentialStore,
    credentials: &Credentials,
    update_keychain_item: Option<&str>,
    unzip: bool,
    dir: &Path,
    out: &mut impl Write,
) -> Result<bool, Error> {
    let pending = loader.begin_token_generation(credentials).await?;
    let result = loader
        .confirm_token_generation(credentials, &pending, unzip)
        .await?;
    output::emit(&result, dir, out)?;

    let Some(item) = update_keychain_item else {
        return Ok(false);
    };
    let content = String::from_utf8_lossy(&result.content);
    let Some(token) = access_token_from(&content) else {
        info!("No access token in the answer, keychain item {item} left as is");
        return Ok(false);
    };

    store.set_credential(item, token)?;
    if credentials.mode != Mode::RobotXml {
        writeln!(out, "Keychain has been updated.")?;
    }
    Ok(true)
}
