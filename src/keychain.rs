use crate::error::Error;

/// Named secrets kept outside the command line.
pub trait CredentialStore {
    fn get_credential(&self, name: &str) -> Result<String, Error>;

    fn set_credential(&self, name: &str, secret: &str) -> Result<(), Error>;
}

/// The user's default macOS Keychain. Items are generic passwords whose service is the
/// item name and whose account is empty.
pub struct Keychain;

#[cfg(target_os = "macos")]
const ERR_SEC_ITEM_NOT_FOUND: i32 = -25300;

#[cfg(target_os = "macos")]
impl CredentialStore for Keychain {
    fn get_credential(&self, name: &str) -> Result<String, Error> {
        use security_framework::passwords::get_generic_password;

        let secret = get_generic_password(name, "").map_err(|e| match e.code() {
            ERR_SEC_ITEM_NOT_FOUND => Error::CredentialNotFound(name.to_string()),
            _ => Error::Keychain(e.to_string()),
        })?;
        String::from_utf8(secret)
            .map_err(|_| Error::Keychain(format!("Item '{name}' does not hold UTF-8 text")))
    }

    fn set_credential(&self, name: &str, secret: &str) -> Result<(), Error> {
        use security_framework::passwords::set_generic_password;

        set_generic_password(name, "", secret.as_bytes()).map_err(|e| Error::Keychain(e.to_string()))
    }
}

#[cfg(not(target_os = "macos"))]
impl CredentialStore for Keychain {
    fn get_credential(&self, _name: &str) -> Result<String, Error> {
        Err(Error::Keychain("Keychain support is limited to macOS".to_string()))
    }

    fn set_credential(&self, _name: &str, _secret: &str) -> Result<(), Error> {
        Err(Error::Keychain("Keychain support is limited to macOS".to_string()))
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStore {
    items: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl CredentialStore for MemoryStore {
    fn get_credential(&self, name: &str) -> Result<String, Error> {
        self.items
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CredentialNotFound(name.to_string()))
    }

    fn set_credential(&self, name: &str, secret: &str) -> Result<(), Error> {
        self.items.borrow_mut().insert(name.to_string(), secret.to_string());
        Ok(())
    }
}

/// Extracts the token from a `generateToken` answer (`AccessToken:<token>` line).
pub fn access_token_from(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("AccessToken:"))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_is_read_from_its_line() {
        let content = "Your new access token has been generated.\nAccessToken:1a2b-3c4d\nExpiration Date:2024-07-01\n";
        assert_eq!(access_token_from(content), Some("1a2b-3c4d"));
    }

    #[test]
    fn no_access_token_line_gives_none() {
        assert_eq!(access_token_from("Expiration Date:2024-07-01"), None);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn keychain_is_unavailable_outside_macos() {
        let error = Keychain.get_credential("itc-token").unwrap_err();
        assert_eq!(error.to_string(), "Keychain access failed: Keychain support is limited to macOS");
    }
}
