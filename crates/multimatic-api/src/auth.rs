// Account credentials and the two auth request bodies built from them.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

/// Login material for one multiMATIC account.
///
/// The password is only needed once: as soon as a token has been issued it
/// is dropped (and zeroized by `secrecy`), and every later authentication
/// uses the token instead.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: Option<SecretString>,
    smartphone_id: String,
    auth_token: Option<SecretString>,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: SecretString,
        smartphone_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: Some(password),
            smartphone_id: smartphone_id.into(),
            auth_token: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn smartphone_id(&self) -> &str {
        &self.smartphone_id
    }

    pub fn has_token(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Body for `token/new`. `None` once the password has been discarded.
    pub(crate) fn token_request_body(&self) -> Option<Value> {
        let password = self.password.as_ref()?;
        Some(json!({
            "smartphoneId": self.smartphone_id,
            "username": self.username,
            "password": password.expose_secret(),
        }))
    }

    /// Body for `authenticate`. `None` until a token has been stored.
    pub(crate) fn authenticate_body(&self) -> Option<Value> {
        let token = self.auth_token.as_ref()?;
        Some(json!({
            "smartphoneId": self.smartphone_id,
            "username": self.username,
            "authToken": token.expose_secret(),
        }))
    }

    /// Keep the issued token and forget the password for good.
    pub(crate) fn store_token(&mut self, token: SecretString) {
        self.auth_token = Some(token);
        self.password = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("user@example.com", SecretString::from("hunter2"), "phone-1")
    }

    #[test]
    fn token_request_carries_password() {
        let body = creds().token_request_body().unwrap();
        assert_eq!(body["password"], "hunter2");
        assert_eq!(body["username"], "user@example.com");
        assert_eq!(body["smartphoneId"], "phone-1");
        assert!(body.get("authToken").is_none());
    }

    #[test]
    fn no_authenticate_body_without_token() {
        assert!(creds().authenticate_body().is_none());
    }

    #[test]
    fn storing_token_discards_password() {
        let mut c = creds();
        c.store_token(SecretString::from("tok-42"));

        assert!(c.has_token());
        assert!(!c.has_password());
        assert!(c.token_request_body().is_none());

        let body = c.authenticate_body().unwrap();
        assert_eq!(body["authToken"], "tok-42");
        assert!(body.get("password").is_none());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut c = creds();
        c.store_token(SecretString::from("tok-42"));
        let printed = format!("{c:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("tok-42"));
    }
}
