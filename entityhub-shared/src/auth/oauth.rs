/// OAuth 2.0 provider client for federated sign-in
///
/// EntityHub supports two identity providers, Google and GitHub. The flow is
/// the plain authorization-code dance:
///
/// 1. Redirect the browser to the provider's authorization URL
/// 2. Provider calls back with a `code`
/// 3. POST to the token endpoint to exchange the code for an access token
/// 4. GET the userinfo endpoint to fetch the profile
///
/// The only contract the rest of the system depends on is the resulting
/// [`ProviderProfile`]: an email (mandatory — a provider that won't disclose
/// one fails the sign-in) and a display name with provider-specific
/// fallbacks. GitHub hides the profile email for many accounts, so the
/// client falls back to the `/user/emails` endpoint and picks the primary
/// address.

use serde_json::Value;

/// Error type for the federated sign-in flow
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Token endpoint rejected the code exchange
    #[error("Token exchange with {provider} failed: {message}")]
    Exchange { provider: String, message: String },

    /// Userinfo fetch failed
    #[error("Userinfo fetch from {provider} failed: {message}")]
    Userinfo { provider: String, message: String },

    /// Provider response was not the JSON shape we expect
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Provider did not supply a usable email address
    #[error("No email from {0}")]
    MissingEmail(String),
}

/// Supported identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    GitHub,
}

impl ProviderKind {
    /// Provider name as used in URLs and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::GitHub => "github",
        }
    }

    /// Parses a provider name from a URL path segment
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "google" => Some(ProviderKind::Google),
            "github" => Some(ProviderKind::GitHub),
            _ => None,
        }
    }

    fn authorize_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            ProviderKind::GitHub => "https://github.com/login/oauth/authorize",
        }
    }

    fn token_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Google => "https://oauth2.googleapis.com/token",
            ProviderKind::GitHub => "https://github.com/login/oauth/access_token",
        }
    }

    fn userinfo_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::Google => "https://openidconnect.googleapis.com/v1/userinfo",
            ProviderKind::GitHub => "https://api.github.com/user",
        }
    }

    fn scopes(&self) -> &'static str {
        match self {
            ProviderKind::Google => "openid email profile",
            ProviderKind::GitHub => "user:email",
        }
    }
}

/// The fields the Authenticator needs from a provider profile
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Verified email address reported by the provider
    pub email: String,

    /// Display name, with provider-specific fallbacks applied
    pub name: String,
}

/// A configured OAuth client for one provider
///
/// Built once at startup from environment credentials; a provider whose
/// credentials are absent never gets a client (its routes are not
/// registered).
#[derive(Debug, Clone)]
pub struct OAuthClient {
    kind: ProviderKind,
    client_id: String,
    client_secret: String,
    callback_url: String,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(
        kind: ProviderKind,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            kind,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            http,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Builds the authorization URL the browser is redirected to
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}&response_type=code",
            self.kind.authorize_endpoint(),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.callback_url),
            urlencoding::encode(self.kind.scopes()),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for the caller's profile
    ///
    /// Performs the token exchange and userinfo fetch described in the
    /// module docs.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingEmail`] when the provider will not
    /// disclose an email address; other variants cover transport and
    /// malformed-response failures.
    pub async fn fetch_profile(&self, code: &str) -> Result<ProviderProfile, ProviderError> {
        let provider = self.kind.as_str();

        // Step 1: exchange code for an access token. GitHub answers with
        // form-encoded data unless asked for JSON explicitly.
        let token_resp = self
            .http
            .post(self.kind.token_endpoint())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Exchange {
                provider: provider.to_string(),
                message: e.to_string(),
            })?;

        if !token_resp.status().is_success() {
            let status = token_resp.status();
            let body = token_resp.text().await.unwrap_or_default();
            return Err(ProviderError::Exchange {
                provider: provider.to_string(),
                message: format!("token endpoint returned {}: {}", status, body),
            });
        }

        let token_json: Value =
            token_resp
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    provider: provider.to_string(),
                    message: format!("token response parse failed: {}", e),
                })?;

        let access_token = token_json["access_token"].as_str().ok_or_else(|| {
            ProviderError::MalformedResponse {
                provider: provider.to_string(),
                message: "missing access_token in token response".to_string(),
            }
        })?;

        // Step 2: fetch the profile. GitHub's API rejects requests without a
        // User-Agent.
        let userinfo: Value = self
            .get_json(self.kind.userinfo_endpoint(), access_token)
            .await?;

        let (email, name) = extract_profile(self.kind, &userinfo);

        let email = match email {
            Some(email) => email,
            // GitHub profiles commonly keep the email private; the emails
            // endpoint still lists it for the `user:email` scope.
            None if self.kind == ProviderKind::GitHub => {
                let emails: Value = self
                    .get_json("https://api.github.com/user/emails", access_token)
                    .await?;
                primary_email(&emails)
                    .ok_or_else(|| ProviderError::MissingEmail(provider.to_string()))?
            }
            None => return Err(ProviderError::MissingEmail(provider.to_string())),
        };

        Ok(ProviderProfile { email, name })
    }

    async fn get_json(&self, url: &str, access_token: &str) -> Result<Value, ProviderError> {
        let provider = self.kind.as_str();

        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, "entityhub")
            .send()
            .await
            .map_err(|e| ProviderError::Userinfo {
                provider: provider.to_string(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Userinfo {
                provider: provider.to_string(),
                message: format!("{} returned {}: {}", url, status, body),
            });
        }

        resp.json()
            .await
            .map_err(|e| ProviderError::MalformedResponse {
                provider: provider.to_string(),
                message: format!("userinfo parse failed: {}", e),
            })
    }
}

/// Pulls email and display name out of a provider's userinfo payload
///
/// Field names differ per provider; the display name falls back to the
/// GitHub login, then to "No Name".
fn extract_profile(kind: ProviderKind, userinfo: &Value) -> (Option<String>, String) {
    let email = userinfo["email"].as_str().map(|s| s.to_string());

    let name = match kind {
        ProviderKind::Google => userinfo["name"].as_str(),
        ProviderKind::GitHub => userinfo["name"].as_str().or_else(|| userinfo["login"].as_str()),
    }
    .unwrap_or("No Name")
    .to_string();

    (email, name)
}

/// Picks the primary (or first) address from GitHub's `/user/emails` payload
fn primary_email(emails: &Value) -> Option<String> {
    let list = emails.as_array()?;

    list.iter()
        .find(|e| e["primary"].as_bool().unwrap_or(false))
        .or_else(|| list.first())
        .and_then(|e| e["email"].as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(kind: ProviderKind) -> OAuthClient {
        OAuthClient::new(
            kind,
            "client-id",
            "client-secret",
            "http://localhost:8080/auth/oauth/google/callback",
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(ProviderKind::parse("google"), Some(ProviderKind::Google));
        assert_eq!(ProviderKind::parse("github"), Some(ProviderKind::GitHub));
        assert_eq!(ProviderKind::parse("gitlab"), None);
        assert_eq!(ProviderKind::parse("Google"), None);
    }

    #[test]
    fn test_authorize_url_contains_parameters() {
        let url = client(ProviderKind::Google).authorize_url("nonce123");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=nonce123"));
        assert!(url.contains("scope=openid%20email%20profile"));
        // redirect_uri must be URL-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080"));
    }

    #[test]
    fn test_extract_profile_google() {
        let userinfo = json!({
            "sub": "1234567890",
            "email": "a@x.com",
            "name": "Ada Lovelace",
        });

        let (email, name) = extract_profile(ProviderKind::Google, &userinfo);
        assert_eq!(email.as_deref(), Some("a@x.com"));
        assert_eq!(name, "Ada Lovelace");
    }

    #[test]
    fn test_extract_profile_github_login_fallback() {
        let userinfo = json!({
            "login": "octocat",
            "name": null,
            "email": null,
        });

        let (email, name) = extract_profile(ProviderKind::GitHub, &userinfo);
        assert_eq!(email, None);
        assert_eq!(name, "octocat");
    }

    #[test]
    fn test_extract_profile_no_name_fallback() {
        let userinfo = json!({ "email": "b@x.com" });

        let (_, name) = extract_profile(ProviderKind::Google, &userinfo);
        assert_eq!(name, "No Name");
    }

    #[test]
    fn test_primary_email_prefers_primary() {
        let emails = json!([
            { "email": "old@x.com", "primary": false, "verified": true },
            { "email": "main@x.com", "primary": true, "verified": true },
        ]);

        assert_eq!(primary_email(&emails).as_deref(), Some("main@x.com"));
    }

    #[test]
    fn test_primary_email_falls_back_to_first() {
        let emails = json!([
            { "email": "only@x.com", "primary": false },
        ]);

        assert_eq!(primary_email(&emails).as_deref(), Some("only@x.com"));
    }

    #[test]
    fn test_primary_email_empty_list() {
        assert_eq!(primary_email(&json!([])), None);
        assert_eq!(primary_email(&json!({})), None);
    }
}
