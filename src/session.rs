//! Explicit auth context. The UI (or the environment, for development)
//! hands the backend address and bearer token to `session.connect` once;
//! every later request reads them from daemon state instead of an
//! ambient storage lookup.

pub const ENV_API_URL: &str = "KURSD_API_URL";
pub const ENV_API_TOKEN: &str = "KURSD_API_TOKEN";

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("API adresi belirtilmedi ({ENV_API_URL})")]
    MissingBaseUrl,
    #[error("API erişim anahtarı belirtilmedi ({ENV_API_TOKEN})")]
    MissingToken,
}

#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    token: String,
}

impl Session {
    pub fn new(base_url: &str, token: &str) -> Result<Session, SessionError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SessionError::MissingBaseUrl);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::MissingToken);
        }
        Ok(Session {
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    /// Connect parameters win; the environment fills the gaps.
    pub fn from_parts(base_url: Option<&str>, token: Option<&str>) -> Result<Session, SessionError> {
        let env_url = std::env::var(ENV_API_URL).ok();
        let env_token = std::env::var(ENV_API_TOKEN).ok();
        let base_url = base_url
            .map(str::to_string)
            .or(env_url)
            .ok_or(SessionError::MissingBaseUrl)?;
        let token = token
            .map(str::to_string)
            .or(env_token)
            .ok_or(SessionError::MissingToken)?;
        Session::new(&base_url, &token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
