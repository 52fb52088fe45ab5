//! Session cookie handling for the browser admin area.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use crate::config::CookieConfig;

/// Builds and reads the httpOnly admin session cookie.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: CookieConfig,
    session_expiry_secs: i64,
}

impl CookieHelper {
    pub fn new(config: CookieConfig, session_expiry_secs: i64) -> Self {
        Self {
            config,
            session_expiry_secs,
        }
    }

    /// Set-Cookie value carrying the session token.
    pub fn build_session_cookie(&self, token: &str) -> String {
        let head = format!(
            "{}={}; Path={}; Max-Age={}",
            self.config.session_name, token, self.config.session_path, self.session_expiry_secs
        );
        self.with_attributes(head)
    }

    /// Set-Cookie value that removes the session cookie.
    pub fn build_clear_session_cookie(&self) -> String {
        let head = format!(
            "{}=; Path={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.config.session_name, self.config.session_path
        );
        self.with_attributes(head)
    }

    pub fn add_session_cookie(&self, headers: &mut HeaderMap, token: &str) {
        if !self.config.enabled {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&self.build_session_cookie(token)) {
            headers.append(SET_COOKIE, value);
        }
    }

    pub fn add_clear_cookie(&self, headers: &mut HeaderMap) {
        if !self.config.enabled {
            return;
        }
        if let Ok(value) = HeaderValue::from_str(&self.build_clear_session_cookie()) {
            headers.append(SET_COOKIE, value);
        }
    }

    /// Value of cookie `name`, looking through every `Cookie` header.
    pub fn extract_cookie<'a>(&self, headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .map(str::trim)
            .find_map(|cookie| {
                let (cookie_name, value) = cookie.split_once('=')?;
                (cookie_name == name).then_some(value)
            })
    }

    pub fn extract_session_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        if !self.config.enabled {
            return None;
        }
        self.extract_cookie(headers, &self.config.session_name)
    }

    fn with_attributes(&self, mut cookie: String) -> String {
        cookie.push_str("; HttpOnly");
        if self.config.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.config.same_site));
        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CookieHelper {
        CookieHelper::new(CookieConfig::default(), 3600)
    }

    #[test]
    fn test_build_session_cookie() {
        let cookie = helper().build_session_cookie("tok");

        assert!(cookie.starts_with("wr_session=tok; Path=/; Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(!cookie.contains("Domain="));
    }

    #[test]
    fn test_build_clear_cookie() {
        let cookie = helper().build_clear_session_cookie();
        assert!(cookie.starts_with("wr_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_extract_session_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; wr_session=abc.def.ghi; other=1"),
        );
        assert_eq!(helper().extract_session_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_missing_cookie() {
        assert_eq!(helper().extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_domain_and_insecure() {
        let config = CookieConfig {
            secure: false,
            domain: "wedding.example.com".to_string(),
            ..CookieConfig::default()
        };
        let cookie = CookieHelper::new(config, 60).build_session_cookie("tok");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("Domain=wedding.example.com"));
    }

    #[test]
    fn test_disabled_helper_writes_and_reads_nothing() {
        let config = CookieConfig {
            enabled: false,
            ..CookieConfig::default()
        };
        let helper = CookieHelper::new(config, 60);

        let mut headers = HeaderMap::new();
        helper.add_session_cookie(&mut headers, "tok");
        assert!(headers.get(SET_COOKIE).is_none());

        headers.insert(COOKIE, HeaderValue::from_static("wr_session=tok"));
        assert!(helper.extract_session_token(&headers).is_none());
    }
}
