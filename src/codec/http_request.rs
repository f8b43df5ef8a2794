//! HTTP/1.1 request-head parser. Grounded in
//! `examples/original_source/protocol/http/request/src/http_parser.cpp`.
//!
//! Parses only the request line and headers (the caller reads the body
//! separately, once it knows `Content-Length`).

use std::collections::HashMap;

use base64::Engine as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Delete,
    Unrecognized,
}

#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub valid: bool,
    pub method: HttpMethod,
    pub uri: String,
    content_length: usize,
    headers: HashMap<String, String>,
}

impl HttpRequest {
    fn invalid(method: HttpMethod) -> Self {
        Self {
            valid: false,
            method,
            uri: String::new(),
            content_length: 0,
            headers: HashMap::new(),
        }
    }

    /// Parses a full request head: the request line plus all header lines,
    /// joined by `"\r\n"` (the blank line terminating the head may or may
    /// not be included; headers after it, if any, are ignored).
    pub fn parse(head: &str) -> Self {
        if head.is_empty() {
            return Self::invalid(HttpMethod::Unrecognized);
        }
        let mut lines = head.split("\r\n");
        let request_line = match lines.next() {
            Some(l) if !l.is_empty() => l,
            _ => return Self::invalid(HttpMethod::Unrecognized),
        };
        let tokens: Vec<&str> = request_line.split(' ').collect();
        if tokens.len() != 3 {
            return Self::invalid(HttpMethod::Unrecognized);
        }
        let method = match tokens[0] {
            "GET" => HttpMethod::Get,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            _ => return Self::invalid(HttpMethod::Unrecognized),
        };
        let uri = tokens[1].to_string();

        let mut headers = HashMap::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim_start().to_string());
            }
        }
        let content_length = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        Self {
            valid: true,
            method,
            uri,
            content_length,
            headers,
        }
    }

    pub fn resource_size(&self) -> usize {
        self.content_length
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Decodes a `Authorization: Basic <base64>` header into username and
    /// password. Returns `None` on any malformed input rather than erroring.
    pub fn auth_info(&self) -> Option<AuthInfo> {
        let raw = self.header("authorization")?;
        let (_scheme, encoded) = raw.split_once(' ')?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .ok()?;
        let text = String::from_utf8(decoded).ok()?;
        let (username, password) = text.split_once(':')?;
        Some(AuthInfo {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_request_line() {
        let req = HttpRequest::parse("GET /a HTTP/1.1\r\n");
        assert!(req.valid);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.uri, "/a");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(!HttpRequest::parse("").valid);
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(!HttpRequest::parse("PATCH /a HTTP/1.1\r\n").valid);
    }

    #[test]
    fn rejects_malformed_request_line() {
        assert!(!HttpRequest::parse("GET /a\r\n").valid);
    }

    #[test]
    fn reads_content_length_header() {
        let req = HttpRequest::parse("PUT /a HTTP/1.1\r\nContent-Length: 42\r\n\r\n");
        assert_eq!(req.resource_size(), 42);
    }

    #[test]
    fn missing_content_length_is_zero() {
        let req = HttpRequest::parse("GET /a HTTP/1.1\r\n\r\n");
        assert_eq!(req.resource_size(), 0);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest::parse("GET /a HTTP/1.1\r\nExpect: 100-continue\r\n\r\n");
        assert_eq!(req.header("EXPECT"), Some("100-continue"));
    }

    #[test]
    fn decodes_basic_auth_header() {
        let req = HttpRequest::parse("GET /a HTTP/1.1\r\nAuthorization: Basic Tm9yZDpWUE4=\r\n\r\n");
        let info = req.auth_info().unwrap();
        assert_eq!(info.username, "Nord");
        assert_eq!(info.password, "VPN");
    }

    #[test]
    fn missing_auth_header_yields_none() {
        let req = HttpRequest::parse("GET /a HTTP/1.1\r\n\r\n");
        assert!(req.auth_info().is_none());
    }
}
