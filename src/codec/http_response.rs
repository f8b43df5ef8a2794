//! HTTP/1.1 response serializer. Grounded in
//! `examples/original_source/protocol/http/response/src/http_response.cpp`.

use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpStatus {
    Continue,
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
}

impl HttpStatus {
    pub fn code(self) -> u16 {
        match self {
            HttpStatus::Continue => 100,
            HttpStatus::Ok => 200,
            HttpStatus::Created => 201,
            HttpStatus::BadRequest => 400,
            HttpStatus::Unauthorized => 401,
            HttpStatus::NotFound => 404,
            HttpStatus::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            HttpStatus::Continue => "Continue",
            HttpStatus::Ok => "OK",
            HttpStatus::Created => "Created",
            HttpStatus::BadRequest => "Bad Request",
            HttpStatus::Unauthorized => "Unauthorized",
            HttpStatus::NotFound => "Not Found",
            HttpStatus::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: HttpStatus,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl HttpResponse {
    /// Status only: no body, `Content-Length: 0`.
    pub fn status(status: HttpStatus) -> Self {
        Self {
            status,
            headers: vec![("Content-Length".to_string(), "0".to_string())],
            body: Bytes::new(),
        }
    }

    /// Status with a body: `Content-Type: application/octet-stream` and a
    /// `Content-Length` matching the body.
    pub fn with_body(status: HttpStatus, body: Bytes) -> Self {
        let headers = vec![
            ("Content-Type".to_string(), "application/octet-stream".to_string()),
            ("Content-Length".to_string(), body.len().to_string()),
        ];
        Self {
            status,
            headers,
            body,
        }
    }

    /// Status with explicit headers and no body, no automatic
    /// `Content-Length` injected (the caller supplies it if needed).
    pub fn with_headers(status: HttpStatus, headers: Vec<(String, String)>) -> Self {
        Self {
            status,
            headers,
            body: Bytes::new(),
        }
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status.code(), self.status.reason());
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        let mut bytes = out.into_bytes();
        bytes.extend_from_slice(&self.body);
        Bytes::from(bytes)
    }
}
