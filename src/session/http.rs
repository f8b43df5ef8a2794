//! HTTP branch of the session engine. Grounded in
//! `examples/original_source/server/object_storage/src/session.cpp`'s
//! `handleHttpRequest`/`handleHttpGet`/`handleHttpPut`/`handleHttpDelete`.

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::codec::http_request::{HttpMethod, HttpRequest};
use crate::codec::http_response::{HttpResponse, HttpStatus};
use crate::error::SessionError;
use crate::object_store::StoreStatus;

use super::{read_line, Session};

impl Session {
    pub(super) async fn handle_http(&mut self, first_line: String) -> Result<(), SessionError> {
        self.metrics.add_http_request();

        let mut head = first_line;
        loop {
            match read_line(&mut self.reader).await? {
                Some(line) => {
                    let blank = line == "\r\n" || line == "\n";
                    head.push_str(&line);
                    if blank {
                        break;
                    }
                }
                None => return Ok(()),
            }
        }

        let req = HttpRequest::parse(&head);
        if !req.valid {
            self.write_raw(HttpResponse::status(HttpStatus::BadRequest).serialize()).await?;
            return Ok(());
        }

        if self.authenticate {
            let authenticated = match req.auth_info() {
                Some(info) => self.users.verify(&info.username, &info.password).await,
                None => false,
            };
            if !authenticated {
                let resp = HttpResponse::with_headers(
                    HttpStatus::Unauthorized,
                    vec![
                        ("WWW-Authenticate".to_string(), "Basic".to_string()),
                        ("Content-Length".to_string(), "0".to_string()),
                    ],
                );
                self.write_raw(resp.serialize()).await?;
                return Ok(());
            }
        }

        match req.method {
            HttpMethod::Get => self.http_get(&req).await?,
            HttpMethod::Put => self.http_put(&req).await?,
            HttpMethod::Delete => self.http_delete(&req).await?,
            HttpMethod::Unrecognized => {
                self.write_raw(HttpResponse::status(HttpStatus::BadRequest).serialize()).await?;
            }
        }
        Ok(())
    }

    async fn http_get(&mut self, req: &HttpRequest) -> Result<(), SessionError> {
        if req.uri == "/" {
            let paths = self.store.list().await;
            let body = Bytes::from(paths.join("\n"));
            self.write_raw(HttpResponse::with_body(HttpStatus::Ok, body).serialize()).await?;
            return Ok(());
        }
        let (status, bytes) = self.store.get(&req.uri).await;
        let resp = match status {
            StoreStatus::Success => HttpResponse::with_body(HttpStatus::Ok, bytes.unwrap()),
            StoreStatus::FileNotFound => HttpResponse::status(HttpStatus::NotFound),
            StoreStatus::AlreadyExists => HttpResponse::status(HttpStatus::InternalServerError),
        };
        self.write_raw(resp.serialize()).await
    }

    async fn http_put(&mut self, req: &HttpRequest) -> Result<(), SessionError> {
        if req
            .header("expect")
            .map(|v| v.eq_ignore_ascii_case("100-continue"))
            .unwrap_or(false)
        {
            self.write_raw(HttpResponse::status(HttpStatus::Continue).serialize()).await?;
        }

        let mut body = vec![0u8; req.resource_size()];
        if let Err(e) = self.reader.read_exact(&mut body).await {
            let error = SessionError::from_io(e);
            warn!(peer = %self.peer_addr, %error, "failed reading PUT body");
            return self.write_raw(HttpResponse::status(HttpStatus::BadRequest).serialize()).await;
        }

        let status = self.store.add(req.uri.clone(), Bytes::from(body)).await;
        let resp = match status {
            StoreStatus::Success => HttpResponse::status(HttpStatus::Created),
            // Intentional quirk carried from the original: an existing
            // path on PUT surfaces as 404, not 409.
            StoreStatus::AlreadyExists => HttpResponse::status(HttpStatus::NotFound),
            StoreStatus::FileNotFound => HttpResponse::status(HttpStatus::InternalServerError),
        };
        self.write_raw(resp.serialize()).await
    }

    async fn http_delete(&mut self, req: &HttpRequest) -> Result<(), SessionError> {
        let status = self.store.remove(&req.uri).await;
        let resp = match status {
            StoreStatus::Success => HttpResponse::status(HttpStatus::Ok),
            StoreStatus::FileNotFound => HttpResponse::status(HttpStatus::NotFound),
            StoreStatus::AlreadyExists => HttpResponse::status(HttpStatus::InternalServerError),
        };
        self.write_raw(resp.serialize()).await
    }
}
