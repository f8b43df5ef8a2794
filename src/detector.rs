//! C4: per-connection protocol detection. Grounded in
//! `examples/original_source/protocol/detector/src/protocol_detector.cpp`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Ftp,
}

/// Classifies the first line of a connection. Anything that doesn't contain
/// `"HTTP"` before the line ending is treated as FTP — this implementation
/// classifies every non-HTTP packet as FTP, matching the original detector.
pub fn detect_protocol(first_line: &str) -> Protocol {
    let head = first_line
        .split("\r\n")
        .next()
        .unwrap_or(first_line);
    if head.contains("HTTP") {
        Protocol::Http
    } else {
        Protocol::Ftp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_http_request_line() {
        assert_eq!(
            detect_protocol("GET / HTTP/1.1\r\n"),
            Protocol::Http
        );
    }

    #[test]
    fn detects_ftp_command() {
        assert_eq!(detect_protocol("USER anonymous\r\n"), Protocol::Ftp);
    }

    #[test]
    fn anything_without_http_token_is_ftp() {
        assert_eq!(detect_protocol("LIST\r\n"), Protocol::Ftp);
        assert_eq!(detect_protocol("\r\n"), Protocol::Ftp);
    }

    #[test]
    fn http_token_anywhere_before_crlf_counts() {
        assert_eq!(detect_protocol("weirdHTTPline\r\n"), Protocol::Http);
    }
}
