//! FTP reply serializer. Grounded in
//! `examples/original_source/server/object_storage/src/ftp_command_handlers.cpp`,
//! which always writes `"<code> <message>\r\n"`.

use bytes::Bytes;

/// Serializes a numeric reply code and message as `"<code> <message>\r\n"`.
/// An empty message still yields `"<code> \r\n"`.
pub fn serialize(code: u16, message: &str) -> Bytes {
    Bytes::from(format!("{} {}\r\n", code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_code_and_message() {
        assert_eq!(
            serialize(220, "Welcome"),
            Bytes::from_static(b"220 Welcome\r\n")
        );
    }

    #[test]
    fn empty_message_still_has_trailing_space() {
        assert_eq!(serialize(226, ""), Bytes::from_static(b"226 \r\n"));
    }
}
