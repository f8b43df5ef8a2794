//! C3: wire codecs for the HTTP and FTP subsets this server speaks.

pub mod ftp_command;
pub mod ftp_reply;
pub mod http_request;
pub mod http_response;
pub mod util;
