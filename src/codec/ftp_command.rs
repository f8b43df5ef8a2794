//! FTP command parser. Grounded in
//! `examples/original_source/protocol/ftp/request/src/ftp_parser.cpp`,
//! generalized from its `{LIST, RETR, STOR, DELE}` table to the full verb
//! set this system's FTP subset needs.

use super::util::split;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpCommand {
    List,
    Retr,
    Stor,
    Dele,
    Pass,
    User,
    Pasv,
    Type,
    Quit,
    Cwd,
    Unrecognized,
}

#[derive(Debug, Clone)]
pub struct FtpRequest {
    pub valid: bool,
    pub command: FtpCommand,
    pub tokens: Vec<String>,
}

impl FtpRequest {
    /// The token after the command verb, if any.
    pub fn arg(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }
}

fn lookup(verb: &str) -> FtpCommand {
    match verb {
        "LIST" => FtpCommand::List,
        "RETR" => FtpCommand::Retr,
        "STOR" => FtpCommand::Stor,
        "DELE" => FtpCommand::Dele,
        "PASS" => FtpCommand::Pass,
        "USER" => FtpCommand::User,
        "PASV" => FtpCommand::Pasv,
        "TYPE" => FtpCommand::Type,
        "QUIT" => FtpCommand::Quit,
        "CWD" => FtpCommand::Cwd,
        _ => FtpCommand::Unrecognized,
    }
}

/// Parses one FTP command line. `line` may or may not carry a trailing
/// `\r\n`; both are stripped before tokenizing.
pub fn parse(line: &str) -> FtpRequest {
    let trimmed = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);
    if trimmed.is_empty() {
        return FtpRequest {
            valid: false,
            command: FtpCommand::Unrecognized,
            tokens: Vec::new(),
        };
    }
    let tokens: Vec<String> = split(trimmed, " ").into_iter().map(String::from).collect();
    let command = lookup(&tokens[0].to_ascii_uppercase());
    let valid = !matches!(command, FtpCommand::Unrecognized);
    FtpRequest {
        valid,
        command,
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_case_insensitively() {
        let req = parse("user anonymous\r\n");
        assert!(req.valid);
        assert_eq!(req.command, FtpCommand::User);
        assert_eq!(req.arg(), Some("anonymous"));
    }

    #[test]
    fn rejects_unknown_command() {
        let req = parse("FROB 1 2\r\n");
        assert!(!req.valid);
        assert_eq!(req.command, FtpCommand::Unrecognized);
    }

    #[test]
    fn rejects_empty_line() {
        let req = parse("\r\n");
        assert!(!req.valid);
    }

    #[test]
    fn stor_keeps_exact_token_count() {
        let req = parse("STOR /x\r\n");
        assert_eq!(req.tokens.len(), 2);
        assert_eq!(req.arg(), Some("/x"));
    }

    #[test]
    fn command_without_argument_has_single_token() {
        let req = parse("QUIT\r\n");
        assert!(req.valid);
        assert_eq!(req.command, FtpCommand::Quit);
        assert_eq!(req.arg(), None);
    }
}
