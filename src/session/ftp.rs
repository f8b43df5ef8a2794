//! FTP branch of the session engine. Grounded in
//! `examples/original_source/server/object_storage/src/ftp_command_handlers.cpp`.

use bytes::Bytes;
use tracing::warn;

use crate::codec::ftp_command::{self, FtpCommand, FtpRequest};
use crate::codec::ftp_reply;
use crate::error::SessionError;
use crate::object_store::StoreStatus;

use super::data;
use super::Session;

fn requires_login(command: FtpCommand) -> bool {
    matches!(
        command,
        FtpCommand::Pasv
            | FtpCommand::List
            | FtpCommand::Retr
            | FtpCommand::Stor
            | FtpCommand::Dele
            | FtpCommand::Type
            | FtpCommand::Cwd
    )
}

impl Session {
    pub(super) async fn handle_ftp(&mut self, line: &str) -> Result<(), SessionError> {
        self.metrics.add_ftp_command();

        let req = ftp_command::parse(line);
        if !req.valid {
            self.write_raw(ftp_reply::serialize(500, "Syntax error, command unrecognized")).await?;
            return Ok(());
        }

        if requires_login(req.command) && self.logged_in_user.is_none() {
            self.write_raw(ftp_reply::serialize(530, "Not logged in")).await?;
            self.last_ftp_command = Some(req.command);
            return Ok(());
        }

        match req.command {
            FtpCommand::User => self.ftp_user(&req).await?,
            FtpCommand::Pass => self.ftp_pass(&req).await?,
            FtpCommand::Quit => self.ftp_quit().await?,
            FtpCommand::Type => {
                self.write_raw(ftp_reply::serialize(200, "Mode switched")).await?;
                self.last_ftp_command = Some(FtpCommand::Type);
            }
            FtpCommand::Cwd => self.ftp_cwd(&req).await?,
            FtpCommand::List => self.ftp_list().await?,
            FtpCommand::Retr => self.ftp_retr(&req).await?,
            FtpCommand::Stor => self.ftp_stor(&req).await?,
            FtpCommand::Dele => self.ftp_dele(&req).await?,
            FtpCommand::Pasv => self.ftp_pasv().await?,
            FtpCommand::Unrecognized => unreachable!("filtered by req.valid above"),
        }
        Ok(())
    }

    async fn ftp_user(&mut self, req: &FtpRequest) -> Result<(), SessionError> {
        self.logged_in_user = None;
        self.last_username = Some(req.arg().unwrap_or_default().to_string());
        self.write_raw(ftp_reply::serialize(331, "Please provide password")).await?;
        self.last_ftp_command = Some(FtpCommand::User);
        Ok(())
    }

    async fn ftp_pass(&mut self, req: &FtpRequest) -> Result<(), SessionError> {
        if self.last_ftp_command != Some(FtpCommand::User) {
            self.write_raw(ftp_reply::serialize(503, "Please specify username first")).await?;
            self.last_ftp_command = Some(FtpCommand::Pass);
            return Ok(());
        }
        let username = self.last_username.clone().unwrap_or_default();
        let password = req.arg().unwrap_or_default();
        if self.users.verify(&username, password).await {
            self.logged_in_user = Some(username);
            self.write_raw(ftp_reply::serialize(230, "Login successful")).await?;
        } else {
            self.write_raw(ftp_reply::serialize(530, "Failed to log in")).await?;
        }
        self.last_ftp_command = Some(FtpCommand::Pass);
        Ok(())
    }

    async fn ftp_quit(&mut self) -> Result<(), SessionError> {
        self.logged_in_user = None;
        self.cwd = "/".to_string();
        self.last_username = None;
        self.write_raw(ftp_reply::serialize(221, "Connection closed")).await?;
        self.last_ftp_command = None;
        Ok(())
    }

    async fn ftp_cwd(&mut self, req: &FtpRequest) -> Result<(), SessionError> {
        self.cwd.push_str(req.arg().unwrap_or_default());
        self.cwd.push('/');
        self.write_raw(ftp_reply::serialize(250, "Working directory changed")).await?;
        self.last_ftp_command = Some(FtpCommand::Cwd);
        Ok(())
    }

    async fn ftp_list(&mut self) -> Result<(), SessionError> {
        if self.data_listener.is_none() {
            self.write_raw(ftp_reply::serialize(425, "Error opening data connection")).await?;
            self.last_ftp_command = Some(FtpCommand::List);
            return Ok(());
        }
        self.write_raw(ftp_reply::serialize(150, "Listing all objects stored")).await?;
        let paths = self.store.list().await;
        let payload = Bytes::from(paths.join("\n"));
        let listener = self.data_listener.take().unwrap();
        tokio::spawn(data::send_data(listener, payload, self.reply_tx.clone()));
        self.last_ftp_command = Some(FtpCommand::List);
        Ok(())
    }

    async fn ftp_retr(&mut self, req: &FtpRequest) -> Result<(), SessionError> {
        if self.data_listener.is_none() {
            self.write_raw(ftp_reply::serialize(425, "Error opening data connection")).await?;
            self.last_ftp_command = Some(FtpCommand::Retr);
            return Ok(());
        }
        let path = format!("{}{}", self.cwd, req.arg().unwrap_or_default());
        let (status, bytes) = self.store.get(&path).await;
        match status {
            StoreStatus::Success => {
                self.write_raw(ftp_reply::serialize(150, "Sending file")).await?;
                let listener = self.data_listener.take().unwrap();
                tokio::spawn(data::send_data(listener, bytes.unwrap(), self.reply_tx.clone()));
            }
            _ => {
                self.write_raw(ftp_reply::serialize(550, "File not found")).await?;
            }
        }
        self.last_ftp_command = Some(FtpCommand::Retr);
        Ok(())
    }

    async fn ftp_stor(&mut self, req: &FtpRequest) -> Result<(), SessionError> {
        if self.data_listener.is_none() {
            self.write_raw(ftp_reply::serialize(425, "Error opening data connection")).await?;
            self.last_ftp_command = Some(FtpCommand::Stor);
            return Ok(());
        }
        if req.tokens.len() != 2 {
            self.write_raw(ftp_reply::serialize(500, "Syntax error, command unrecognized")).await?;
            self.last_ftp_command = Some(FtpCommand::Stor);
            return Ok(());
        }
        let path = format!("{}{}", self.cwd, req.tokens[1]);
        self.write_raw(ftp_reply::serialize(150, "Ready to receive")).await?;
        let listener = self.data_listener.take().unwrap();
        tokio::spawn(data::receive_data(listener, self.store.clone(), path, self.reply_tx.clone()));
        self.last_ftp_command = Some(FtpCommand::Stor);
        Ok(())
    }

    async fn ftp_dele(&mut self, req: &FtpRequest) -> Result<(), SessionError> {
        let path = req.arg().unwrap_or_default();
        let status = self.store.remove(path).await;
        match status {
            StoreStatus::Success => self.write_raw(ftp_reply::serialize(250, "File deleted")).await?,
            _ => self.write_raw(ftp_reply::serialize(550, "Unable to delete file")).await?,
        }
        self.last_ftp_command = Some(FtpCommand::Dele);
        Ok(())
    }

    async fn ftp_pasv(&mut self) -> Result<(), SessionError> {
        self.data_listener = None;
        match self.bind_data_listener().await {
            Ok(listener) => {
                let port = listener.local_addr().map(|a| a.port()).unwrap_or(0);
                let ip = match self.local_addr.ip() {
                    std::net::IpAddr::V4(v4) => v4,
                    std::net::IpAddr::V6(_) => std::net::Ipv4Addr::LOCALHOST,
                };
                self.data_listener = Some(listener);
                let octets = ip.octets();
                let message = format!(
                    "Entering passive mode ({},{},{},{},{},{})",
                    octets[0],
                    octets[1],
                    octets[2],
                    octets[3],
                    port >> 8,
                    port & 0xff
                );
                self.write_raw(ftp_reply::serialize(227, &message)).await?;
            }
            Err(e) => {
                warn!(peer = %self.peer_addr, error = %e, "failed to bind passive data listener");
                self.write_raw(ftp_reply::serialize(550, "Passive mode not supported")).await?;
            }
        }
        self.last_ftp_command = Some(FtpCommand::Pasv);
        Ok(())
    }
}
