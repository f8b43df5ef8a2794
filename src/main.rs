use clap::Parser;
use tracing::error;

use objectstored::session::PortRange;
use objectstored::{Config, Server};

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    let ftp_ports = match config.parsed_ftp_port_range() {
        Ok(range) => range,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.threads.max(1))
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build async runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let server = Server::new(config.address.clone(), config.port, config.authenticate(), ftp_ports);
        server.add_user("Nord", "VPN").await;

        if let Err(e) = server.run().await {
            error!(error = %e, "server exited with error");
            return std::process::ExitCode::FAILURE;
        }
        std::process::ExitCode::SUCCESS
    })
}
