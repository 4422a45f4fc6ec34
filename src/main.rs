use anyhow::Result;
use clap::Parser;
use pve_cluster::{FanOut, ProxmoxClient};
use std::io::IsTerminal;
use tracing::info;

mod cli;

use cli::{Cli, output};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let password = if cli.password.is_empty() && std::io::stdin().is_terminal() {
        match cli::prompt::read_password("Enter Password: ")? {
            Some(password) => password,
            None => return Ok(()),
        }
    } else {
        cli.password.clone()
    };

    tokio::select! {
        result = run(&cli, password) => result,
        _ = tokio::signal::ctrl_c() => Ok(()),
    }
}

async fn run(cli: &Cli, password: String) -> Result<()> {
    let (username, realm) = cli.user_and_realm();
    let fan_out = if cli.concurrent {
        FanOut::Concurrent
    } else {
        FanOut::Sequential
    };

    let client = ProxmoxClient::builder()
        .host(&cli.host)
        .port(cli.port)
        .credentials(username, password, realm)
        .secure(true)
        .accept_invalid_certs(!cli.verify_ssl)
        .fan_out(fan_out)
        .build()
        .await?;
    client.login().await?;
    info!(host = %cli.host, "Connected");

    let mode = cli.output_mode();
    if cli.list_vms {
        let vms = client.get_vms().await?;
        println!("{}", output::render(&vms, mode, output::vms_text)?);
    }
    if cli.list_nodes {
        let nodes = client.get_nodes().await?;
        println!("{}", output::render(&nodes, mode, output::nodes_text)?);
    }
    if cli.list_storages {
        let storages = client.get_storages().await?;
        println!("{}", output::render(&storages, mode, output::storages_text)?);
    }
    if cli.list_ha_groups {
        let groups = client.get_ha_groups().await?;
        println!("{}", output::render(&groups, mode, output::ha_groups_text)?);
    }
    Ok(())
}
