//! Command line surface of the `pve-cluster` binary.

pub mod output;
pub mod prompt;

use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "pve-cluster")]
#[command(about = "Cluster-wide listings of a Proxmox VE cluster", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Proxmox host to connect to
    #[arg(short = 'H', long)]
    pub host: String,

    /// Username to authenticate with, optionally as user@realm
    #[arg(short, long)]
    pub username: String,

    /// Password; leave out to be prompted
    #[arg(short, long, default_value = "")]
    pub password: String,

    /// Authentication realm, unless given in the username
    #[arg(long, default_value = "pam")]
    pub realm: String,

    #[arg(long, default_value_t = pve_cluster::DEFAULT_PORT)]
    pub port: u16,

    /// Verify the server's TLS certificate
    #[arg(long)]
    pub verify_ssl: bool,

    /// Query nodes concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Show raw output instead of formatted output; wins over --show-json
    #[arg(short = 'r', long)]
    pub show_raw: bool,

    /// Show output as JSON instead of formatted output
    #[arg(short = 'j', long)]
    pub show_json: bool,

    /// List all virtual machines and their disks
    #[arg(short = 'v', long)]
    pub list_vms: bool,

    /// List all nodes
    #[arg(short = 'n', long)]
    pub list_nodes: bool,

    /// List all storage
    #[arg(short = 's', long)]
    pub list_storages: bool,

    /// List HA groups
    #[arg(short = 'g', long)]
    pub list_ha_groups: bool,
}

impl Cli {
    /// Username and realm, taking the realm from `user@realm` when present.
    pub fn user_and_realm(&self) -> (&str, &str) {
        match self.username.split_once('@') {
            Some((user, realm)) => (user, realm),
            None => (&self.username, &self.realm),
        }
    }

    pub fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    pub fn output_mode(&self) -> output::OutputMode {
        if self.show_raw {
            output::OutputMode::Raw
        } else if self.show_json {
            output::OutputMode::Json
        } else {
            output::OutputMode::Text
        }
    }
}
