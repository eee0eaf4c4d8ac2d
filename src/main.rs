use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn, LevelFilter};
use serde_json::json;
use std::path::PathBuf;

use overlay_ipam::config_loader;
use overlay_ipam::ip::find_first_free_id;
use overlay_ipam::IpamError;

/// Deterministic address assignment for overlay network peers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file (built-in pools are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print both overlay networks and their gateways
    Gateways,
    /// Print the addresses of the peer with the given id
    Allocate {
        /// Peer id
        #[arg(long)]
        id: u32,
    },
    /// Print the smallest peer id not in the given list
    NextId {
        /// Ids already assigned to existing peers
        ids: Vec<u32>,
    },
    /// Choose the next free id and print the addresses it maps to
    Plan {
        /// Ids already assigned to existing peers
        ids: Vec<u32>,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging before loading the configuration. Without RUST_LOG the
    // logger passes every record and the global max level does the filtering,
    // starting at "info" until the configured level is known.
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
    if !rust_log_set {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Starting overlay-ipam");
    if let Some(path) = &args.config {
        info!("Configuration file: {:?}", path);
    }

    let config = config_loader::load_or_default(args.config.as_deref())?;

    // RUST_LOG wins over the configured level
    if !rust_log_set {
        log::set_max_level(config.log_level_filter());
    }

    let network = config_loader::init_network_config(&config)?;
    let families = config.address_families();

    let output = match args.command {
        Command::Gateways => json!({
            "ipv4": {
                "network": network.network_v4().to_string(),
                "gateway": network.gateway_v4().to_string(),
            },
            "ipv6": {
                "network": network.network_v6().to_string(),
                "gateway": network.gateway_v6().to_string(),
            },
        }),
        Command::Allocate { id } => {
            let address = network
                .allocate(id)
                .wrap_err_with(|| format!("Failed to generate addresses for peer id {}", id))?;
            json!({
                "id": id,
                "ipv4": address.ipv4,
                "ipv6": address.ipv6,
                "allowed_ips": address.allowed_ips(families),
            })
        }
        Command::NextId { ids } => json!({ "id": find_first_free_id(&ids) }),
        Command::Plan { ids } => match network.plan_next_peer(&ids) {
            Ok(plan) => {
                info!("Next peer id {} maps to {} and {}", plan.id, plan.address.ipv4, plan.address.ipv6);
                json!({
                    "id": plan.id,
                    "ipv4": plan.address.ipv4,
                    "ipv6": plan.address.ipv6,
                    "allowed_ips": plan.address.allowed_ips(families),
                })
            }
            Err(err @ IpamError::AddressPoolExhausted { .. }) => {
                warn!("No addresses available: {}", err);
                return Err(err).wrap_err("No addresses available for a new peer");
            }
            Err(err) => return Err(err.into()),
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["overlay-ipam", "--config", "ipam.yaml", "allocate", "--id", "100"]);

        assert_eq!(args.config, Some(PathBuf::from("ipam.yaml")));
        assert!(matches!(args.command, Command::Allocate { id: 100 }));
    }

    #[test]
    fn test_id_list_args() {
        let args = Args::parse_from(["overlay-ipam", "next-id", "2", "3", "5"]);

        assert_eq!(args.config, None);
        match args.command {
            Command::NextId { ids } => assert_eq!(ids, vec![2, 3, 5]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_plan_without_ids() {
        let args = Args::parse_from(["overlay-ipam", "plan"]);
        assert!(matches!(args.command, Command::Plan { ref ids } if ids.is_empty()));
    }
}
