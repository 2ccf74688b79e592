//! lldpr - LLDP neighbor-discovery daemon
//!
//! Discovers interfaces, opens raw link channels and drives the protocol
//! engine once per second until Ctrl-C, then drains the shutdown frames.

mod args;

use args::{Cli, Commands};
use lldpr_core::{AdminStatus, EngineConfig, Error, Interface, LinkIo, MedLocation, PortConfig, Result};
use lldpr_engine::{show, Engine};
use std::time::Duration;
use tracing::{info, warn, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Some(Commands::Interfaces) = cli.command {
        for iface in Interface::list_all() {
            println!("{}", iface);
        }
        return Ok(());
    }

    let config = EngineConfig {
        system_name: cli
            .system_name
            .clone()
            .unwrap_or_else(default_system_name),
        system_description: cli.system_description.clone().unwrap_or_else(|| {
            format!(
                "lldpr {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            )
        }),
        msg_tx_interval: cli.interval,
        msg_tx_hold: cli.hold,
        med_location: cli.med_elin.clone().map(MedLocation::Elin),
        ..EngineConfig::default()
    };

    let admin_status = if cli.rx_only {
        AdminStatus::RxOnly
    } else if cli.tx_only {
        AdminStatus::TxOnly
    } else {
        AdminStatus::RxTx
    };

    let interfaces = select_interfaces(&cli)?;
    let mut io = LinkIo::new();
    let mut engine = Engine::new(config);

    for iface in &interfaces {
        if let Err(e) = io.open(iface) {
            warn!(interface = %iface.name, error = %e, "skipping interface");
            continue;
        }
        let mut port = PortConfig::new(iface.name.as_str(), iface.mac_address);
        port.ipv4 = iface.ipv4;
        port.ifindex = iface.index;
        port.admin_status = admin_status;
        engine.add_port(port);
    }

    if engine.ports().is_empty() {
        return Err(Error::interface("no usable interfaces"));
    }

    info!(
        ports = engine.ports().len(),
        interval = cli.interval,
        "lldpr running, Ctrl-C to stop"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut seconds = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.tick(&mut io);
                seconds += 1;
                if cli.show_every > 0 && seconds % cli.show_every == 0 {
                    info!("neighbor table:\n{}", show::format_neighbors(&engine));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    engine.shutdown(&mut io);
    print!("{}", show::format_neighbors(&engine));
    Ok(())
}

/// Interfaces from `-I` flags, or every up non-loopback interface
fn select_interfaces(cli: &Cli) -> Result<Vec<Interface>> {
    if !cli.interfaces.is_empty() {
        return cli
            .interfaces
            .iter()
            .map(|name| Interface::by_name(name))
            .collect();
    }

    let all: Vec<Interface> = Interface::list_all()
        .into_iter()
        .filter(|i| i.is_up && i.name != "lo" && i.mac_address != lldpr_core::MacAddr::zero())
        .collect();
    if all.is_empty() {
        return Err(Error::interface("no up interfaces found"));
    }
    Ok(all)
}

fn default_system_name() -> String {
    std::fs::read_to_string("/etc/hostname")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
