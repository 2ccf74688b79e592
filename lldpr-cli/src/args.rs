//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lldpr")]
#[command(version, about = "LLDP neighbor-discovery daemon", long_about = None)]
pub struct Cli {
    /// Network interfaces to run on (default: all up interfaces)
    #[arg(short = 'I', long = "interface", value_name = "NAME")]
    pub interfaces: Vec<String>,

    /// System name to advertise (default: hostname)
    #[arg(long, value_name = "NAME")]
    pub system_name: Option<String>,

    /// System description to advertise
    #[arg(long, value_name = "TEXT")]
    pub system_description: Option<String>,

    /// Seconds between periodic advertisements (msgTxInterval)
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    pub interval: u16,

    /// TTL multiplier (msgTxHold)
    #[arg(long, value_name = "N", default_value = "4")]
    pub hold: u16,

    /// Receive only, never transmit
    #[arg(long, conflicts_with = "tx_only")]
    pub rx_only: bool,

    /// Transmit only, never receive
    #[arg(long, conflicts_with = "rx_only")]
    pub tx_only: bool,

    /// LLDP-MED ELIN location to advertise (emergency number, ASCII digits)
    #[arg(long, value_name = "NUMBER")]
    pub med_elin: Option<String>,

    /// Seconds between neighbor table summaries (0 disables)
    #[arg(long, value_name = "SECONDS", default_value = "60")]
    pub show_every: u64,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available network interfaces
    Interfaces,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
