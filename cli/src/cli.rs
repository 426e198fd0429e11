use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "safe-nest")]
#[command(about = "Discover nested Safe chains and compute signing hashes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover the nested Safe chain from a root contract and compute
    /// per-Safe signing hashes
    Discover(DiscoverArgs),

    /// Display Safe state (nonce, threshold, owners)
    Info(InfoArgs),
}

#[derive(Parser, Clone)]
pub struct DiscoverArgs {
    /// Root administrative contract (e.g. a ProxyAdmin)
    #[arg(value_name = "ROOT")]
    pub root: String,

    /// RPC endpoint URL
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,

    /// Batch aggregator the Safe transaction delegatecalls into
    /// (defaults to the Multicall3 delegatecall aggregator)
    #[arg(long, default_value = "0xcA11bde05977b3631167028862bE2a173976CA11")]
    pub target: String,

    /// Hex calldata of the batched call
    #[arg(long, default_value = "0x")]
    pub data: String,

    /// Chain id (read from the RPC endpoint if not set)
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// Nonce override (format: "0xADDR=NONCE", repeatable)
    #[arg(long = "nonce", value_name = "OVERRIDE")]
    pub nonce_overrides: Vec<String>,
}

#[derive(Parser, Clone)]
pub struct InfoArgs {
    /// Safe contract address
    #[arg(value_name = "SAFE")]
    pub safe: String,

    /// RPC endpoint URL
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,
}
