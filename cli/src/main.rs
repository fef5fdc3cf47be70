//! localswap CLI - LocalTerra swap-pair integration harness
//!
//! Deploys a CW20 token and a constant-product swap pair to a LocalTerra
//! node, funds test accounts, and runs end-to-end scenario checks against
//! the resulting on-chain state.

use clap::{Parser, Subcommand};
use colored::Colorize;
use cosmwasm_std::{Decimal, Uint128};
use std::path::PathBuf;

mod client;
mod config;
mod deploy;
mod msg;
mod pair;
mod token;

use config::NetworkConfig;

#[derive(Parser)]
#[command(name = "localswap")]
#[command(about = "LocalTerra swap pair harness - deploy and test a CW20/uusd pair", long_about = None)]
#[command(version)]
struct Cli {
    /// Network to connect to (localterra)
    #[arg(short, long, default_value = "localterra")]
    network: String,

    /// LCD URL (overrides network default)
    #[arg(short, long)]
    lcd_url: Option<String>,

    /// Path to a TOML config override file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output (raw transaction logs)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload and instantiate the contracts, fund the test users
    Deploy {
        /// Directory holding the contract wasm artifacts
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },

    /// CW20 token operations
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Swap pair operations
    Pair {
        #[command(subcommand)]
        command: PairCommands,
    },

    /// Run the end-to-end scenario suite
    Test {
        /// Run the liquidity provision scenario
        #[arg(long)]
        liquidity: bool,

        /// Run the swap scenario
        #[arg(long)]
        swap: bool,

        /// Run the slippage rejection scenario
        #[arg(long)]
        slippage: bool,

        /// Run all scenarios
        #[arg(long)]
        all: bool,

        /// Directory holding the contract wasm artifacts
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },

    /// Show a native token balance
    Balance {
        /// Account address
        account: String,

        /// Denomination
        #[arg(long, default_value = "uusd")]
        denom: String,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Mint tokens to an account (deployer key holds the minter role)
    Mint {
        /// Token contract address
        contract: String,

        /// Recipient address
        recipient: String,

        /// Amount in smallest units
        amount: u128,
    },

    /// Show a CW20 balance
    Balance {
        /// Token contract address
        contract: String,

        /// Account address
        account: String,
    },
}

#[derive(Subcommand)]
enum PairCommands {
    /// Provide token + native liquidity in one atomic transaction
    Provide {
        /// Pair contract address
        pair: String,

        /// Token contract address
        token: String,

        /// Token amount in smallest units
        #[arg(long)]
        token_amount: u128,

        /// Native (uusd) amount in smallest units
        #[arg(long)]
        native_amount: u128,

        /// Key name to send from
        #[arg(long, default_value = "test2")]
        from: String,
    },

    /// Sell tokens into the pair
    Swap {
        /// Pair contract address
        pair: String,

        /// Token contract address
        token: String,

        /// Offer amount in smallest units
        #[arg(long)]
        amount: u128,

        /// Maximum tolerated spread (e.g. 0.01)
        #[arg(long)]
        max_spread: Option<Decimal>,

        /// Key name to send from
        #[arg(long, default_value = "test3")]
        from: String,
    },

    /// Show the pool's reserves
    Status {
        /// Pair contract address
        pair: String,

        /// Token contract address
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = NetworkConfig::new(&cli.network, cli.lcd_url.clone(), cli.config.clone(), cli.verbose)?;

    if cli.verbose {
        println!("{} {}", "Network:".bright_cyan(), config.network);
        println!("{} {}", "LCD URL:".bright_cyan(), config.lcd_url);
        println!("{} {}", "Chain ID:".bright_cyan(), config.chain_id);
    }

    match cli.command {
        Commands::Deploy { artifacts } => {
            if let Some(dir) = artifacts {
                config.artifacts_dir = dir;
            }
            deploy::run_setup(&config).await?;
        }
        Commands::Token { command } => match command {
            TokenCommands::Mint {
                contract,
                recipient,
                amount,
            } => {
                token::mint(&config, &contract, &recipient, Uint128::new(amount)).await?;
            }
            TokenCommands::Balance { contract, account } => {
                token::show_balance(&config, &contract, &account).await?;
            }
        },
        Commands::Pair { command } => match command {
            PairCommands::Provide {
                pair,
                token,
                token_amount,
                native_amount,
                from,
            } => {
                let sender = config.account(&from)?.clone();
                pair::provide_liquidity(
                    &config,
                    &sender,
                    &pair,
                    &token,
                    Uint128::new(token_amount),
                    Uint128::new(native_amount),
                )
                .await?;
            }
            PairCommands::Swap {
                pair,
                token,
                amount,
                max_spread,
                from,
            } => {
                let sender = config.account(&from)?.clone();
                pair::swap(
                    &config,
                    &sender,
                    &pair,
                    &token,
                    Uint128::new(amount),
                    max_spread,
                )
                .await?;
            }
            PairCommands::Status { pair, token } => {
                pair::show_status(&config, &pair, &token).await?;
            }
        },
        Commands::Test {
            liquidity,
            swap,
            slippage,
            all,
            artifacts,
        } => {
            if let Some(dir) = artifacts {
                config.artifacts_dir = dir;
            }
            println!("{}", "Running test suite...".bright_green().bold());
            tests::run_swap_tests(&config, liquidity, swap, slippage, all).await?;
        }
        Commands::Balance { account, denom } => {
            let client = client::ChainClient::new(&config);
            let balance = client.query_native_balance(&account, &denom).await?;
            println!("{} {} {}", "Balance:".bright_cyan(), balance, denom);
        }
    }

    Ok(())
}
