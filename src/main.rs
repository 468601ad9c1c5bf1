use clap::{Args, Parser, Subcommand};
use gift_card::application::engine::GiftCardEngine;
use gift_card::config::Config;
use gift_card::domain::gift_card::{AccountId, GiftCardId};
use gift_card::domain::ports::{PageRequest, Role};
use gift_card::error::GiftCardError;
use gift_card::infrastructure::open_store;
use gift_card::interfaces::csv::command_reader::CommandReader;
use gift_card::interfaces::csv::gift_card_writer::GiftCardWriter;
use gift_card::logging::{LogFormat, init_logging};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "GIFT_CARD_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Default log level; `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute every command of a CSV file and print the affected cards
    Process {
        /// Input commands CSV file
        input: PathBuf,
    },
    /// Print a single gift card
    Show {
        id: u64,
    },
    /// List gift cards received by an account
    Received(ListArgs),
    /// List gift cards sent by an account
    Sent(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Authenticated account issuing the query
    #[arg(long)]
    account: u64,

    /// Only include cards with this status code (0 accepted, 1 rejected, 2 pending)
    #[arg(long, allow_negative_numbers = true)]
    status: Option<i64>,

    /// 1-based page number
    #[arg(long, allow_negative_numbers = true)]
    page: Option<i64>,

    #[arg(long)]
    page_size: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::default()
        .with_db_path(cli.db_path)
        .with_logging(cli.log_level, cli.log_format);
    init_logging(&config.log_level, config.log_format);

    match cli.command {
        Commands::Process { input } => {
            let engine = GiftCardEngine::new(open_store(&config)?);
            process(&engine, input).await
        }
        Commands::Show { id } => {
            let engine = GiftCardEngine::new(open_store(&config)?);
            let id = GiftCardId(id);
            let card = engine
                .find_gift_card(id)
                .await?
                .ok_or(GiftCardError::NotFound(id))?;

            let stdout = io::stdout();
            GiftCardWriter::new(stdout.lock()).write_cards([&card])?;
            Ok(())
        }
        Commands::Received(args) => list(config, args, Role::Receiver).await,
        Commands::Sent(args) => list(config, args, Role::Sender).await,
    }
}

async fn process(engine: &GiftCardEngine, input: PathBuf) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let reader = CommandReader::new(file);

    let stdout = io::stdout();
    let mut writer = GiftCardWriter::new(stdout.lock());
    for command in reader.commands() {
        match command {
            Ok(command) => {
                let account = command.account();
                match engine.execute(command).await {
                    Ok(card) => writer.write_card(&card)?,
                    Err(e) => {
                        eprintln!("Error processing command from account {}: {}", account, e)
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    Ok(())
}

async fn list(config: Config, args: ListArgs, role: Role) -> Result<()> {
    let config = config.with_page_size(args.page_size);
    let engine = GiftCardEngine::new(open_store(&config)?);
    let account = AccountId(args.account);
    let page = PageRequest::new(config.page_size, args.page);

    let result = match role {
        Role::Receiver => engine.list_received(account, args.status, page).await?,
        Role::Sender => engine.list_sent(account, args.status, page).await?,
    };

    let stdout = io::stdout();
    GiftCardWriter::new(stdout.lock()).write_cards(&result.cards)?;
    eprintln!("total: {}, page: {}", result.total, page.page_number);

    Ok(())
}
