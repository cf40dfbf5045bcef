use atm_core::application::service::{AccountService, ServiceLimits};
use atm_core::application::session::AtmSession;
use atm_core::config::AtmConfig;
use atm_core::interfaces::csv::account_writer::AccountWriter;
use atm_core::interfaces::csv::operation_reader::OperationReader;
use atm_core::interfaces::fixture::BankFixture;
use atm_core::interfaces::json;
use atm_core::logging::init_logging;
use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operations CSV file to replay against the ATM
    input: PathBuf,

    /// YAML file with the accounts and cards to preload
    #[arg(long)]
    bank: PathBuf,

    /// YAML configuration file (limits, commission, log level)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print this account's ledger instead of the account summary
    #[arg(long)]
    statement: Option<String>,

    /// Emit JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AtmConfig::from_file(path).into_diagnostic()?,
        None => AtmConfig::default(),
    };
    init_logging(&config.log_level);

    let service = AccountService::new(ServiceLimits::from(&config));
    let mut atm = AtmSession::new(service);

    let accounts = BankFixture::from_file(&cli.bank)
        .and_then(|fixture| fixture.into_accounts(config.daily_limit))
        .into_diagnostic()?;
    for account in accounts {
        atm.register(account);
    }

    // Replay operations
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => match atm.process(op) {
                Ok(message) => info!("{message}"),
                Err(e) => eprintln!("Error processing operation: {}", e),
            },
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final state
    let stdout = io::stdout();
    match cli.statement {
        Some(number) => {
            let account = atm
                .account(&number)
                .ok_or_else(|| miette!("unknown account {number}"))?;
            if cli.json {
                json::write_statement(stdout.lock(), account).into_diagnostic()?;
            } else {
                AccountWriter::new(stdout.lock())
                    .write_statement(account)
                    .into_diagnostic()?;
            }
        }
        None => {
            if cli.json {
                json::write_accounts(stdout.lock(), atm.accounts()).into_diagnostic()?;
            } else {
                AccountWriter::new(stdout.lock())
                    .write_accounts(atm.accounts())
                    .into_diagnostic()?;
            }
        }
    }

    Ok(())
}
