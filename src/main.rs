mod cli;

use std::env;
use std::io;
use std::process;

use clap::Parser;
use env_logger::Env;
use log::info;

use cli::{Cli, Task};
use reporter::command::Query;
use reporter::error::Error;
use reporter::keychain::Keychain;
use reporter::model::{Credentials, ReportRequest, ReportSubtype, ReportType};
use reporter::output;
use reporter::progress::SpinnerHelper;
use reporter::service::{ReportLoader, ReportService};
use reporter::token::generate_token;

#[tokio::main(flavor = "current_thread")]
async fn main() {
  env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

  if let Err(error) = run(Cli::parse()).await {
    match error {
      Error::ApiRejected(message) => eprintln!("{message}"),
      error => eprintln!("Error: {error}"),
    }
    process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<(), Error> {
  let task = cli.command.task(cli.account)?;
  let keychain = Keychain;
  let credentials = Credentials {
    user_id: cli.userid.clone(),
    secret: cli.command.secret(&keychain)?,
    account: cli.account,
    mode: cli.mode,
  };

  let service = ReportService::new(cli.config());
  let dir = env::current_dir()?;

  match task {
    Task::Query(query) => {
      let unzip = query.unzip() && !cli.no_unzip;
      let result = service.get_report(&credentials, &query, unzip).await?;
      output::emit(&result, &dir, &mut io::stdout())?;
    }
    Task::SalesReports { vendor, range } => {
      let reports = range.tokens().count();
      info!("Downloading {reports} {unit} sales reports", unit = range.unit);
      let spinner = SpinnerHelper::create(cli.mode, reports as u64)?;

      for date_token in range.tokens() {
        spinner.set_message(format!("Sales report {date_token}"));
        let query = Query::Report(ReportRequest {
          vendor,
          report_type: ReportType::Sales,
          report_subtype: ReportSubtype::Summary,
          date_type: range.unit,
          date_token: date_token.clone(),
        });

        let result = match service.get_report(&credentials, &query, !cli.no_unzip).await {
          Ok(result) => result,
          Err(error) => {
            spinner.abandon_with_message(format!("FAILURE – Sales report {date_token}"));
            return Err(error);
          }
        };
        spinner.suspend(|| output::emit(&result, &dir, &mut io::stdout()))?;
        spinner.inc(1);
      }

      spinner.finish_with_message(format!("SUCCESS – {reports} sales reports downloaded"));
    }
    Task::GenerateToken { update_keychain_item } => {
      generate_token(
        &service,
        &keychain,
        &credentials,
        update_keychain_item.as_deref(),
        !cli.no_unzip,
        &dir,
        &mut io::stdout(),
      )
      .await?;
    }
  }

  Ok(())
}
