use clap::{Args, Parser, Subcommand};

use reporter::calendar::{CalendarUnit, DateRange};
use reporter::command::Query;
use reporter::config::{Config, FINANCE_ENDPOINT, PROTOCOL_VERSION, SALES_ENDPOINT};
use reporter::error::Error;
use reporter::keychain::CredentialStore;
use reporter::model::{Mode, ReportRequest, ReportSubtype, ReportType, Secret, Service};
use reporter::validate;

/// Reporting tool for querying Sales- and Financial Reports from iTunes Connect.
#[derive(Parser)]
#[clap(
  name = "reporter",
  after_help = "For a detailed description of report types, see http://help.apple.com/itc/appssalesandtrends/#/itc37a18bcbf"
)]
pub(crate) struct Cli {
  /// Account number. Needed if your Apple ID has access to multiple accounts; for a list of
  /// your account numbers, use the `getAccounts` command.
  #[clap(long, short)]
  pub(crate) account: Option<u64>,
  /// Output format: plain text (`Normal`) or XML (`Robot.XML`).
  #[clap(long, short, default_value = "Normal")]
  pub(crate) mode: Mode,
  /// Apple ID for use with iTunes Connect.
  #[clap(long, short)]
  pub(crate) userid: String,
  /// Keep gzip compressed reports as they were downloaded.
  #[clap(long)]
  pub(crate) no_unzip: bool,
  #[clap(long, env = "ITC_REPORTER_SALES_ENDPOINT", default_value = SALES_ENDPOINT, hide = true)]
  pub(crate) sales_endpoint: String,
  #[clap(long, env = "ITC_REPORTER_FINANCE_ENDPOINT", default_value = FINANCE_ENDPOINT, hide = true)]
  pub(crate) finance_endpoint: String,
  #[clap(subcommand)]
  pub(crate) command: Command,
}

impl Cli {
  pub(crate) fn config(&self) -> Config {
    Config {
      sales_endpoint: self.sales_endpoint.clone(),
      finance_endpoint: self.finance_endpoint.clone(),
      version: PROTOCOL_VERSION.to_string(),
    }
  }
}

/// Report queries authenticate with an access token.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub(crate) struct TokenAuth {
  /// Name of the macOS Keychain item that holds the iTunes Connect access token (more secure
  /// alternative to -T).
  #[clap(short = 't', long, value_name = "KEYCHAIN_ITEM")]
  pub(crate) access_token_keychain_item: Option<String>,
  /// iTunes Connect access token (can be obtained with the generateToken command or via iTunes
  /// Connect -> Sales & Trends -> Reports -> About Reports).
  #[clap(short = 'T', long)]
  pub(crate) access_token: Option<String>,
}

impl TokenAuth {
  fn secret(&self, store: &impl CredentialStore) -> Result<Secret, Error> {
    match (&self.access_token_keychain_item, &self.access_token) {
      (Some(item), _) => store.get_credential(item).map(Secret::AccessToken),
      (None, Some(token)) => Ok(Secret::AccessToken(token.clone())),
      (None, None) => Err(Error::Validation("An access token is needed, use -t or -T".to_string())),
    }
  }
}

/// Token management authenticates with the Apple ID password.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub(crate) struct PasswordAuth {
  /// Name of the macOS Keychain item that holds the Apple ID password (cannot be used together
  /// with -P).
  #[clap(short = 'p', long, value_name = "KEYCHAIN_ITEM")]
  pub(crate) password_keychain_item: Option<String>,
  /// Apple ID password (cannot be used together with -p).
  #[clap(short = 'P', long)]
  pub(crate) password: Option<String>,
}

impl PasswordAuth {
  fn secret(&self, store: &impl CredentialStore) -> Result<Secret, Error> {
    match (&self.password_keychain_item, &self.password) {
      (Some(item), _) => store.get_credential(item).map(Secret::Password),
      (None, Some(password)) => Ok(Secret::Password(password.clone())),
      (None, None) => Err(Error::Validation("A password is needed, use -p or -P".to_string())),
    }
  }
}

#[derive(Subcommand)]
#[clap(rename_all = "camelCase")]
pub(crate) enum Command {
  /// Check if iTunes Connect is available for queries.
  GetStatus {
    /// Service endpoint to query: Sales or Finance.
    service: Service,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Fetch a list of accounts accessible to the Apple ID given in -u.
  GetAccounts {
    /// Service endpoint to query: Sales or Finance.
    service: Service,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Fetch a list of vendors accessible to the Apple ID given in -u.
  GetVendors {
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Fetch a list of financial reports you can download by vendor number and region.
  GetVendorsAndRegions {
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Query the latest available version of reports of a specific type and subtype.
  GetReportVersion {
    /// Sales, Subscription, SubscriptionEvent, Subscriber, Newsstand or Pre-Order.
    report_type: ReportType,
    /// Summary, Detailed or Opt-In.
    report_subtype: ReportSubtype,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download a financial report file for a specific region and fiscal period.
  GetFinancialReport {
    /// Vendor number of the report to download (see `getVendors`).
    vendor: u64,
    /// Two-character code of the report's region (see `getVendorsAndRegions`).
    region_code: String,
    /// Four-digit year of Apple's fiscal calendar.
    fiscal_year: String,
    /// Period in the fiscal year (1-12) of Apple's fiscal calendar.
    fiscal_period: String,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download a summary sales report file for a specific date range.
  GetSalesReport {
    /// Vendor number of the report to download (see `getVendors`).
    vendor: u64,
    /// Length of time covered by the report: Daily, Weekly, Monthly or Yearly.
    date_type: CalendarUnit,
    /// Time covered by the report: YYYYMMDD for daily and weekly reports (the Sunday that week
    /// ends), YYYYMM for monthly and YYYY for yearly reports.
    date: String,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download every summary sales report between two days.
  GetSalesReports {
    /// Vendor number of the reports to download (see `getVendors`).
    vendor: u64,
    /// Length of time covered by each report: Daily, Weekly, Monthly or Yearly.
    date_type: CalendarUnit,
    /// First day of the range (YYYYMMDD).
    start: String,
    /// Last day of the range (YYYYMMDD).
    end: String,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download a subscription report file for a specific day.
  GetSubscriptionReport {
    #[clap(flatten)]
    report: DailyReport,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download an aggregated subscriber activity report file for a specific day.
  GetSubscriptionEventReport {
    #[clap(flatten)]
    report: DailyReport,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download a transaction-level subscriber activity report file for a specific day.
  GetSubscriberReport {
    #[clap(flatten)]
    report: DailyReport,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download a magazines & newspapers report file for a specific date range.
  GetNewsstandReport {
    /// Vendor number of the report to download (see `getVendors`).
    vendor: u64,
    /// Length of time covered by the report: Daily or Weekly.
    date_type: CalendarUnit,
    /// Time covered by the report (YYYYMMDD, weekly reports use the Sunday that week ends).
    date: String,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download contact information for customers who opted in to share it with you.
  GetOptInReport {
    /// Vendor number of the report to download (see `getVendors`).
    vendor: u64,
    /// Day covered by the report (YYYYMMDD).
    date: String,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Download a summary report file of pre-ordered items for a specific date range.
  GetPreOrderReport {
    /// Vendor number of the report to download (see `getVendors`).
    vendor: u64,
    /// Length of time covered by the report: Daily, Weekly, Monthly or Yearly.
    date_type: CalendarUnit,
    /// Time covered by the report: YYYYMMDD for daily and weekly reports (the Sunday that week
    /// ends), YYYYMM for monthly and YYYY for yearly reports.
    date: String,
    #[clap(flatten)]
    auth: TokenAuth,
  },
  /// Generate a token for accessing iTunes Connect (expires after 180 days) and optionally
  /// store it in the macOS Keychain.
  GenerateToken {
    /// Name of the macOS Keychain item the new access token should be stored in.
    #[clap(long, value_name = "KEYCHAIN_ITEM")]
    update_keychain_item: Option<String>,
    #[clap(flatten)]
    auth: PasswordAuth,
  },
  /// Display the current iTunes Connect access token and its expiration date.
  ViewToken {
    #[clap(flatten)]
    auth: PasswordAuth,
  },
  /// Delete an existing iTunes Connect access token.
  DeleteToken {
    #[clap(flatten)]
    auth: PasswordAuth,
  },
}

/// Arguments shared by the daily, versioned subscription reports.
#[derive(Args)]
pub(crate) struct DailyReport {
  /// Vendor number of the report to download (see `getVendors`).
  vendor: u64,
  /// Day covered by the report (YYYYMMDD).
  date: String,
  /// Report format version to use.
  #[clap(short, long, default_value = "1_1", value_parser = ["1_0", "1_1"])]
  version: String,
}

/// What a command asks the reporter to do.
pub(crate) enum Task {
  Query(Query),
  SalesReports { vendor: u64, range: DateRange },
  GenerateToken { update_keychain_item: Option<String> },
}

impl Command {
  /// Validates the arguments and turns them into a task. Nothing is looked up or sent yet.
  pub(crate) fn task(&self, account: Option<u64>) -> Result<Task, Error> {
    let query = match self {
      Command::GetStatus { service, .. } => Query::Status(*service),
      Command::GetAccounts { service, .. } => Query::Accounts(*service),
      Command::GetVendors { .. } => {
        validate::account("getVendors", account)?;
        Query::Vendors
      }
      Command::GetVendorsAndRegions { .. } => {
        validate::account("getVendorsAndRegions", account)?;
        Query::VendorsAndRegions
      }
      Command::GetReportVersion { report_type, report_subtype, .. } => Query::ReportVersion {
        report_type: *report_type,
        report_subtype: *report_subtype,
      },
      Command::GetFinancialReport { vendor, region_code, fiscal_year, fiscal_period, .. } => {
        validate::account("getFinancialReport", account)?;
        validate::fiscal_year(fiscal_year)?;
        validate::fiscal_period(fiscal_period)?;
        Query::FinancialReport {
          vendor: *vendor,
          region_code: region_code.clone(),
          fiscal_year: fiscal_year.clone(),
          fiscal_period: fiscal_period.clone(),
        }
      }
      Command::GetSalesReport { vendor, date_type, date, .. } => {
        report(*vendor, ReportType::Sales, ReportSubtype::Summary, *date_type, date)?
      }
      Command::GetSalesReports { vendor, date_type, start, end, .. } => {
        let (start, end) = validate::date_range(start, end)?;
        return Ok(Task::SalesReports {
          vendor: *vendor,
          range: DateRange::new(start, end, *date_type),
        });
      }
      Command::GetSubscriptionReport { report, .. } => {
        report.query(ReportType::Subscription, ReportSubtype::Summary)?
      }
      Command::GetSubscriptionEventReport { report, .. } => {
        report.query(ReportType::SubscriptionEvent, ReportSubtype::Summary)?
      }
      Command::GetSubscriberReport { report, .. } => {
        report.query(ReportType::Subscriber, ReportSubtype::Detailed)?
      }
      Command::GetNewsstandReport { vendor, date_type, date, .. } => {
        validate::newsstand_unit(*date_type)?;
        report(*vendor, ReportType::Newsstand, ReportSubtype::Detailed, *date_type, date)?
      }
      Command::GetOptInReport { vendor, date, .. } => {
        validate::report_date(CalendarUnit::Day, date)?;
        Query::OptInReport { vendor: *vendor, date: date.clone() }
      }
      Command::GetPreOrderReport { vendor, date_type, date, .. } => {
        report(*vendor, ReportType::PreOrder, ReportSubtype::Summary, *date_type, date)?
      }
      Command::GenerateToken { update_keychain_item, .. } => {
        return Ok(Task::GenerateToken { update_keychain_item: update_keychain_item.clone() });
      }
      Command::ViewToken { .. } => Query::ViewToken,
      Command::DeleteToken { .. } => Query::DeleteToken,
    };
    Ok(Task::Query(query))
  }

  /// The secret the command authenticates with, read from the keychain where asked to.
  pub(crate) fn secret(&self, store: &impl CredentialStore) -> Result<Secret, Error> {
    match self {
      Command::GetStatus { auth, .. }
      | Command::GetAccounts { auth, .. }
      | Command::GetVendors { auth }
      | Command::GetVendorsAndRegions { auth }
      | Command::GetReportVersion { auth, .. }
      | Command::GetFinancialReport { auth, .. }
      | Command::GetSalesReport { auth, .. }
      | Command::GetSalesReports { auth, .. }
      | Command::GetSubscriptionReport { auth, .. }
      | Command::GetSubscriptionEventReport { auth, .. }
      | Command::GetSubscriberReport { auth, .. }
      | Command::GetNewsstandReport { auth, .. }
      | Command::GetOptInReport { auth, .. }
      | Command::GetPreOrderReport { auth, .. } => auth.secret(store),
      Command::GenerateToken { auth, .. } | Command::ViewToken { auth } | Command::DeleteToken { auth } => {
        auth.secret(store)
      }
    }
  }
}

impl DailyReport {
  fn query(&self, report_type: ReportType, report_subtype: ReportSubtype) -> Result<Query, Error> {
    validate::report_date(CalendarUnit::Day, &self.date)?;
    Ok(Query::SubscriptionReport {
      vendor: self.vendor,
      report_type,
      report_subtype,
      date: self.date.clone(),
      version: self.version.clone(),
    })
  }
}

fn report(
  vendor: u64,
  report_type: ReportType,
  report_subtype: ReportSubtype,
  date_type: CalendarUnit,
  date: &str,
) -> Result<Query, Error> {
  validate::report_date(date_type, date)?;
  Ok(Query::Report(ReportRequest {
    vendor,
    report_type,
    report_subtype,
    date_type,
    date_token: date.to_string(),
  }))
}
