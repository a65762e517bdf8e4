use crate::calendar::CalendarUnit;
use crate::model::{ReportRequest, ReportSubtype, ReportType, Service};

/// Every query the reporter understands, with the parameters it is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Status(Service),
    Accounts(Service),
    Vendors,
    VendorsAndRegions,
    ReportVersion {
        report_type: ReportType,
        report_subtype: ReportSubtype,
    },
    FinancialReport {
        vendor: u64,
        region_code: String,
        fiscal_year: String,
        fiscal_period: String,
    },
    /// Sales, newsstand and pre-order reports, addressed by date type and date.
    Report(ReportRequest),
    /// Subscription, subscription event and subscriber reports, always daily and versioned.
    SubscriptionReport {
        vendor: u64,
        report_type: ReportType,
        report_subtype: ReportSubtype,
        date: String,
        version: String,
    },
    OptInReport {
        vendor: u64,
        date: String,
    },
    ViewToken,
    GenerateToken,
    DeleteToken,
}

impl Query {
    pub fn service(&self) -> Service {
        match self {
            Query::Status(service) | Query::Accounts(service) => *service,
            Query::VendorsAndRegions | Query::FinancialReport { .. } => Service::Finance,
            Query::Vendors
            | Query::ReportVersion { .. }
            | Query::Report(_)
            | Query::SubscriptionReport { .. }
            | Query::OptInReport { .. }
            | Query::ViewToken
            | Query::GenerateToken
            | Query::DeleteToken => Service::Sales,
        }
    }

    pub fn command(&self) -> String {
        match self {
            Query::Status(service) => format!("{service}.getStatus"),
            Query::Accounts(service) => format!("{service}.getAccounts"),
            Query::Vendors => "Sales.getVendors".to_string(),
            Query::VendorsAndRegions => "Finance.getVendorsAndRegions".to_string(),
            Query::ReportVersion { report_type, report_subtype } => {
                format!("Sales.getReportVersion, {report_type},{report_subtype}")
            }
            Query::FinancialReport { vendor, region_code, fiscal_year, fiscal_period } => {
                format!("Finance.getReport, {vendor},{region_code},Financial,{fiscal_year},{fiscal_period}")
            }
            Query::Report(request) => request.command(),
            Query::SubscriptionReport { vendor, report_type, report_subtype, date, version } => format!(
                "Sales.getReport, {vendor},{report_type},{report_subtype},{daily},{date},{version}",
                daily = CalendarUnit::Day
            ),
            Query::OptInReport { vendor, date } => format!(
                "Sales.getReport, {vendor},{sales},{opt_in},{weekly},{date}",
                sales = ReportType::Sales,
                opt_in = ReportSubtype::OptIn,
                weekly = CalendarUnit::Week
            ),
            Query::ViewToken => "Sales.viewToken".to_string(),
            Query::GenerateToken => "Sales.generateToken".to_string(),
            Query::DeleteToken => "Sales.deleteToken".to_string(),
        }
    }

    /// Whether a gzip report of this query may be unpacked. Opt-in reports are password
    /// protected archives.
    pub fn unzip(&self) -> bool {
        !matches!(self, Query::OptInReport { .. })
    }
}
