use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::calendar::CalendarUnit;
use crate::error::Error;
use crate::error::Error::Validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    RobotXml,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::RobotXml => "Robot.XML",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Normal" => Ok(Mode::Normal),
            "Robot.XML" => Ok(Mode::RobotXml),
            invalid => Err(Validation(format!(
                "Invalid mode `{invalid}`. Use Normal or Robot.XML"
            ))),
        }
    }
}

/// The secret an Apple ID authenticates with. Report queries use an access token, token
/// management commands need the account password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secret {
    AccessToken(String),
    Password(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub secret: Secret,
    pub account: Option<u64>,
    pub mode: Mode,
}

/// Body of the `jsonRequest` form field. Values are expected to be percent-encoded already.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRequest<'a> {
    pub(crate) userid: &'a str,
    pub(crate) version: &'a str,
    pub(crate) mode: &'a str,
    #[serde(rename = "queryInput")]
    pub(crate) query_input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) account: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) accesstoken: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<&'a str>,
}

/// Endpoint family a command is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Sales,
    Finance,
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Sales => f.write_str("Sales"),
            Service::Finance => f.write_str("Finance"),
        }
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Sales" => Ok(Service::Sales),
            "Finance" => Ok(Service::Finance),
            invalid => Err(Validation(format!(
                "Invalid service `{invalid}`. Use Sales or Finance"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Sales,
    Subscription,
    SubscriptionEvent,
    Subscriber,
    Newsstand,
    PreOrder,
}

impl Display for ReportType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReportType::Sales => "Sales",
            ReportType::Subscription => "Subscription",
            ReportType::SubscriptionEvent => "SubscriptionEvent",
            ReportType::Subscriber => "Subscriber",
            ReportType::Newsstand => "Newsstand",
            ReportType::PreOrder => "Pre-Order",
        })
    }
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Sales" => Ok(ReportType::Sales),
            "Subscription" => Ok(ReportType::Subscription),
            "SubscriptionEvent" => Ok(ReportType::SubscriptionEvent),
            "Subscriber" => Ok(ReportType::Subscriber),
            "Newsstand" => Ok(ReportType::Newsstand),
            "Pre-Order" => Ok(ReportType::PreOrder),
            invalid => Err(Validation(format!("Invalid report type `{invalid}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSubtype {
    Summary,
    Detailed,
    OptIn,
}

impl Display for ReportSubtype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReportSubtype::Summary => "Summary",
            ReportSubtype::Detailed => "Detailed",
            ReportSubtype::OptIn => "Opt-In",
        })
    }
}

impl FromStr for ReportSubtype {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Summary" => Ok(ReportSubtype::Summary),
            "Detailed" => Ok(ReportSubtype::Detailed),
            "Opt-In" => Ok(ReportSubtype::OptIn),
            invalid => Err(Validation(format!("Invalid report subtype `{invalid}`"))),
        }
    }
}

/// A single `Sales.getReport` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub vendor: u64,
    pub report_type: ReportType,
    pub report_subtype: ReportSubtype,
    pub date_type: CalendarUnit,
    pub date_token: String,
}

impl ReportRequest {
    pub fn command(&self) -> String {
        format!(
            "Sales.getReport, {vendor},{report_type},{report_subtype},{date_type},{date_token}",
            vendor = self.vendor,
            report_type = self.report_type,
            report_subtype = self.report_subtype,
            date_type = self.date_type,
            date_token = self.date_token,
        )
    }
}

/// What the reporting API answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResult {
    pub content: Vec<u8>,
    pub is_compressed: bool,
    /// Name of the report file to write, only set for file downloads.
    pub filename: Option<String>,
    pub message: Option<String>,
}

/// First half of an access token generation: the id the server expects to see mirrored back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToken {
    pub request_id: String,
}
