use crate::model::Service;

pub const SALES_ENDPOINT: &str = "https://reportingitc-reporter.apple.com/reportservice/sales/v1";
pub const FINANCE_ENDPOINT: &str = "https://reportingitc-reporter.apple.com/reportservice/finance/v1";
pub const PROTOCOL_VERSION: &str = "2.2";

/// Where and how the reporter talks to iTunes Connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sales_endpoint: String,
    pub finance_endpoint: String,
    pub version: String,
}

impl Config {
    pub fn endpoint(&self, service: Service) -> &str {
        match service {
            Service::Sales => &self.sales_endpoint,
            Service::Finance => &self.finance_endpoint,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sales_endpoint: SALES_ENDPOINT.to_string(),
            finance_endpoint: FINANCE_ENDPOINT.to_string(),
            version: PROTOCOL_VERSION.to_string(),
        }
    }
}
