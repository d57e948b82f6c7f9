pub static OKX_API_URL: &str = "https://www.okx.com";
pub static AWS_API_URL: &str = "https://aws.okx.com";

pub(crate) const POSITIONS_HISTORY_PATH: &str = "/api/v5/account/positions-history";

pub(crate) const HEADER_ACCESS_KEY: &str = "OK-ACCESS-KEY";
pub(crate) const HEADER_ACCESS_SIGN: &str = "OK-ACCESS-SIGN";
pub(crate) const HEADER_ACCESS_TIMESTAMP: &str = "OK-ACCESS-TIMESTAMP";
pub(crate) const HEADER_ACCESS_PASSPHRASE: &str = "OK-ACCESS-PASSPHRASE";
pub(crate) const HEADER_SIMULATED_TRADING: &str = "x-simulated-trading";

/// Page size the dashboard requests when nothing else is configured
pub const DEFAULT_PAGE_LIMIT: u32 = 15;

/// Quote currency the exchange reports P&L in
pub const QUOTE_CCY: &str = "USDT";
