//! External collaborators for price history and news.

pub mod newsdata;
pub mod yahoo;

pub use newsdata::NewsDataClient;
pub use yahoo::YahooFinanceClient;
