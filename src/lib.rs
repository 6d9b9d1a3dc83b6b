pub mod charts;
pub mod client;
pub mod config;
pub mod logging;
pub mod records;
pub mod report;
pub mod retry;
pub mod table;
pub mod trendline;
pub mod ui;
