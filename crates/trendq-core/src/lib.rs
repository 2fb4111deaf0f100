pub mod app_config;
pub mod config;
pub mod dates;
pub mod error;
pub mod keywords;
pub mod plan;
pub mod series;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{expand, DateRange, MonthDate, RangeMode};
pub use error::ConfigError;
pub use keywords::{parse_keyword_lines, AliasTable, Keyword};
pub use plan::{plan, CategoryId, OutputKey, WorkItem};
pub use series::{TimePoint, TimeSeries};
