pub mod dashboard;

pub use dashboard::{DashboardConfig, DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH};
