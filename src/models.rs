// models.rs - 作为模块目录入口文件（Rust 2018+ 风格）
// 导出所有子模块
pub mod cell_value;
pub mod config;
pub mod models;
pub mod state;
pub mod table;
pub mod utils;

// 重新导出常用类型，保持API一致性
pub use cell_value::CellValue;
pub use config::{Config, GeneralConfig, KeybindingsConfig, ReportsConfig, TuiConfig};
pub use models::{IntentErrorRow, LongRow, MetricRow};
pub use state::ViewState;
pub use table::{MetricTable, TextTable};
