// ==========================================
// 资本配置决策系统 - 应用层
// ==========================================
// 职责: 装配数据库、配置与 API,提供演示数据
// ==========================================

pub mod seed;
pub mod state;

// 重导出
pub use seed::demo_portfolio;
pub use state::{get_default_db_path, AppState};
