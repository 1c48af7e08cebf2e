// ==========================================
// 资本配置决策系统 - 配置层
// ==========================================
// 职责: 总资本/评分权重/协同区间/板块关键字/质量选项
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod scoring_profile;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_TOTAL_CAPITAL};
pub use scoring_profile::ScoringProfile;
