// ==========================================
// 资本配置决策系统 - 操作日志数据仓储
// ==========================================
// 红线: 所有状态写入必须记录
// 存储: action_log 表
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
