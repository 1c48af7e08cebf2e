// ==========================================
// 资本配置决策系统 - API 层
// ==========================================
// 职责: 面向展示层的业务接口,错误转换为用户可读消息
// ==========================================

pub mod error;
pub mod portfolio_api;

// 重导出
pub use error::{ApiError, ApiResult};
pub use portfolio_api::{
    BatchResult, ImportSummary, PipelineSummary, PortfolioApi, PortfolioSettings,
};
