// ==========================================
// 资本配置决策系统 - 引擎层错误类型
// ==========================================
// 说明: 评分/分级/派生计算本身不报错;
//       仅结构性不可能的调用（对象不存在、非法状态流转等）返回错误
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("对象不存在: {entity}(id={id})")]
    NotFound { entity: String, id: String },

    #[error("无效的状态转换: {entity}(id={id}) from={from} to={to}")]
    InvalidStateTransition {
        entity: String,
        id: String,
        from: String,
        to: String,
    },

    #[error("机会未批准,不能转为项目: opportunity_id={id}, status={status}")]
    OpportunityNotApproved { id: String, status: String },

    #[error("机会已存在对应项目: opportunity_id={opportunity_id}")]
    DuplicateProject { opportunity_id: String },

    #[error("无效输入: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
