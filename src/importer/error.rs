// ==========================================
// 资本配置决策系统 - 导入模块错误类型
// ==========================================
// 说明: 仅表头结构错误作为 Err 返回（整表拒绝）;
//       行级问题以 "第 N 行: ..." 字符串收集在 ImportOutcome.errors
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("表头为空: {table}")]
    EmptyHeader { table: String },

    #[error("缺少必需列 ({table}): {}", columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("重复列 ({table}): {column}")]
    DuplicateColumn { table: String, column: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
