// ==========================================
// 资本配置决策系统 - 导入层
// ==========================================
// 职责: 已分词表格 -> 领域记录（表头校验 + 字段映射 + 行级错误）
// 不负责: 文件格式解析
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod schema;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, ImportOutcome, RawTable};
pub use schema::TableKind;
