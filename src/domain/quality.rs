// ==========================================
// 资本配置决策系统 - 数据质量领域模型
// ==========================================
// 规则以 RuleId 枚举标识,判定函数由引擎按 RuleId 分派
// 不存储/执行任何代码字符串
// ==========================================

use crate::domain::types::{IssueStatus, RuleCategory, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RuleId - 规则编号
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "FIN-001")]
    Fin001,
    #[serde(rename = "FIN-002")]
    Fin002,
    #[serde(rename = "FIN-003")]
    Fin003,
    #[serde(rename = "FIN-004")]
    Fin004,
    #[serde(rename = "COMP-001")]
    Comp001,
    #[serde(rename = "COMP-002")]
    Comp002,
    #[serde(rename = "COMP-003")]
    Comp003,
    #[serde(rename = "COMP-004")]
    Comp004,
    #[serde(rename = "CONS-001")]
    Cons001,
    #[serde(rename = "CONS-002")]
    Cons002,
    #[serde(rename = "CONS-003")]
    Cons003,
    #[serde(rename = "CONS-004")]
    Cons004,
    #[serde(rename = "ACC-001")]
    Acc001,
    #[serde(rename = "ACC-002")]
    Acc002,
    #[serde(rename = "COMPL-001")]
    Compl001,
    #[serde(rename = "COMPL-002")]
    Compl002,
    #[serde(rename = "COMPL-003")]
    Compl003,
    #[serde(rename = "COMPL-004")]
    Compl004,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Fin001 => "FIN-001",
            RuleId::Fin002 => "FIN-002",
            RuleId::Fin003 => "FIN-003",
            RuleId::Fin004 => "FIN-004",
            RuleId::Comp001 => "COMP-001",
            RuleId::Comp002 => "COMP-002",
            RuleId::Comp003 => "COMP-003",
            RuleId::Comp004 => "COMP-004",
            RuleId::Cons001 => "CONS-001",
            RuleId::Cons002 => "CONS-002",
            RuleId::Cons003 => "CONS-003",
            RuleId::Cons004 => "CONS-004",
            RuleId::Acc001 => "ACC-001",
            RuleId::Acc002 => "ACC-002",
            RuleId::Compl001 => "COMPL-001",
            RuleId::Compl002 => "COMPL-002",
            RuleId::Compl003 => "COMPL-003",
            RuleId::Compl004 => "COMPL-004",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        RuleId::all().into_iter().find(|id| id.as_str() == upper)
    }

    pub fn all() -> Vec<RuleId> {
        vec![
            RuleId::Fin001,
            RuleId::Fin002,
            RuleId::Fin003,
            RuleId::Fin004,
            RuleId::Comp001,
            RuleId::Comp002,
            RuleId::Comp003,
            RuleId::Comp004,
            RuleId::Cons001,
            RuleId::Cons002,
            RuleId::Cons003,
            RuleId::Cons004,
            RuleId::Acc001,
            RuleId::Acc002,
            RuleId::Compl001,
            RuleId::Compl002,
            RuleId::Compl003,
            RuleId::Compl004,
        ]
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ValidationRule - 校验规则
// ==========================================
// 规则定义静态,仅 enabled 可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub id: RuleId,
    pub name: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub description: String,
    pub auto_fixable: bool,
    pub enabled: bool,
}

// ==========================================
// DataQualityIssue - 数据质量问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityIssue {
    pub id: String,
    pub rule_id: RuleId,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub affected_items: Vec<String>,
    pub category: RuleCategory,
    pub status: IssueStatus,
    pub detected_date: DateTime<Utc>,
    #[serde(default)]
    pub auto_fix_suggestion: Option<String>,
}

impl DataQualityIssue {
    /// 跨轮次识别同一问题的键 (rule_id, affected_items)
    pub fn identity_key(&self) -> (RuleId, Vec<String>) {
        let mut items = self.affected_items.clone();
        items.sort();
        (self.rule_id, items)
    }

    pub fn is_open(&self) -> bool {
        self.status == IssueStatus::Open
    }
}

// ==========================================
// 质量指标与报告
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub overall_score: f64,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub total_issues: usize,
    pub resolved_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub issues: Vec<DataQualityIssue>,
    pub metrics: QualityMetrics,
    pub run_at: DateTime<Utc>,
}
