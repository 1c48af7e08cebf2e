// ==========================================
// 资本配置决策系统 - 操作日志领域模型
// ==========================================
// 红线: 所有状态写入必须记录
// 用途: 审计追踪
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub action_type: ActionType,
    pub action_ts: DateTime<Utc>,
    pub actor: String,
    pub entity_id: Option<String>,        // 受影响实体（机会/项目/板块/规则）
    pub payload_json: Option<JsonValue>,  // 操作参数
    pub detail: Option<String>,
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    UpdatePriorityWeight,  // 修改优先级权重
    TransitionOpportunity, // 机会状态流转
    ConvertOpportunity,    // 机会转项目
    TransitionProject,     // 项目校验状态流转
    RecalculateAllocation, // 重算板块配置
    Rebalance,             // 一键再平衡
    ManualAllocation,      // 人工调整配置
    RunQualityCheck,       // 数据质量校验
    UpdateIssueStatus,     // 处理质量问题
    ToggleRule,            // 启停规则
    ApplyAutoFix,          // 自动修复
    Import,                // 导入
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::UpdatePriorityWeight => "UPDATE_PRIORITY_WEIGHT",
            ActionType::TransitionOpportunity => "TRANSITION_OPPORTUNITY",
            ActionType::ConvertOpportunity => "CONVERT_OPPORTUNITY",
            ActionType::TransitionProject => "TRANSITION_PROJECT",
            ActionType::RecalculateAllocation => "RECALCULATE_ALLOCATION",
            ActionType::Rebalance => "REBALANCE",
            ActionType::ManualAllocation => "MANUAL_ALLOCATION",
            ActionType::RunQualityCheck => "RUN_QUALITY_CHECK",
            ActionType::UpdateIssueStatus => "UPDATE_ISSUE_STATUS",
            ActionType::ToggleRule => "TOGGLE_RULE",
            ActionType::ApplyAutoFix => "APPLY_AUTO_FIX",
            ActionType::Import => "IMPORT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "UPDATE_PRIORITY_WEIGHT" => Some(ActionType::UpdatePriorityWeight),
            "TRANSITION_OPPORTUNITY" => Some(ActionType::TransitionOpportunity),
            "CONVERT_OPPORTUNITY" => Some(ActionType::ConvertOpportunity),
            "TRANSITION_PROJECT" => Some(ActionType::TransitionProject),
            "RECALCULATE_ALLOCATION" => Some(ActionType::RecalculateAllocation),
            "REBALANCE" => Some(ActionType::Rebalance),
            "MANUAL_ALLOCATION" => Some(ActionType::ManualAllocation),
            "RUN_QUALITY_CHECK" => Some(ActionType::RunQualityCheck),
            "UPDATE_ISSUE_STATUS" => Some(ActionType::UpdateIssueStatus),
            "TOGGLE_RULE" => Some(ActionType::ToggleRule),
            "APPLY_AUTO_FIX" => Some(ActionType::ApplyAutoFix),
            "IMPORT" => Some(ActionType::Import),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ActionLog {
    pub fn new(action_type: ActionType, actor: &str, entity_id: Option<&str>) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type,
            action_ts: Utc::now(),
            actor: actor.to_string(),
            entity_id: entity_id.map(|s| s.to_string()),
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
