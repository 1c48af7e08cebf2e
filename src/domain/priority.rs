// ==========================================
// 资本配置决策系统 - 战略优先级领域模型
// ==========================================
// 红线: 全部优先级权重之和恒为 100（误差 < 0.01）
// ==========================================

use crate::domain::types::RiskAppetite;
use serde::{Deserialize, Serialize};

/// 权重和容差
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

// ==========================================
// InvestmentPriority - 战略投资优先级
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPriority {
    pub id: String,
    pub name: String,
    pub weight: f64,              // 权重 (0-100)
    pub capital_allocation: f64,  // 派生: weight/100 × 总资本
    pub time_horizon: String,     // 投资期限描述（如 "5-10 years"）
    pub min_roi: f64,             // 最低回报率 (%)
    pub max_payback: f64,         // 最长回收期 (年)
    pub risk_appetite: RiskAppetite,
    pub strategic_importance: u8, // 1-10
}

impl InvestmentPriority {
    /// 按总资本派生配置金额
    pub fn derive_capital_allocation(&mut self, total_capital: f64) {
        self.capital_allocation = self.weight / 100.0 * total_capital;
    }
}

/// 权重之和
pub fn total_weight(priorities: &[InvestmentPriority]) -> f64 {
    priorities.iter().map(|p| p.weight).sum()
}

/// 权重之和是否为 100（容差内）
pub fn weights_balanced(priorities: &[InvestmentPriority]) -> bool {
    (total_weight(priorities) - 100.0).abs() < WEIGHT_SUM_TOLERANCE
}
