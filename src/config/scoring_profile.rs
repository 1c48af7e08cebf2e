use crate::engine::scoring::ScoringWeights;
use serde::{Deserialize, Serialize};

/// 评分权重配置（持久化对象）
///
/// 存储位置: config_kv（scope_id='global', key='scoring_profile'）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    /// 显示名称
    pub title: String,

    /// 说明（可选）
    #[serde(default)]
    pub description: Option<String>,

    /// 四项评分权重（之和须为 1）
    pub weights: ScoringWeights,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            title: "默认评分权重".to_string(),
            description: Some("战略 0.4 / 财务 0.3 / 风险 0.2 / 协同 0.1".to_string()),
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringProfile {
    /// 校验: 权重非负且之和为 1
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.weights;
        if [w.strategic, w.financial, w.risk, w.synergy]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err("评分权重必须为非负数".to_string());
        }
        if !w.is_normalized() {
            return Err(format!(
                "评分权重之和必须为 1,当前为 {:.4}",
                w.strategic + w.financial + w.risk + w.synergy
            ));
        }
        Ok(())
    }
}
