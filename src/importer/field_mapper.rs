// ==========================================
// 资本配置决策系统 - 字段映射器
// ==========================================
// 职责: 已分词的表格 (RawTable) → 领域记录 + 行级错误
// 输入: 表头 + 字符串单元格（文件解析由调用方完成）
// 输出: ImportOutcome { records, errors }
// ==========================================
// 规则:
//   - 表头缺必需列 -> Err(ImportError),整表拒绝
//   - 行级问题 -> "第 N 行: ..."（N 为表格行号,表头为第 1 行）,其余行照常返回
//   - 全空行跳过;同表内主键重复时保留首行
//   - 业务规则（区间有序/评分越界等）不在此拦截,交由数据质量规则发现
// ==========================================

use crate::domain::opportunity::{InvestmentRange, Opportunity};
use crate::domain::priority::InvestmentPriority;
use crate::domain::project::{BusinessPlan, ScoringBreakdown, ValidatedProject};
use crate::domain::sector::{AllocationConstraint, Sector};
use crate::domain::types::{
    ConstraintType, InvestmentGrade, OpportunityStatus, RiskAppetite, ValidationStatus,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::TableKind;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use tracing::{info, warn};

// ==========================================
// 输入 / 输出
// ==========================================

/// 已分词的表格
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: &[&str], rows: Vec<Vec<&str>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }
}

/// 映射结果（部分成功）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome<T> {
    pub records: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> ImportOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ==========================================
// 列索引 / 行视图
// ==========================================

struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn build(kind: TableKind, headers: &[String]) -> ImportResult<Self> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ImportError::EmptyHeader {
                table: kind.to_string(),
            });
        }

        let mut positions = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let name = header.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if positions.insert(name.clone(), i).is_some() {
                return Err(ImportError::DuplicateColumn {
                    table: kind.to_string(),
                    column: name,
                });
            }
        }

        let missing: Vec<String> = kind
            .required_columns()
            .iter()
            .filter(|c| !positions.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                table: kind.to_string(),
                columns: missing,
            });
        }

        Ok(Self { positions })
    }
}

struct RowView<'a> {
    cells: &'a [String],
    index: &'a ColumnIndex,
}

impl<'a> RowView<'a> {
    fn text(&self, column: &str) -> String {
        self.index
            .positions
            .get(column)
            .and_then(|i| self.cells.get(*i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn required(&self, column: &str) -> Result<String, String> {
        let value = self.text(column);
        if value.is_empty() {
            Err(format!("{} 不能为空", column))
        } else {
            Ok(value)
        }
    }

    fn number<T: FromStr>(&self, column: &str) -> Result<T, String> {
        let value = self.required(column)?;
        value
            .replace(',', "")
            .parse::<T>()
            .map_err(|_| format!("{} 无法解析为数值: {}", column, value))
    }

    fn f64(&self, column: &str) -> Result<f64, String> {
        let v: f64 = self.number(column)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(format!("{} 不是有限数值", column))
        }
    }

    /// 周期（月）,必须大于 0
    fn months(&self, column: &str) -> Result<u32, String> {
        let v: u32 = self.number(column)?;
        if v == 0 {
            return Err(format!("{} 必须大于 0", column));
        }
        Ok(v)
    }

    fn date(&self, column: &str) -> Result<NaiveDate, String> {
        let value = self.required(column)?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&value, "%Y%m%d"))
            .map_err(|_| format!("{} 日期格式错误（期望 YYYY-MM-DD）: {}", column, value))
    }

    fn flag(&self, column: &str) -> Result<bool, String> {
        let value = self.required(column)?;
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(true),
            "false" | "0" | "no" | "n" => Ok(false),
            _ => Err(format!("{} 无法解析为布尔值: {}", column, value)),
        }
    }

    fn parsed<T>(&self, column: &str, parse: fn(&str) -> Option<T>) -> Result<T, String> {
        let value = self.required(column)?;
        parse(&value).ok_or_else(|| format!("{} 取值无效: {}", column, value))
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper {
    actor: String,
}

impl FieldMapper {
    /// actor 写入导入机会的 updated_by
    pub fn new(actor: &str) -> Self {
        Self {
            actor: actor.to_string(),
        }
    }

    /// 通用映射流程
    fn map_table<T>(
        &self,
        kind: TableKind,
        table: &RawTable,
        key_of: fn(&T) -> Option<String>,
        map_row: impl Fn(&RowView<'_>) -> Result<T, String>,
    ) -> ImportResult<ImportOutcome<T>> {
        let index = ColumnIndex::build(kind, &table.headers)?;

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (i, cells) in table.rows.iter().enumerate() {
            let line = i + 2;
            let row = RowView {
                cells,
                index: &index,
            };
            if row.is_blank() {
                continue;
            }

            match map_row(&row) {
                Ok(record) => {
                    if let Some(key) = key_of(&record) {
                        if !seen.insert(key.clone()) {
                            errors.push(format!("第 {} 行: 主键重复 {}", line, key));
                            continue;
                        }
                    }
                    records.push(record);
                }
                Err(message) => errors.push(format!("第 {} 行: {}", line, message)),
            }
        }

        if !errors.is_empty() {
            warn!(table = %kind, errors = errors.len(), "导入存在行级错误");
        }
        info!(table = %kind, records = records.len(), "表格映射完成");

        Ok(ImportOutcome { records, errors })
    }

    // ===== 战略优先级 =====
    // capital_allocation 由调用方按总资本派生
    pub fn map_priorities(&self, table: &RawTable) -> ImportResult<ImportOutcome<InvestmentPriority>> {
        self.map_table(
            TableKind::Priorities,
            table,
            |p: &InvestmentPriority| Some(p.id.clone()),
            |row| {
                let strategic_importance: u8 = row.number("strategic_importance")?;
                if !(1..=10).contains(&strategic_importance) {
                    return Err(format!(
                        "strategic_importance 必须在 1 到 10 之间: {}",
                        strategic_importance
                    ));
                }
                Ok(InvestmentPriority {
                    id: row.required("id")?,
                    name: row.required("name")?,
                    weight: row.f64("weight")?,
                    capital_allocation: 0.0,
                    time_horizon: row.text("time_horizon"),
                    min_roi: row.f64("min_roi")?,
                    max_payback: row.f64("max_payback")?,
                    risk_appetite: row.parsed("risk_appetite", RiskAppetite::from_str)?,
                    strategic_importance,
                })
            },
        )
    }

    // ===== 投资机会 =====
    pub fn map_opportunities(&self, table: &RawTable) -> ImportResult<ImportOutcome<Opportunity>> {
        self.map_table(
            TableKind::Opportunities,
            table,
            |o: &Opportunity| Some(o.id.clone()),
            |row| {
                Ok(Opportunity {
                    id: row.required("id")?,
                    name: row.required("name")?,
                    description: row.text("description"),
                    source: row.text("source"),
                    sponsor: row.text("sponsor"),
                    business_unit: row.text("business_unit"),
                    status: row.parsed("status", OpportunityStatus::from_str)?,
                    investment_range: InvestmentRange::new(
                        row.f64("investment_min")?,
                        row.f64("investment_max")?,
                    ),
                    estimated_start: row.date("estimated_start")?,
                    duration: row.months("duration")?,
                    strategic_fit_score: row.f64("strategic_fit_score")?,
                    preliminary_risk_score: row.f64("preliminary_risk_score")?,
                    recommendations: Vec::new(),
                    approved_by: None,
                    updated_by: self.actor.clone(),
                    updated_date: Utc::now(),
                })
            },
        )
    }

    // ===== 校验项目 =====
    // 商业计划仅导入执行摘要;风险/协同清单为空,由质量规则提示补全
    pub fn map_projects(&self, table: &RawTable) -> ImportResult<ImportOutcome<ValidatedProject>> {
        self.map_table(
            TableKind::Projects,
            table,
            |p: &ValidatedProject| Some(p.id.clone()),
            |row| {
                let composite_score = row.f64("composite_score")?;
                let now = Utc::now();
                Ok(ValidatedProject {
                    id: row.required("id")?,
                    opportunity_id: row.required("opportunity_id")?,
                    name: row.required("name")?,
                    sponsor: row.text("sponsor"),
                    business_unit: row.text("business_unit"),
                    estimated_start: row.date("estimated_start")?,
                    duration_months: row.months("duration_months")?,
                    capex: row.f64("capex")?,
                    opex: row.f64("opex")?,
                    revenue_potential: row.f64("revenue_potential")?,
                    npv: row.f64("npv")?,
                    irr: row.f64("irr")?,
                    mirr: row.f64("mirr")?,
                    payback_years: row.f64("payback_years")?,
                    composite_score,
                    investment_grade: row.parsed("investment_grade", InvestmentGrade::from_str)?,
                    risk_score: row.f64("risk_score")?,
                    scoring_breakdown: ScoringBreakdown {
                        strategic_alignment: row.f64("strategic_alignment")?,
                        financial_score: row.f64("financial_score")?,
                        risk_adjustment: row.f64("risk_adjustment")?,
                        synergy_score: row.f64("synergy_score")?,
                        composite_score,
                    },
                    business_plan: BusinessPlan {
                        executive_summary: row.text("executive_summary"),
                        ..BusinessPlan::default()
                    },
                    validation_status: row
                        .parsed("validation_status", ValidationStatus::from_str)?,
                    validated_by: None,
                    created_date: now,
                    updated_date: now,
                })
            },
        )
    }

    // ===== 板块主数据 =====
    pub fn map_sectors(&self, table: &RawTable) -> ImportResult<ImportOutcome<Sector>> {
        self.map_table(
            TableKind::Sectors,
            table,
            |s: &Sector| Some(s.id.clone()),
            |row| {
                Ok(Sector {
                    id: row.required("id")?,
                    name: row.required("name")?,
                    target_allocation: row.f64("target_allocation")?,
                    min_allocation: row.f64("min_allocation")?,
                    max_allocation: row.f64("max_allocation")?,
                })
            },
        )
    }

    // ===== 配置约束 =====
    pub fn map_constraints(
        &self,
        table: &RawTable,
    ) -> ImportResult<ImportOutcome<AllocationConstraint>> {
        self.map_table(
            TableKind::Constraints,
            table,
            |_: &AllocationConstraint| None,
            |row| {
                Ok(AllocationConstraint {
                    sector_id: row.required("sector_id")?,
                    constraint_type: row.parsed("constraint_type", ConstraintType::from_str)?,
                    value: row.f64("value")?,
                    is_hard: row.flag("is_hard")?,
                    reason: row.text("reason"),
                })
            },
        )
    }
}
