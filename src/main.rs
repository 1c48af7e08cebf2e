// ==========================================
// 资本配置决策系统 - 命令行入口
// ==========================================
// 打开数据库 -> 空库写入演示组合 -> 执行全流程 -> 输出摘要
// ==========================================

use anyhow::Context;

use capital_allocation::app::{get_default_db_path, AppState};
use capital_allocation::logging;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", capital_allocation::APP_NAME);
    tracing::info!("系统版本: {}", capital_allocation::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径（首个命令行参数优先）
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let mut app_state = AppState::new(db_path).context("无法初始化AppState")?;
    if app_state.seed_if_empty()? {
        tracing::info!("数据库为空,已写入演示组合");
    }

    let summary = app_state
        .portfolio_api
        .run_pipeline("cli")
        .context("组合流水线执行失败")?;

    tracing::info!(
        converted = summary.converted.len(),
        allocatable_projects = summary.allocatable_projects,
        "项目转换与分级"
    );

    for status in &summary.constraint_statuses {
        tracing::info!(
            sector_id = %status.sector_id,
            status = %status.status,
            violations = status.violations.len(),
            "板块约束"
        );
    }

    tracing::info!(
        overall_score = summary.quality.overall_score,
        critical = summary.quality.critical_count,
        warning = summary.quality.warning_count,
        info = summary.quality.info_count,
        "数据质量"
    );

    for (name, comparison) in &summary.scenarios {
        tracing::info!(
            scenario = %name,
            baseline_count = comparison.baseline.project_count,
            scenario_count = comparison.scenario.project_count,
            capital_delta = comparison.delta.total_capital,
            mean_irr_delta = comparison.delta.mean_irr,
            "情景比较"
        );
    }

    let json = serde_json::to_string_pretty(&summary).context("序列化流水线摘要失败")?;
    println!("{}", json);

    Ok(())
}
