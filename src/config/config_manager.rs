// ==========================================
// 资本配置决策系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照
// 存储: config_kv 表 (key-value + scope)
// 约定: 配置缺失或格式错误时回退默认值并告警,不中断业务
// ==========================================

use crate::config::scoring_profile::ScoringProfile;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::engine::scoring::{
    SeededSynergy, SynergySource, DEFAULT_SYNERGY_MAX, DEFAULT_SYNERGY_MIN,
};
use crate::engine::sector_allocator::SectorKeywordTable;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// 默认总资本
pub const DEFAULT_TOTAL_CAPITAL: f64 = 100_000_000_000.0;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 对传入连接再次应用统一 PRAGMA 与建表（均幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 基础读写
    // ==========================================

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RepositoryError::ValidationError("配置键不能为空".to_string()));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        debug!(key, value, "配置已写入");
        Ok(())
    }

    /// 列出全部 global 配置（按 key 排序）
    pub fn list_configs(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    // ==========================================
    // 快照
    // ==========================================

    /// 获取所有 global 配置的快照（JSON）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let configs = self.list_configs()?;
        Ok(serde_json::to_string(&json!(configs))?)
    }

    /// 从快照恢复配置（覆盖同名 key）
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    // ==========================================
    // 类型化配置项
    // ==========================================

    /// 总资本（必须为正数）
    pub fn get_total_capital(&self) -> RepositoryResult<f64> {
        let raw = self.get_global_config_value(config_keys::TOTAL_CAPITAL)?;
        Ok(match raw {
            None => DEFAULT_TOTAL_CAPITAL,
            Some(value) => match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => v,
                _ => {
                    warn!(
                        config_key = config_keys::TOTAL_CAPITAL,
                        raw_value = %value,
                        "总资本配置无效,使用默认值"
                    );
                    DEFAULT_TOTAL_CAPITAL
                }
            },
        })
    }

    /// 评分权重配置
    pub fn get_scoring_profile(&self) -> RepositoryResult<ScoringProfile> {
        let raw = match self.get_global_config_value(config_keys::SCORING_PROFILE)? {
            Some(v) => v,
            None => return Ok(ScoringProfile::default()),
        };

        let parsed = serde_json::from_str::<ScoringProfile>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|p| p.validate().map(|_| p));

        Ok(parsed.unwrap_or_else(|reason| {
            warn!(
                config_key = config_keys::SCORING_PROFILE,
                raw_value = %raw,
                reason = %reason,
                "评分权重配置无效,使用默认权重"
            );
            ScoringProfile::default()
        }))
    }

    /// 保存评分权重配置（先校验）
    pub fn save_scoring_profile(&self, profile: &ScoringProfile) -> RepositoryResult<()> {
        profile.validate().map_err(RepositoryError::ValidationError)?;
        let raw = serde_json::to_string(profile)?;
        self.set_config_value(config_keys::SCORING_PROFILE, &raw)
    }

    /// 协同评分区间 [min, max)
    pub fn get_synergy_range(&self) -> RepositoryResult<(f64, f64)> {
        let min = self.get_f64_or(config_keys::SYNERGY_MIN, DEFAULT_SYNERGY_MIN)?;
        let max = self.get_f64_or(config_keys::SYNERGY_MAX, DEFAULT_SYNERGY_MAX)?;

        if min >= max {
            warn!(min, max, "协同评分区间无效,使用默认区间");
            return Ok((DEFAULT_SYNERGY_MIN, DEFAULT_SYNERGY_MAX));
        }
        Ok((min, max))
    }

    /// 协同评分随机种子（未配置时为 None）
    pub fn get_synergy_seed(&self) -> RepositoryResult<Option<u64>> {
        let raw = match self.get_global_config_value(config_keys::SYNERGY_SEED)? {
            Some(v) => v,
            None => return Ok(None),
        };
        match raw.trim().parse::<u64>() {
            Ok(seed) => Ok(Some(seed)),
            Err(_) => {
                warn!(
                    config_key = config_keys::SYNERGY_SEED,
                    raw_value = %raw,
                    "随机种子配置格式错误,改用系统熵"
                );
                Ok(None)
            }
        }
    }

    /// 按配置构造协同评分源
    pub fn synergy_source(&self) -> RepositoryResult<Box<dyn SynergySource>> {
        let (min, max) = self.get_synergy_range()?;
        let seed = self.get_synergy_seed()?.unwrap_or_else(rand::random::<u64>);
        Ok(Box::new(SeededSynergy::with_range(seed, min, max)))
    }

    /// 板块关键字表
    ///
    /// 配置格式为 JSON: {"Renewable Energy": ["Green", "Solar"], ...}
    pub fn get_sector_keywords(&self) -> RepositoryResult<SectorKeywordTable> {
        let raw = match self.get_global_config_value(config_keys::SECTOR_KEYWORDS)? {
            Some(v) => v,
            None => return Ok(SectorKeywordTable::default()),
        };

        Ok(
            match serde_json::from_str::<HashMap<String, Vec<String>>>(&raw) {
                Ok(map) => SectorKeywordTable::from_map(map),
                Err(_) => {
                    warn!(
                        config_key = config_keys::SECTOR_KEYWORDS,
                        raw_value = %raw,
                        "板块关键字配置格式错误,使用默认关键字表"
                    );
                    SectorKeywordTable::default()
                }
            },
        )
    }

    /// 重跑质量检查时是否延续人工处置状态（默认 true）
    pub fn get_preserve_resolutions(&self) -> RepositoryResult<bool> {
        let value = self.get_config_or_default(config_keys::QUALITY_PRESERVE_RESOLUTIONS, "true")?;
        Ok(match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => {
                warn!(
                    config_key = config_keys::QUALITY_PRESERVE_RESOLUTIONS,
                    raw_value = %other,
                    "布尔配置格式错误,使用默认值 true"
                );
                true
            }
        })
    }

    fn get_f64_or(&self, key: &str, default: f64) -> RepositoryResult<f64> {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        Ok(match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(config_key = key, raw_value = %raw, "数值配置格式错误,使用默认值");
                default
            }
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 资本
    pub const TOTAL_CAPITAL: &str = "total_capital";

    // 评分
    pub const SCORING_PROFILE: &str = "scoring_profile"; // JSON ScoringProfile
    pub const SYNERGY_MIN: &str = "synergy_min";
    pub const SYNERGY_MAX: &str = "synergy_max";
    pub const SYNERGY_SEED: &str = "synergy_seed";

    // 板块归类
    pub const SECTOR_KEYWORDS: &str = "sector_keywords"; // JSON 板块 -> 关键字

    // 数据质量
    pub const QUALITY_PRESERVE_RESOLUTIONS: &str = "quality.preserve_resolutions";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_empty() {
        let cm = manager();
        assert_eq!(cm.get_total_capital().unwrap(), DEFAULT_TOTAL_CAPITAL);
        assert_eq!(cm.get_synergy_range().unwrap(), (50.0, 80.0));
        assert_eq!(cm.get_synergy_seed().unwrap(), None);
        assert!(cm.get_preserve_resolutions().unwrap());
        assert_eq!(cm.get_scoring_profile().unwrap(), ScoringProfile::default());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let cm = manager();
        cm.set_config_value(config_keys::TOTAL_CAPITAL, "-5").unwrap();
        cm.set_config_value(config_keys::SYNERGY_MIN, "90").unwrap();
        cm.set_config_value(config_keys::SCORING_PROFILE, "{bad").unwrap();
        cm.set_config_value(config_keys::SECTOR_KEYWORDS, "[]").unwrap();

        assert_eq!(cm.get_total_capital().unwrap(), DEFAULT_TOTAL_CAPITAL);
        assert_eq!(cm.get_synergy_range().unwrap(), (50.0, 80.0));
        assert_eq!(cm.get_scoring_profile().unwrap(), ScoringProfile::default());
        assert_eq!(
            cm.get_sector_keywords().unwrap(),
            SectorKeywordTable::default()
        );
    }

    #[test]
    fn test_snapshot_restore() {
        let cm = manager();
        cm.set_config_value(config_keys::SYNERGY_SEED, "42").unwrap();
        let snapshot = cm.get_config_snapshot().unwrap();

        cm.set_config_value(config_keys::SYNERGY_SEED, "7").unwrap();
        assert_eq!(cm.get_synergy_seed().unwrap(), Some(7));

        assert_eq!(cm.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(cm.get_synergy_seed().unwrap(), Some(42));
    }

    #[test]
    fn test_save_scoring_profile_validates() {
        let cm = manager();
        let mut profile = ScoringProfile::default();
        profile.weights.strategic = 0.9;
        assert!(matches!(
            cm.save_scoring_profile(&profile),
            Err(RepositoryError::ValidationError(_))
        ));
    }
}
