// ==========================================
// 多门店排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::schedule_config_trait::ScheduleConfigReader;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 支持的报表语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 删除 global scope 配置（恢复默认值）
    pub fn clear_config_value(&self, key: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 排班生成日志中记录当次生效配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// ScheduleConfigReader Trait 实现
// ==========================================
impl ScheduleConfigReader for ConfigManager {
    fn get_weekend_overrides_off_day(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::WEEKEND_OVERRIDES_OFF_DAY, "true")?;
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = config_keys::WEEKEND_OVERRIDES_OFF_DAY,
                    raw_value = %value,
                    "配置格式错误，使用默认值 true"
                );
                Ok(true)
            }
        }
    }

    fn get_tie_break_seed(&self) -> Result<Option<u64>, Box<dyn Error>> {
        let value = match self.get_config_value(config_keys::TIE_BREAK_SEED)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(None),
        };
        match value.trim().parse::<u64>() {
            Ok(seed) => Ok(Some(seed)),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::TIE_BREAK_SEED,
                    raw_value = %value,
                    "随机种子配置格式错误，忽略"
                );
                Ok(None)
            }
        }
    }

    fn get_report_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::REPORT_LOCALE, "zh-CN")?;
        let value = value.trim();
        if SUPPORTED_LOCALES.contains(&value) {
            Ok(value.to_string())
        } else {
            Ok("zh-CN".to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排班引擎
    pub const WEEKEND_OVERRIDES_OFF_DAY: &str = "weekend_overrides_off_day";
    pub const TIE_BREAK_SEED: &str = "tie_break_seed";

    // 报表
    pub const REPORT_LOCALE: &str = "report_locale";
}
