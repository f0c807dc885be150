// ==========================================
// 多门店排班系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{RosterApi, ScheduleApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::RosterRepositories;
use crate::perf::install_sqlite_tracing;

/// 应用状态
///
/// 所有仓储与API共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 基础档案API
    pub roster_api: Arc<RosterApi>,

    /// 排班API
    pub schedule_api: Arc<ScheduleApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 为内存库）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开连接并应用统一 PRAGMA
    /// 2. 建表（幂等）
    /// 3. 创建所有Repository与API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        install_sqlite_tracing(&mut conn);
        ensure_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let repos = Arc::new(RosterRepositories::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let roster_api = Arc::new(RosterApi::new(
            repos.employee_repo.clone(),
            repos.location_repo.clone(),
            repos.holiday_repo.clone(),
            repos.off_day_repo.clone(),
        ));
        let schedule_api = Arc::new(ScheduleApi::new(repos, config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            roster_api,
            schedule_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 SHIFT_ROSTER_DB
/// 2. 用户数据目录/shift-roster/shift_roster.db
/// 3. ./shift_roster.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("SHIFT_ROSTER_DB") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./shift_roster.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("shift-roster");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("shift_roster.db");
        }
    }

    path.to_string_lossy().to_string()
}
