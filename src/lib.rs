// ==========================================
// 多门店排班系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 月度排班生成 + 报表导出（人工最终确认）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排班规则
pub mod engine;

// 报表层 - XLSX / CSV 导出
pub mod report;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Gender, ShiftKind};

// 领域实体
pub use domain::{Employee, Holiday, Location, OffDay, ScheduleEntry, ScheduleRow, SchedulePeriod};

// 引擎
pub use engine::{
    AvailabilityIndex, GenerationReport, ScheduleGenerator, ShiftAssignmentEngine, UnfilledSlot,
};

// 报表
pub use report::{ScheduleReport, XlsxReportRenderer};

// API
pub use api::{RosterApi, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "多门店排班系统";
