// ==========================================
// 多门店排班系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行与上层应用调用
// ==========================================

pub mod error;
pub mod roster_api;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use roster_api::{EmployeeInput, LocationInput, RosterApi};
pub use schedule_api::{ExportedFile, ScheduleApi};
