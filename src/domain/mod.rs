// ==========================================
// 多门店排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与封闭类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calendar;
pub mod schedule;
pub mod staff;
pub mod types;

// 重导出核心类型
pub use calendar::{is_weekend, Holiday, OffDay, SchedulePeriod};
pub use schedule::{ScheduleEntry, ScheduleRow};
pub use staff::{location_label, Employee, Location};
pub use types::{Gender, ShiftKind};
