// ==========================================
// 多门店排班系统 - 引擎层
// ==========================================
// 职责: 实现排班规则,不拼 SQL
// 红线: Engine 不拼 SQL, 只通过 RosterStore 访问记录存储
// ==========================================

pub mod assignment;
pub mod availability;
pub mod error;
pub mod generator;
pub mod preference;
pub mod repositories;

// 重导出核心引擎
pub use assignment::{AssignmentOutcome, ShiftAssignmentEngine, UnfilledSlot};
pub use availability::AvailabilityIndex;
pub use error::{EngineError, EngineResult};
pub use generator::{GenerationReport, ScheduleGenerator};
pub use preference::{FemaleDaytimePreference, NoPreference, ShiftPreferencePolicy};
pub use repositories::{RosterRepositories, RosterStore};
