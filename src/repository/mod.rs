// ==========================================
// 多门店排班系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod employee_repo;
pub mod error;
pub mod holiday_repo;
pub mod location_repo;
pub mod off_day_repo;
pub mod schedule_repo;

// 重导出核心仓储
pub use employee_repo::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use holiday_repo::HolidayRepository;
pub use location_repo::LocationRepository;
pub use off_day_repo::OffDayRepository;
pub use schedule_repo::ScheduleRepository;

use rusqlite::types::Type;
use std::str::FromStr;

/// 将文本列解析为封闭枚举（性别、班次）
///
/// 解析失败时返回 FromSqlConversionFailure,携带列序号
pub(crate) fn parse_text_enum<T>(column: usize, raw: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|msg| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, msg.into()))
}
