// ==========================================
// 多门店排班系统 - 引擎层仓储聚合
// ==========================================
// 职责: 定义排班生成所需的记录存储接口,并以 SQLite 仓储实现
// 红线: 引擎不拼 SQL,只通过 RosterStore 读写
// ==========================================

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::domain::calendar::SchedulePeriod;
use crate::domain::schedule::ScheduleEntry;
use crate::domain::staff::Employee;
use crate::repository::{
    EmployeeRepository, HolidayRepository, LocationRepository, OffDayRepository,
    RepositoryResult, ScheduleRepository,
};

// ==========================================
// RosterStore Trait - 记录存储接口
// ==========================================
// 用途: 排班生成器的外部协作者（只读 + 一次批量写入）
pub trait RosterStore {
    /// 在职员工列表
    fn active_employees(&self) -> RepositoryResult<Vec<Employee>>;

    /// 目标月份已解析的节假日日期
    fn holiday_dates(&self, period: &SchedulePeriod) -> RepositoryResult<BTreeSet<NaiveDate>>;

    /// 目标月份个人休息日（员工ID → 日期集合）
    fn off_days_by_employee(
        &self,
        period: &SchedulePeriod,
    ) -> RepositoryResult<HashMap<String, HashSet<NaiveDate>>>;

    /// 目标月份已持久化的 (员工ID, 日期) 排班对
    fn booked_pairs(&self, period: &SchedulePeriod) -> RepositoryResult<HashSet<(String, NaiveDate)>>;

    /// 批量写入排班记录（全部成功或全部失败）
    fn save_entries(&self, entries: &[ScheduleEntry]) -> RepositoryResult<usize>;

    /// 清空目标月份并写入新排班（同一事务）
    ///
    /// 返回 (删除条数, 写入条数); 失败时原有排班保持不变
    fn replace_entries(
        &self,
        period: &SchedulePeriod,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<(usize, usize)>;
}

/// 排班仓储集合
///
/// 聚合排班生成与管理所需的所有 Repository,简化依赖注入。
///
/// # 包含的仓储
/// - `employee_repo`: 员工
/// - `location_repo`: 门店
/// - `holiday_repo`: 节假日
/// - `off_day_repo`: 个人休息日
/// - `schedule_repo`: 排班记录
#[derive(Clone)]
pub struct RosterRepositories {
    pub employee_repo: Arc<EmployeeRepository>,
    pub location_repo: Arc<LocationRepository>,
    pub holiday_repo: Arc<HolidayRepository>,
    pub off_day_repo: Arc<OffDayRepository>,
    pub schedule_repo: Arc<ScheduleRepository>,
}

impl RosterRepositories {
    /// 基于共享连接创建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            employee_repo: Arc::new(EmployeeRepository::new(conn.clone())),
            location_repo: Arc::new(LocationRepository::new(conn.clone())),
            holiday_repo: Arc::new(HolidayRepository::new(conn.clone())),
            off_day_repo: Arc::new(OffDayRepository::new(conn.clone())),
            schedule_repo: Arc::new(ScheduleRepository::new(conn)),
        }
    }
}

impl RosterStore for RosterRepositories {
    fn active_employees(&self) -> RepositoryResult<Vec<Employee>> {
        self.employee_repo.list_active()
    }

    fn holiday_dates(&self, period: &SchedulePeriod) -> RepositoryResult<BTreeSet<NaiveDate>> {
        self.holiday_repo.dates_for_period(period)
    }

    fn off_days_by_employee(
        &self,
        period: &SchedulePeriod,
    ) -> RepositoryResult<HashMap<String, HashSet<NaiveDate>>> {
        self.off_day_repo.dates_by_employee(period)
    }

    fn booked_pairs(&self, period: &SchedulePeriod) -> RepositoryResult<HashSet<(String, NaiveDate)>> {
        self.schedule_repo.booked_pairs(period)
    }

    fn save_entries(&self, entries: &[ScheduleEntry]) -> RepositoryResult<usize> {
        self.schedule_repo.insert_batch(entries)
    }

    fn replace_entries(
        &self,
        period: &SchedulePeriod,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<(usize, usize)> {
        self.schedule_repo.replace_period(period, entries)
    }
}
