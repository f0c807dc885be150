// ==========================================
// 多门店排班系统 - 排班生成器
// ==========================================
// 用途: 协调一次整月排班生成的完整流程
//   1) 校验周期与前置条件（无写入）
//   2) 从记录存储构建可用性索引
//   3) 调用班次分配引擎
//   4) 单事务批量落库
// ==========================================
// 红线: 前置条件失败时不产生任何写入
// 红线: 批量写入失败时整体失败,不留部分数据
// ==========================================

use crate::config::ScheduleConfigReader;
use crate::domain::calendar::SchedulePeriod;
use crate::domain::staff::Location;
use crate::engine::assignment::{ShiftAssignmentEngine, UnfilledSlot};
use crate::engine::availability::AvailabilityIndex;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::repositories::RosterStore;
use crate::perf::PerfGuard;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// GenerationReport - 生成结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub month: u32,
    pub year: i32,
    /// 新建并落库的排班记录数
    pub created: usize,
    /// 重新生成时被替换掉的旧排班条数
    pub replaced: usize,
    /// 需求班次总数
    pub requested_slots: usize,
    /// 未填充班次（同时以 warn 级别记录日志）
    pub unfilled: Vec<UnfilledSlot>,
    pub skipped_holidays: Vec<NaiveDate>,
    /// 实际参与排班的门店ID（按调用方顺序）
    pub location_ids: Vec<String>,
}

impl GenerationReport {
    pub fn unfilled_count(&self) -> usize {
        self.unfilled.len()
    }

    /// 所有需求班次是否均已填充
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }
}

// ==========================================
// ScheduleGenerator - 排班生成器
// ==========================================
pub struct ScheduleGenerator<S, C>
where
    S: RosterStore,
    C: ScheduleConfigReader,
{
    store: Arc<S>,
    config: Arc<C>,
    seed_override: Option<u64>,
}

impl<S, C> ScheduleGenerator<S, C>
where
    S: RosterStore,
    C: ScheduleConfigReader,
{
    /// 创建生成器
    ///
    /// # 参数
    /// - store: 记录存储
    /// - config: 配置读取器（周末覆盖开关、随机种子）
    pub fn new(store: Arc<S>, config: Arc<C>) -> Self {
        Self {
            store,
            config,
            seed_override: None,
        }
    }

    /// 固定随机种子,优先于配置中的 tie_break_seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_override = Some(seed);
        self
    }

    /// 生成整月排班并追加落库
    ///
    /// 已持久化的当月排班视为“已排班”,不会被改动
    ///
    /// # 参数
    /// - month: 1..=12
    /// - year: 年份
    /// - locations: 选中门店（停用门店剔除,重复门店只排一次）
    ///
    /// # 返回
    /// - Ok(GenerationReport): 新建记录数 + 需求班次数 + 未填充班次
    /// - Err(EngineError::InvalidPeriod): 月份非法
    /// - Err(EngineError::InvalidInput): 无在职员工 / 无可用门店
    pub fn generate(
        &self,
        month: u32,
        year: i32,
        locations: &[Location],
    ) -> EngineResult<GenerationReport> {
        self.run(month, year, locations, WriteMode::Append)
    }

    /// 重新生成整月排班,整体替换当月已有排班
    ///
    /// 旧排班的删除与新排班的写入在同一事务内完成;
    /// 前置条件或写入失败时旧排班保持原样
    pub fn regenerate(
        &self,
        month: u32,
        year: i32,
        locations: &[Location],
    ) -> EngineResult<GenerationReport> {
        self.run(month, year, locations, WriteMode::Replace)
    }

    fn run(
        &self,
        month: u32,
        year: i32,
        locations: &[Location],
        mode: WriteMode,
    ) -> EngineResult<GenerationReport> {
        let _perf = PerfGuard::new("engine.generate_month");

        let period = SchedulePeriod::new(month, year)
            .ok_or(EngineError::InvalidPeriod { month, year })?;

        // ===== 前置条件 =====
        if locations.is_empty() {
            return Err(EngineError::InvalidInput("未选择任何门店".to_string()));
        }

        let selected = select_locations(locations);
        if selected.is_empty() {
            return Err(EngineError::InvalidInput("选中的门店均已停用".to_string()));
        }

        let employees = self.store.active_employees()?;
        if employees.is_empty() {
            return Err(EngineError::InvalidInput("没有在职员工".to_string()));
        }

        // ===== 配置 =====
        let weekend_override = self
            .config
            .get_weekend_overrides_off_day()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        let seed = match self.seed_override {
            Some(seed) => Some(seed),
            None => self
                .config
                .get_tie_break_seed()
                .map_err(|e| EngineError::Config(e.to_string()))?,
        };

        info!(
            month,
            year,
            employees_count = employees.len(),
            locations_count = selected.len(),
            seeded = seed.is_some(),
            replace = matches!(mode, WriteMode::Replace),
            "开始生成月度排班"
        );

        // ===== 可用性索引（任何写入之前读取） =====
        // 替换模式下当月旧排班将被整体删除,不计入已排班
        let booked = match mode {
            WriteMode::Append => self.store.booked_pairs(&period)?,
            WriteMode::Replace => HashSet::new(),
        };
        let mut index = AvailabilityIndex::new(
            self.store.holiday_dates(&period)?,
            self.store.off_days_by_employee(&period)?,
            booked,
        )
        .with_weekend_override(weekend_override);
        debug!(
            holidays = index.holiday_count(),
            booked = index.booked_count(),
            "可用性索引已构建"
        );

        // ===== 分配 =====
        let mut engine = match seed {
            Some(seed) => ShiftAssignmentEngine::with_seed(seed),
            None => ShiftAssignmentEngine::new(),
        };
        let outcome = engine.assign_month(&period, &employees, &selected, &mut index);

        // ===== 落库 =====
        let (replaced, created) = match mode {
            WriteMode::Append if outcome.entries.is_empty() => (0, 0),
            WriteMode::Append => (0, self.store.save_entries(&outcome.entries)?),
            WriteMode::Replace => self.store.replace_entries(&period, &outcome.entries)?,
        };

        info!(
            month,
            year,
            created,
            replaced,
            requested_slots = outcome.requested_slots,
            unfilled = outcome.unfilled.len(),
            holidays = outcome.skipped_holidays.len(),
            "月度排班生成完成"
        );

        Ok(GenerationReport {
            month,
            year,
            created,
            replaced,
            requested_slots: outcome.requested_slots,
            unfilled: outcome.unfilled,
            skipped_holidays: outcome.skipped_holidays,
            location_ids: selected.into_iter().map(|l| l.location_id).collect(),
        })
    }
}

/// 落库方式
#[derive(Debug, Clone, Copy)]
enum WriteMode {
    /// 追加,保留当月已有排班
    Append,
    /// 同一事务内替换当月全部排班
    Replace,
}

/// 剔除停用门店与重复门店,保持调用方顺序
fn select_locations(locations: &[Location]) -> Vec<Location> {
    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(locations.len());
    for location in locations {
        if !location.is_active {
            warn!(location_id = %location.location_id, location = %location.label(), "门店已停用，跳过");
        } else if !seen.insert(location.location_id.as_str()) {
            warn!(location_id = %location.location_id, "门店重复选择，只排一次");
        } else {
            selected.push(location.clone());
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::db::open_in_memory;
    use crate::domain::calendar::{Holiday, OffDay};
    use crate::domain::schedule::ScheduleEntry;
    use crate::domain::staff::Employee;
    use crate::domain::types::{Gender, ShiftKind};
    use crate::engine::repositories::RosterRepositories;
    use crate::repository::RepositoryResult;
    use chrono::NaiveDate;
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    struct Fixture {
        repos: Arc<RosterRepositories>,
        config: Arc<ConfigManager>,
        location: Location,
    }

    fn setup(employees: &[(&str, Gender)]) -> (Fixture, Vec<Employee>) {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        let repos = Arc::new(RosterRepositories::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn));

        let mut created = Vec::new();
        for (name, gender) in employees {
            let e = Employee::new(name, *gender);
            repos.employee_repo.insert(&e).unwrap();
            created.push(e);
        }
        let location = Location::new("Downtown", "1 Main St", Some("Central Mall"));
        repos.location_repo.insert(&location).unwrap();

        (
            Fixture {
                repos,
                config,
                location,
            },
            created,
        )
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_generate_persists_entries() {
        let (fx, _) = setup(&[
            ("Alice", Gender::Female),
            ("Bob", Gender::Male),
            ("Carol", Gender::Female),
            ("Dan", Gender::Male),
        ]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(3);

        let report = generator.generate(2, 2026, &[fx.location.clone()]).unwrap();
        assert_eq!(report.requested_slots, 28 * 3);
        assert_eq!(report.created, 28 * 3);
        assert!(report.is_complete());

        let period = SchedulePeriod::new(2, 2026).unwrap();
        assert_eq!(fx.repos.schedule_repo.count_for_period(&period).unwrap(), 84);
    }

    #[test]
    fn test_generate_invalid_inputs_write_nothing() {
        let (fx, _) = setup(&[]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone());

        // 无在职员工
        let err = generator.generate(3, 2026, &[fx.location.clone()]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        // 未选择门店
        let err = generator.generate(3, 2026, &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        // 非法月份
        let err = generator.generate(13, 2026, &[fx.location.clone()]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod { month: 13, .. }));

        let period = SchedulePeriod::new(3, 2026).unwrap();
        assert_eq!(fx.repos.schedule_repo.count_for_period(&period).unwrap(), 0);
    }

    #[test]
    fn test_inactive_locations_dropped() {
        let (fx, _) = setup(&[("Alice", Gender::Female)]);
        let mut closed = Location::new("Closed", "9 Side St", None);
        closed.is_active = false;

        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(1);
        let err = generator.generate(3, 2026, &[closed.clone()]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let report = generator
            .generate(3, 2026, &[closed, fx.location.clone()])
            .unwrap();
        assert_eq!(report.location_ids, vec![fx.location.location_id.clone()]);
        assert_eq!(report.requested_slots, 31 * 3);
    }

    #[test]
    fn test_holidays_and_off_days_respected() {
        let (fx, staff) = setup(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        // 2026-10-13 周二; 2026-10-17 周六
        fx.repos
            .holiday_repo
            .insert(&Holiday::new("Founders Day", d(2026, 10, 5), false))
            .unwrap();
        let alice = &staff[0];
        for day in [13, 17] {
            fx.repos
                .off_day_repo
                .insert(&OffDay::new(&alice.employee_id, d(2026, 10, day), None))
                .unwrap();
        }

        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(11);
        let report = generator.generate(10, 2026, &[fx.location.clone()]).unwrap();
        assert_eq!(report.skipped_holidays, vec![d(2026, 10, 5)]);
        assert_eq!(report.requested_slots, 30 * 3);

        let period = SchedulePeriod::new(10, 2026).unwrap();
        let entries = fx.repos.schedule_repo.entries_for_period(&period).unwrap();
        assert!(entries.iter().all(|e| e.date != d(2026, 10, 5)));
        assert!(!entries
            .iter()
            .any(|e| e.employee_id == alice.employee_id && e.date == d(2026, 10, 13)));
        assert!(entries
            .iter()
            .any(|e| e.employee_id == alice.employee_id && e.date == d(2026, 10, 17)));
    }

    #[test]
    fn test_weekend_override_can_be_disabled() {
        let (fx, staff) = setup(&[("Alice", Gender::Female)]);
        let alice = &staff[0];
        fx.repos
            .off_day_repo
            .insert(&OffDay::new(&alice.employee_id, d(2026, 10, 17), None))
            .unwrap();
        fx.config
            .set_config_value(crate::config::config_keys::WEEKEND_OVERRIDES_OFF_DAY, "false")
            .unwrap();

        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(2);
        generator.generate(10, 2026, &[fx.location.clone()]).unwrap();

        let period = SchedulePeriod::new(10, 2026).unwrap();
        let entries = fx.repos.schedule_repo.entries_for_period(&period).unwrap();
        assert!(!entries.iter().any(|e| e.date == d(2026, 10, 17)));
    }

    #[test]
    fn test_second_run_sees_persisted_bookings() {
        let (fx, _) = setup(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(5);

        let first = generator.generate(10, 2026, &[fx.location.clone()]).unwrap();
        assert_eq!(first.created, 31 * 2);

        // 未清空即重跑: 所有员工当日均已排班
        let second = generator.generate(10, 2026, &[fx.location.clone()]).unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.unfilled_count(), 31 * 3);
    }

    // 写入失败的存储: 验证批量写入错误整体上抛
    struct FailingStore {
        inner: RosterRepositories,
    }

    impl RosterStore for FailingStore {
        fn active_employees(&self) -> RepositoryResult<Vec<Employee>> {
            self.inner.active_employees()
        }

        fn holiday_dates(&self, period: &SchedulePeriod) -> RepositoryResult<BTreeSet<NaiveDate>> {
            self.inner.holiday_dates(period)
        }

        fn off_days_by_employee(
            &self,
            period: &SchedulePeriod,
        ) -> RepositoryResult<HashMap<String, HashSet<NaiveDate>>> {
            self.inner.off_days_by_employee(period)
        }

        fn booked_pairs(
            &self,
            period: &SchedulePeriod,
        ) -> RepositoryResult<HashSet<(String, NaiveDate)>> {
            self.inner.booked_pairs(period)
        }

        fn save_entries(&self, _entries: &[ScheduleEntry]) -> RepositoryResult<usize> {
            Err(crate::repository::RepositoryError::DatabaseTransactionError(
                "disk full".to_string(),
            ))
        }

        fn replace_entries(
            &self,
            _period: &SchedulePeriod,
            _entries: &[ScheduleEntry],
        ) -> RepositoryResult<(usize, usize)> {
            Err(crate::repository::RepositoryError::DatabaseTransactionError(
                "disk full".to_string(),
            ))
        }
    }

    #[test]
    fn test_save_failure_is_hard_error() {
        let (fx, _) = setup(&[("Alice", Gender::Female)]);
        let store = Arc::new(FailingStore {
            inner: (*fx.repos).clone(),
        });
        let generator = ScheduleGenerator::new(store, fx.config.clone()).with_seed(1);

        let err = generator.generate(10, 2026, &[fx.location.clone()]).unwrap_err();
        assert!(matches!(err, EngineError::Repository(_)));
    }

    #[test]
    fn test_failed_regenerate_keeps_previous_roster() {
        let (fx, _) = setup(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(4);
        generator.generate(10, 2026, &[fx.location.clone()]).unwrap();

        let store = Arc::new(FailingStore {
            inner: (*fx.repos).clone(),
        });
        let failing = ScheduleGenerator::new(store, fx.config.clone()).with_seed(4);
        let err = failing.regenerate(10, 2026, &[fx.location.clone()]).unwrap_err();
        assert!(matches!(err, EngineError::Repository(_)));

        let period = SchedulePeriod::new(10, 2026).unwrap();
        assert_eq!(fx.repos.schedule_repo.count_for_period(&period).unwrap(), 31 * 2);
    }

    #[test]
    fn test_regenerate_replaces_month() {
        let (fx, _) = setup(&[("Alice", Gender::Female), ("Bob", Gender::Male)]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(8);

        let first = generator.generate(10, 2026, &[fx.location.clone()]).unwrap();
        assert_eq!(first.replaced, 0);

        // 旧排班不计入已排班,整月重新填满
        let second = generator.regenerate(10, 2026, &[fx.location.clone()]).unwrap();
        assert_eq!(second.replaced, 31 * 2);
        assert_eq!(second.created, 31 * 2);

        let period = SchedulePeriod::new(10, 2026).unwrap();
        assert_eq!(fx.repos.schedule_repo.count_for_period(&period).unwrap(), 31 * 2);
    }

    #[test]
    fn test_duplicate_locations_scheduled_once() {
        let (fx, _) = setup(&[
            ("Alice", Gender::Female),
            ("Bob", Gender::Male),
            ("Carol", Gender::Female),
            ("Dan", Gender::Male),
            ("Eve", Gender::Female),
            ("Finn", Gender::Male),
        ]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(6);

        let report = generator
            .generate(10, 2026, &[fx.location.clone(), fx.location.clone()])
            .unwrap();
        assert_eq!(report.location_ids, vec![fx.location.location_id.clone()]);
        assert_eq!(report.requested_slots, 31 * 3);
        assert_eq!(report.created, 31 * 3);

        // 每个 (日期, 门店, 班次) 只有一人
        let period = SchedulePeriod::new(10, 2026).unwrap();
        let entries = fx.repos.schedule_repo.entries_for_period(&period).unwrap();
        let slots: HashSet<(NaiveDate, String, ShiftKind)> = entries
            .iter()
            .map(|e| (e.date, e.location_id.clone(), e.shift))
            .collect();
        assert_eq!(slots.len(), entries.len());
    }

    #[test]
    fn test_evening_goes_to_free_male() {
        let (fx, staff) = setup(&[
            ("Alice", Gender::Female),
            ("Bob", Gender::Male),
            ("Carol", Gender::Female),
        ]);
        let generator = ScheduleGenerator::new(fx.repos.clone(), fx.config.clone()).with_seed(9);
        let report = generator.generate(10, 2026, &[fx.location.clone()]).unwrap();
        assert!(report.is_complete());

        let period = SchedulePeriod::new(10, 2026).unwrap();
        let entries = fx.repos.schedule_repo.entries_for_period(&period).unwrap();
        let bob = &staff[1];
        // 女性只有在 Bob 当天已被占用时才会排到晚班
        for evening in entries.iter().filter(|e| e.shift == ShiftKind::Evening) {
            if evening.employee_id != bob.employee_id {
                assert!(entries.iter().any(|e| e.employee_id == bob.employee_id
                    && e.date == evening.date
                    && e.shift != ShiftKind::Evening));
            }
        }
    }
}
