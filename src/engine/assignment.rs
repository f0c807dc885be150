// ==========================================
// 多门店排班系统 - 班次分配引擎
// ==========================================
// 红线: 同一员工同一天最多一个班次（跨门店、跨班次、跨运行）
// 红线: 节假日整天不排班
// 红线: 无人可排的班次留空并告警,不中断整体运行
// ==========================================
// 职责: 按 日 → 门店 → 班次 的顺序贪心分配,不回溯
// 输入: 在职员工 + 选中门店 + 可用性索引
// 输出: 排班记录列表 + 未填充班次列表
// ==========================================

use crate::domain::calendar::SchedulePeriod;
use crate::domain::schedule::ScheduleEntry;
use crate::domain::staff::{Employee, Location};
use crate::domain::types::ShiftKind;
use crate::engine::availability::AvailabilityIndex;
use crate::engine::preference::{FemaleDaytimePreference, ShiftPreferencePolicy};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

// ==========================================
// UnfilledSlot - 未填充班次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnfilledSlot {
    pub date: NaiveDate,
    pub location_id: String,
    pub location_label: String,
    pub shift: ShiftKind,
}

// ==========================================
// AssignmentOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AssignmentOutcome {
    /// 新建排班记录（按 日 → 门店 → 班次 顺序）
    pub entries: Vec<ScheduleEntry>,
    /// 无合格候选人的班次
    pub unfilled: Vec<UnfilledSlot>,
    /// 需求班次总数（非节假日天数 × 门店数 × 3）
    pub requested_slots: usize,
    /// 跳过的节假日
    pub skipped_holidays: Vec<NaiveDate>,
    /// 本次运行每位员工的班次数
    pub shifts_per_employee: HashMap<String, u32>,
}

/// 候选人排序键: (偏好惩罚, 本次运行已排班次数, 随机数)
#[derive(Debug, Clone, Copy)]
struct CandidateKey {
    penalty: u8,
    load: u32,
    draw: f64,
}

impl CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.penalty
            .cmp(&other.penalty)
            .then(self.load.cmp(&other.load))
            .then(self.draw.total_cmp(&other.draw))
    }
}

// ==========================================
// ShiftAssignmentEngine - 班次分配引擎
// ==========================================
pub struct ShiftAssignmentEngine<P = FemaleDaytimePreference> {
    policy: P,
    rng: StdRng,
}

impl ShiftAssignmentEngine<FemaleDaytimePreference> {
    /// 默认策略 + 新熵源（每次调用结果可不同）
    pub fn new() -> Self {
        Self::with_policy(FemaleDaytimePreference, StdRng::from_entropy())
    }

    /// 默认策略 + 固定种子（可复现,测试用）
    pub fn with_seed(seed: u64) -> Self {
        Self::with_policy(FemaleDaytimePreference, StdRng::seed_from_u64(seed))
    }
}

impl Default for ShiftAssignmentEngine<FemaleDaytimePreference> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ShiftPreferencePolicy> ShiftAssignmentEngine<P> {
    /// 指定偏好策略与随机源
    pub fn with_policy(policy: P, rng: StdRng) -> Self {
        Self { policy, rng }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成整月排班（纯计算,不落库）
    ///
    /// 规则:
    /// 1) 逐日遍历,节假日整天跳过
    /// 2) 每天重置“当日已分配”集合
    /// 3) 门店按调用方顺序,班次按固定声明顺序
    /// 4) 每个班次选一名合格员工,无人合格则留空
    ///
    /// # 参数
    /// - `period`: 排班周期
    /// - `employees`: 员工列表（停用员工会被忽略）
    /// - `locations`: 选中门店（按此顺序分配）
    /// - `index`: 可用性索引（运行中更新已排班集合）
    #[instrument(skip(self, employees, locations, index), fields(
        year = period.year(),
        month = period.month(),
        employees_count = employees.len(),
        locations_count = locations.len()
    ))]
    pub fn assign_month(
        &mut self,
        period: &SchedulePeriod,
        employees: &[Employee],
        locations: &[Location],
        index: &mut AvailabilityIndex,
    ) -> AssignmentOutcome {
        let roster: Vec<&Employee> = employees.iter().filter(|e| e.is_active).collect();
        let mut outcome = AssignmentOutcome::default();

        for date in period.days() {
            if index.is_holiday(date) {
                debug!(date = %date, "节假日，跳过");
                outcome.skipped_holidays.push(date);
                continue;
            }

            let mut assigned_today: HashSet<&str> = HashSet::new();

            for location in locations {
                for shift in ShiftKind::ALL {
                    outcome.requested_slots += 1;

                    let chosen = self.select_candidate(
                        date,
                        shift,
                        &roster,
                        &assigned_today,
                        &outcome.shifts_per_employee,
                        index,
                    );

                    match chosen {
                        Some(employee) => {
                            *outcome
                                .shifts_per_employee
                                .entry(employee.employee_id.clone())
                                .or_insert(0) += 1;
                            assigned_today.insert(employee.employee_id.as_str());
                            index.mark_booked(&employee.employee_id, date);
                            outcome.entries.push(ScheduleEntry::new(
                                &employee.employee_id,
                                &location.location_id,
                                date,
                                shift,
                            ));
                        }
                        None => {
                            warn!(
                                date = %date,
                                location = %location.label(),
                                shift = %shift,
                                "无可用员工，班次留空"
                            );
                            outcome.unfilled.push(UnfilledSlot {
                                date,
                                location_id: location.location_id.clone(),
                                location_label: location.label(),
                                shift,
                            });
                        }
                    }
                }
            }
        }

        outcome
    }

    /// 为单个班次挑选员工
    ///
    /// 过滤: 非个人休息日 + 未持久化排班 + 当日未分配
    /// 排序: 偏好惩罚升序 → 本次运行班次数升序 → 随机数升序
    fn select_candidate<'a>(
        &mut self,
        date: NaiveDate,
        shift: ShiftKind,
        roster: &[&'a Employee],
        assigned_today: &HashSet<&str>,
        shift_counts: &HashMap<String, u32>,
        index: &AvailabilityIndex,
    ) -> Option<&'a Employee> {
        let mut best: Option<(CandidateKey, &'a Employee)> = None;

        for &employee in roster {
            let id = employee.employee_id.as_str();
            if index.is_unavailable(id, date)
                || index.is_already_booked(id, date)
                || assigned_today.contains(id)
            {
                continue;
            }

            let key = CandidateKey {
                penalty: self.policy.weight(employee.gender, shift),
                load: shift_counts.get(id).copied().unwrap_or(0),
                draw: self.rng.gen::<f64>(),
            };

            let better = match &best {
                Some((best_key, _)) => key.cmp(best_key) == Ordering::Less,
                None => true,
            };
            if better {
                best = Some((key, employee));
            }
        }

        best.map(|(_, employee)| employee)
    }
}
