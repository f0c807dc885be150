// ==========================================
// 多门店排班系统 - 可用性索引
// ==========================================
// 职责: 每次生成前一次性构建,回答三个问题
//   1) 某日是否节假日
//   2) 某员工某日是否不可用（个人休息日,周末覆盖）
//   3) 某员工某日是否已排班（持久化 + 本次运行已分配）
// ==========================================
// 红线: “已排班”集合在任何写入之前从存储读取,运行中只在内存更新
// ==========================================

use crate::domain::calendar::is_weekend;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

// ==========================================
// AvailabilityIndex - 可用性索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    holidays: HashSet<NaiveDate>,
    off_days: HashMap<String, HashSet<NaiveDate>>,
    booked: HashSet<(String, NaiveDate)>,
    weekend_overrides_off_day: bool,
}

impl AvailabilityIndex {
    /// 构建可用性索引
    ///
    /// # 参数
    /// - holidays: 目标月份已解析的节假日日期
    /// - off_days: 员工ID → 个人休息日集合
    /// - booked: 已持久化的 (员工ID, 日期) 排班对
    pub fn new(
        holidays: impl IntoIterator<Item = NaiveDate>,
        off_days: HashMap<String, HashSet<NaiveDate>>,
        booked: HashSet<(String, NaiveDate)>,
    ) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            off_days,
            booked,
            weekend_overrides_off_day: true,
        }
    }

    /// 设置周末是否覆盖个人休息日（默认 true）
    pub fn with_weekend_override(mut self, enabled: bool) -> Self {
        self.weekend_overrides_off_day = enabled;
        self
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// 员工当日是否因个人休息日不可用
    ///
    /// 周末忽略个人休息日：休息日只屏蔽工作日排班
    pub fn is_unavailable(&self, employee_id: &str, date: NaiveDate) -> bool {
        if self.weekend_overrides_off_day && is_weekend(date) {
            return false;
        }
        self.off_days
            .get(employee_id)
            .map(|dates| dates.contains(&date))
            .unwrap_or(false)
    }

    pub fn is_already_booked(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.booked.contains(&(employee_id.to_string(), date))
    }

    /// 记录本次运行新分配的班次
    pub fn mark_booked(&mut self, employee_id: &str, date: NaiveDate) {
        self.booked.insert((employee_id.to_string(), date));
    }

    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }

    pub fn booked_count(&self) -> usize {
        self.booked.len()
    }
}
