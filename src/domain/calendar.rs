// ==========================================
// 多门店排班系统 - 日历领域模型
// ==========================================
// 包含: 节假日、员工个人休息日、排班周期（自然月）
// ==========================================

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ==========================================
// Holiday - 节假日
// ==========================================
// 节假日当天所有门店均不排班
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub holiday_id: String,
    pub name: String,
    pub date: NaiveDate,
    /// 每年同月同日重复
    pub is_recurring: bool,
}

impl Holiday {
    pub fn new(name: &str, date: NaiveDate, is_recurring: bool) -> Self {
        Self {
            holiday_id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            date,
            is_recurring,
        }
    }

    /// 将节假日解析到目标周期内的具体日期
    ///
    /// - 非重复节假日: 仅当日期落在周期内时返回
    /// - 重复节假日: 取目标年份的同月同日（2月29日仅闰年有效）
    pub fn resolve_in(&self, period: &SchedulePeriod) -> Option<NaiveDate> {
        if self.is_recurring {
            if self.date.month() != period.month() {
                return None;
            }
            NaiveDate::from_ymd_opt(period.year(), period.month(), self.date.day())
        } else if period.contains(self.date) {
            Some(self.date)
        } else {
            None
        }
    }
}

// ==========================================
// OffDay - 员工个人休息日
// ==========================================
// 唯一约束: (employee_id, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffDay {
    pub off_day_id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}

impl OffDay {
    pub fn new(employee_id: &str, date: NaiveDate, reason: Option<&str>) -> Self {
        Self {
            off_day_id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            date,
            reason: reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            created_at: Utc::now().naive_utc(),
        }
    }
}

/// 周末判定（周六、周日）
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ==========================================
// SchedulePeriod - 排班周期（自然月）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchedulePeriod {
    year: i32,
    month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

impl SchedulePeriod {
    /// 创建排班周期
    ///
    /// # 返回
    /// - Some(SchedulePeriod): 月份在 1..=12 且年份可表示
    /// - None: 非法周期
    pub fn new(month: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// 英文月份名（文件名使用,与语言设置无关）
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn first_day(&self) -> NaiveDate {
        // new() 已校验 1 日存在
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first)
    }

    /// 当月天数
    pub fn num_days(&self) -> u32 {
        self.last_day().day()
    }

    /// 按日期升序遍历当月每一天
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        let last = self.last_day();
        first.iter_days().take_while(move |d| *d <= last)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}
