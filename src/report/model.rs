// ==========================================
// 多门店排班系统 - 报表模型
// ==========================================
// 职责: 将一个月的排班明细整理为 明细 + 汇总 两部分
// 红线: 汇总中 周末 + 工作日 == 总数
// 红线: 汇总总数之和 == 明细行数
// ==========================================
// 纯函数: 不读写存储,与渲染格式无关
// ==========================================

use crate::domain::calendar::{is_weekend, SchedulePeriod};
use crate::domain::schedule::ScheduleRow;
use crate::domain::types::{Gender, ShiftKind};
use crate::report::error::{ReportError, ReportResult};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

// ==========================================
// DetailRow - 明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_weekend: bool,
    pub location_label: String,
    pub shift: ShiftKind,
    pub employee_name: String,
    pub gender: Gender,
}

impl DetailRow {
    /// ISO 日期（与语言无关）
    pub fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

// ==========================================
// SummaryRow - 员工汇总行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub employee_name: String,
    pub total_shifts: u32,
    pub weekend_shifts: u32,
    pub weekday_shifts: u32,
}

// ==========================================
// ScheduleReport - 月度排班报表
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub period: SchedulePeriod,
    /// 与输入顺序一致
    pub detail: Vec<DetailRow>,
    /// 按员工姓名字典序
    pub summary: Vec<SummaryRow>,
}

impl ScheduleReport {
    /// 构建报表模型
    ///
    /// # 参数
    /// - rows: 目标月份的排班明细（调用方已按 日期 → 门店 → 班次 排序）
    /// - month / year: 目标月份
    ///
    /// # 返回
    /// - Err(ReportError::InvalidInput): 周期非法或存在不属于该月的明细
    pub fn build(rows: &[ScheduleRow], month: u32, year: i32) -> ReportResult<Self> {
        let period = SchedulePeriod::new(month, year).ok_or_else(|| {
            ReportError::InvalidInput(format!("无效的月份: month={}, year={}", month, year))
        })?;

        let mut detail = Vec::with_capacity(rows.len());
        // 按姓名聚合（同名员工合并为一行）
        let mut stats: BTreeMap<&str, SummaryRow> = BTreeMap::new();

        for row in rows {
            if !period.contains(row.date) {
                return Err(ReportError::InvalidInput(format!(
                    "排班日期 {} 不属于 {}-{:02}",
                    row.date, year, month
                )));
            }

            let weekend = is_weekend(row.date);
            detail.push(DetailRow {
                date: row.date,
                weekday: row.date.weekday(),
                is_weekend: weekend,
                location_label: row.location_label.clone(),
                shift: row.shift,
                employee_name: row.employee_name.clone(),
                gender: row.gender,
            });

            let entry = stats
                .entry(row.employee_name.as_str())
                .or_insert_with(|| SummaryRow {
                    employee_name: row.employee_name.clone(),
                    total_shifts: 0,
                    weekend_shifts: 0,
                    weekday_shifts: 0,
                });
            entry.total_shifts += 1;
            if weekend {
                entry.weekend_shifts += 1;
            } else {
                entry.weekday_shifts += 1;
            }
        }

        Ok(Self {
            period,
            detail,
            summary: stats.into_values().collect(),
        })
    }

    pub fn total_shifts(&self) -> usize {
        self.detail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detail.is_empty()
    }
}
