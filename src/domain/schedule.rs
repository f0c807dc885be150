// ==========================================
// 多门店排班系统 - 排班记录领域模型
// ==========================================
// 红线: 同一员工同一天最多一条排班记录（全系统范围）
// 说明: ScheduleEntry 只由排班引擎创建,重排前由调用方整月删除
// ==========================================

use crate::domain::types::{Gender, ShiftKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleEntry - 排班记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub entry_id: String,
    pub employee_id: String,
    pub location_id: String,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}

impl ScheduleEntry {
    pub fn new(employee_id: &str, location_id: &str, date: NaiveDate, shift: ShiftKind) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            location_id: location_id.to_string(),
            date,
            shift,
        }
    }
}

// ==========================================
// ScheduleRow - 排班明细视图
// ==========================================
// 用途: 报表输入（排班记录 + 员工/门店展示字段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub shift: ShiftKind,
    pub location_id: String,
    pub location_label: String,
    pub employee_id: String,
    pub employee_name: String,
    pub gender: Gender,
}
