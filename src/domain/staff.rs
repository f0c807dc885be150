// ==========================================
// 多门店排班系统 - 员工与门店领域模型
// ==========================================
// 红线: 仅 is_active = true 的员工参与排班
// 红线: 仅 is_active = true 且被显式选中的门店参与排班
// ==========================================

use crate::domain::types::Gender;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub gender: Gender,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Employee {
    /// 创建新员工（自动生成ID,默认在职）
    pub fn new(name: &str, gender: Gender) -> Self {
        Self {
            employee_id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            gender,
            phone: None,
            email: None,
            is_active: true,
            created_at: Utc::now().naive_utc(),
        }
    }
}

// ==========================================
// Location - 门店
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    pub name: String,
    pub address: String,
    /// 次级标签（例如所属商场）
    pub mall_name: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Location {
    pub fn new(name: &str, address: &str, mall_name: Option<&str>) -> Self {
        Self {
            location_id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            mall_name: mall_name
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            is_active: true,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// 报表展示标签: "门店 - 商场"（无商场时仅门店名）
    pub fn label(&self) -> String {
        location_label(&self.name, self.mall_name.as_deref())
    }
}

/// 门店标签拼接规则（仓储层联表查询时复用）
pub fn location_label(name: &str, mall_name: Option<&str>) -> String {
    match mall_name {
        Some(mall) if !mall.trim().is_empty() => format!("{} - {}", name, mall),
        _ => name.to_string(),
    }
}
