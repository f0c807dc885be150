// ==========================================
// 多门店排班系统 - 基础档案 API
// ==========================================
// 职责: 员工、门店、节假日、个人休息日的录入与维护
// 红线: 员工/门店只停用不删除,保留历史排班
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::calendar::{Holiday, OffDay, SchedulePeriod};
use crate::domain::staff::{Employee, Location};
use crate::domain::types::Gender;
use crate::repository::{
    EmployeeRepository, HolidayRepository, LocationRepository, OffDayRepository,
};

/// 电话号码格式: 可选 +、可选国家码 1、9~15 位数字
static PHONE_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$"));

fn validate_phone(phone: &str) -> ApiResult<()> {
    let pattern = PHONE_PATTERN
        .as_ref()
        .map_err(|e| ApiError::InternalError(format!("电话号码规则编译失败: {}", e)))?;
    if pattern.is_match(phone) {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "电话号码格式错误: {}（格式: '+999999999'，最多15位）",
            phone
        )))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ==========================================
// 请求结构
// ==========================================

/// 员工录入/更新请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    pub gender: Gender,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// 门店录入/更新请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInput {
    pub name: String,
    pub address: String,
    pub mall_name: Option<String>,
}

// ==========================================
// RosterApi - 基础档案 API
// ==========================================
pub struct RosterApi {
    employee_repo: Arc<EmployeeRepository>,
    location_repo: Arc<LocationRepository>,
    holiday_repo: Arc<HolidayRepository>,
    off_day_repo: Arc<OffDayRepository>,
}

impl RosterApi {
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        location_repo: Arc<LocationRepository>,
        holiday_repo: Arc<HolidayRepository>,
        off_day_repo: Arc<OffDayRepository>,
    ) -> Self {
        Self {
            employee_repo,
            location_repo,
            holiday_repo,
            off_day_repo,
        }
    }

    // ==========================================
    // 员工
    // ==========================================

    /// 新增员工
    ///
    /// # 返回
    /// - Err(InvalidInput): 姓名为空 / 电话格式错误
    pub fn add_employee(&self, input: EmployeeInput) -> ApiResult<Employee> {
        let mut employee = Employee::new(&input.name, input.gender);
        if employee.name.is_empty() {
            return Err(ApiError::InvalidInput("员工姓名不能为空".to_string()));
        }
        employee.phone = non_empty(input.phone.as_deref());
        employee.email = non_empty(input.email.as_deref());
        if let Some(phone) = &employee.phone {
            validate_phone(phone)?;
        }

        self.employee_repo.insert(&employee)?;
        info!(employee_id = %employee.employee_id, name = %employee.name, "新增员工");
        Ok(employee)
    }

    /// 更新员工基本信息（不改变在职状态）
    pub fn update_employee(&self, employee_id: &str, input: EmployeeInput) -> ApiResult<Employee> {
        let mut employee = self
            .employee_repo
            .find_by_id(employee_id)?
            .ok_or_else(|| ApiError::NotFound(format!("员工(id={})不存在", employee_id)))?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("员工姓名不能为空".to_string()));
        }
        let phone = non_empty(input.phone.as_deref());
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }

        employee.name = name.to_string();
        employee.gender = input.gender;
        employee.phone = phone;
        employee.email = non_empty(input.email.as_deref());

        self.employee_repo.update(&employee)?;
        Ok(employee)
    }

    /// 停用员工（后续排班不再参与,历史排班保留）
    pub fn deactivate_employee(&self, employee_id: &str) -> ApiResult<()> {
        self.employee_repo.set_active(employee_id, false)?;
        info!(employee_id, "停用员工");
        Ok(())
    }

    pub fn list_employees(&self, include_inactive: bool) -> ApiResult<Vec<Employee>> {
        if include_inactive {
            Ok(self.employee_repo.list_all()?)
        } else {
            Ok(self.employee_repo.list_active()?)
        }
    }

    // ==========================================
    // 门店
    // ==========================================

    pub fn add_location(&self, input: LocationInput) -> ApiResult<Location> {
        let location = Location::new(&input.name, &input.address, input.mall_name.as_deref());
        if location.name.is_empty() {
            return Err(ApiError::InvalidInput("门店名称不能为空".to_string()));
        }

        self.location_repo.insert(&location)?;
        info!(location_id = %location.location_id, label = %location.label(), "新增门店");
        Ok(location)
    }

    pub fn update_location(&self, location_id: &str, input: LocationInput) -> ApiResult<Location> {
        let mut location = self
            .location_repo
            .find_by_id(location_id)?
            .ok_or_else(|| ApiError::NotFound(format!("门店(id={})不存在", location_id)))?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("门店名称不能为空".to_string()));
        }
        location.name = name.to_string();
        location.address = input.address.trim().to_string();
        location.mall_name = non_empty(input.mall_name.as_deref());

        self.location_repo.update(&location)?;
        Ok(location)
    }

    pub fn deactivate_location(&self, location_id: &str) -> ApiResult<()> {
        self.location_repo.set_active(location_id, false)?;
        info!(location_id, "停用门店");
        Ok(())
    }

    pub fn list_locations(&self, include_inactive: bool) -> ApiResult<Vec<Location>> {
        if include_inactive {
            Ok(self.location_repo.list_all()?)
        } else {
            Ok(self.location_repo.list_active()?)
        }
    }

    // ==========================================
    // 节假日
    // ==========================================

    /// 登记节假日
    ///
    /// # 参数
    /// - is_recurring: true 表示每年同月同日均为节假日
    pub fn add_holiday(&self, name: &str, date: NaiveDate, is_recurring: bool) -> ApiResult<Holiday> {
        let holiday = Holiday::new(name, date, is_recurring);
        if holiday.name.is_empty() {
            return Err(ApiError::InvalidInput("节假日名称不能为空".to_string()));
        }
        self.holiday_repo.insert(&holiday)?;
        Ok(holiday)
    }

    pub fn delete_holiday(&self, holiday_id: &str) -> ApiResult<()> {
        Ok(self.holiday_repo.delete(holiday_id)?)
    }

    pub fn list_holidays(&self) -> ApiResult<Vec<Holiday>> {
        Ok(self.holiday_repo.list_all()?)
    }

    // ==========================================
    // 个人休息日
    // ==========================================

    /// 登记个人休息日
    ///
    /// # 返回
    /// - Err(NotFound): 员工不存在
    /// - Err(BusinessRuleViolation): 同员工同日已登记
    pub fn add_off_day(
        &self,
        employee_id: &str,
        date: NaiveDate,
        reason: Option<&str>,
    ) -> ApiResult<OffDay> {
        if self.employee_repo.find_by_id(employee_id)?.is_none() {
            return Err(ApiError::NotFound(format!("员工(id={})不存在", employee_id)));
        }

        let off_day = OffDay::new(employee_id, date, reason);
        self.off_day_repo.insert(&off_day)?;
        Ok(off_day)
    }

    pub fn delete_off_day(&self, off_day_id: &str) -> ApiResult<()> {
        Ok(self.off_day_repo.delete(off_day_id)?)
    }

    pub fn list_off_days(&self, month: u32, year: i32) -> ApiResult<Vec<OffDay>> {
        let period = SchedulePeriod::new(month, year).ok_or_else(|| {
            ApiError::InvalidInput(format!("无效的月份: month={}, year={}", month, year))
        })?;
        Ok(self.off_day_repo.list_for_period(&period)?)
    }
}
