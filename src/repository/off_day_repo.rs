// ==========================================
// 多门店排班系统 - 员工休息日数据仓储
// ==========================================
// 唯一约束: (employee_id, off_date)
// ==========================================

use crate::domain::calendar::{OffDay, SchedulePeriod};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

// ==========================================
// OffDayRepository - 休息日仓储
// ==========================================
pub struct OffDayRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OffDayRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<OffDay> {
        Ok(OffDay {
            off_day_id: row.get(0)?,
            employee_id: row.get(1)?,
            date: row.get(2)?,
            reason: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// 插入休息日
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 同员工同日已登记
    pub fn insert(&self, off_day: &OffDay) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee_off_day (off_day_id, employee_id, off_date, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                off_day.off_day_id,
                off_day.employee_id,
                off_day.date,
                off_day.reason,
                off_day.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn delete(&self, off_day_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM employee_off_day WHERE off_day_id = ?1",
            params![off_day_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "OffDay".to_string(),
                id: off_day_id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询目标月份的全部休息日（按日期排序）
    pub fn list_for_period(&self, period: &SchedulePeriod) -> RepositoryResult<Vec<OffDay>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT off_day_id, employee_id, off_date, reason, created_at
            FROM employee_off_day
            WHERE off_date BETWEEN ?1 AND ?2
            ORDER BY off_date, employee_id
            "#,
        )?;
        let off_days = stmt
            .query_map(params![period.first_day(), period.last_day()], Self::map_row)?
            .collect::<SqliteResult<Vec<OffDay>>>()?;
        Ok(off_days)
    }

    /// 目标月份休息日按员工分组
    pub fn dates_by_employee(
        &self,
        period: &SchedulePeriod,
    ) -> RepositoryResult<HashMap<String, HashSet<NaiveDate>>> {
        let mut grouped: HashMap<String, HashSet<NaiveDate>> = HashMap::new();
        for off_day in self.list_for_period(period)? {
            grouped
                .entry(off_day.employee_id)
                .or_default()
                .insert(off_day.date);
        }
        Ok(grouped)
    }
}
