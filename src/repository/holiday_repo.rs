// ==========================================
// 多门店排班系统 - 节假日数据仓储
// ==========================================
// 说明: 重复节假日在此解析为目标月份的具体日期,
//       排班引擎只消费已解析的日期集合
// ==========================================

use crate::domain::calendar::{Holiday, SchedulePeriod};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

// ==========================================
// HolidayRepository - 节假日仓储
// ==========================================
pub struct HolidayRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HolidayRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Holiday> {
        Ok(Holiday {
            holiday_id: row.get(0)?,
            name: row.get(1)?,
            date: row.get(2)?,
            is_recurring: row.get(3)?,
        })
    }

    pub fn insert(&self, holiday: &Holiday) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO holiday (holiday_id, name, holiday_date, is_recurring) VALUES (?1, ?2, ?3, ?4)",
            params![holiday.holiday_id, holiday.name, holiday.date, holiday.is_recurring],
        )?;
        Ok(())
    }

    pub fn delete(&self, holiday_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM holiday WHERE holiday_id = ?1", params![holiday_id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Holiday".to_string(),
                id: holiday_id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询全部节假日（按日期排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Holiday>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT holiday_id, name, holiday_date, is_recurring FROM holiday ORDER BY holiday_date",
        )?;
        let holidays = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Holiday>>>()?;
        Ok(holidays)
    }

    /// 解析目标月份的节假日日期集合
    ///
    /// # 参数
    /// - period: 排班周期
    ///
    /// # 返回
    /// - 当月的非重复节假日 + 重复节假日在当年的同月同日
    pub fn dates_for_period(&self, period: &SchedulePeriod) -> RepositoryResult<BTreeSet<NaiveDate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT holiday_id, name, holiday_date, is_recurring
            FROM holiday
            WHERE (holiday_date BETWEEN ?1 AND ?2)
               OR (is_recurring = 1 AND strftime('%m', holiday_date) = ?3)
            "#,
        )?;

        let month_str = format!("{:02}", period.month());
        let holidays = stmt
            .query_map(
                params![period.first_day(), period.last_day(), month_str],
                Self::map_row,
            )?
            .collect::<SqliteResult<Vec<Holiday>>>()?;

        Ok(holidays
            .iter()
            .filter_map(|h| h.resolve_in(period))
            .collect())
    }
}
