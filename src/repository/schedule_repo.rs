// ==========================================
// 多门店排班系统 - 排班记录数据仓储
// ==========================================
// 红线: 批量写入必须在单个事务内完成（全部成功或全部回滚）
// 红线: 同员工同日唯一（表级 UNIQUE 约束兜底）
// ==========================================

use crate::domain::calendar::SchedulePeriod;
use crate::domain::schedule::{ScheduleEntry, ScheduleRow};
use crate::domain::staff::location_label;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_text_enum;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Transaction};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleRepository - 排班记录仓储
// ==========================================
pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入排班记录（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 插入条数
    /// - Err: 任一条失败则整体回滚,不留下部分写入
    pub fn insert_batch(&self, entries: &[ScheduleEntry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let count = Self::insert_in_tx(&tx, entries)?;

        // tx 在出错返回时 drop,自动回滚
        tx.commit()?;
        Ok(count)
    }

    /// 以新排班整体替换目标月份（删除 + 插入同一事务）
    ///
    /// # 返回
    /// - Ok((removed, inserted)): 删除条数、插入条数
    /// - Err: 任一步失败则整体回滚,原有排班保持不变
    pub fn replace_period(
        &self,
        period: &SchedulePeriod,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<(usize, usize)> {
        if let Some(outside) = entries.iter().find(|e| !period.contains(e.date)) {
            return Err(RepositoryError::OutOfPeriod {
                date: outside.date,
                month: period.month(),
                year: period.year(),
            });
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM schedule_entry WHERE shift_date BETWEEN ?1 AND ?2",
            params![period.first_day(), period.last_day()],
        )?;
        let inserted = Self::insert_in_tx(&tx, entries)?;

        tx.commit()?;
        Ok((removed, inserted))
    }

    fn insert_in_tx(tx: &Transaction<'_>, entries: &[ScheduleEntry]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO schedule_entry (entry_id, employee_id, location_id, shift_date, shift_code)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;
        let mut count = 0;
        for entry in entries {
            stmt.execute(params![
                entry.entry_id,
                entry.employee_id,
                entry.location_id,
                entry.date,
                entry.shift.code(),
            ])?;
            count += 1;
        }
        Ok(count)
    }

    /// 查询目标月份已排班的 (员工, 日期) 对
    pub fn booked_pairs(&self, period: &SchedulePeriod) -> RepositoryResult<HashSet<(String, NaiveDate)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT employee_id, shift_date FROM schedule_entry WHERE shift_date BETWEEN ?1 AND ?2",
        )?;
        let pairs = stmt
            .query_map(params![period.first_day(), period.last_day()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, NaiveDate>(1)?))
            })?
            .collect::<SqliteResult<HashSet<(String, NaiveDate)>>>()?;
        Ok(pairs)
    }

    /// 查询目标月份排班记录
    pub fn entries_for_period(&self, period: &SchedulePeriod) -> RepositoryResult<Vec<ScheduleEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT entry_id, employee_id, location_id, shift_date, shift_code
            FROM schedule_entry
            WHERE shift_date BETWEEN ?1 AND ?2
            ORDER BY shift_date, shift_code, location_id
            "#,
        )?;
        let entries = stmt
            .query_map(params![period.first_day(), period.last_day()], |row| {
                let shift_code: String = row.get(4)?;
                Ok(ScheduleEntry {
                    entry_id: row.get(0)?,
                    employee_id: row.get(1)?,
                    location_id: row.get(2)?,
                    date: row.get(3)?,
                    shift: parse_text_enum(4, &shift_code)?,
                })
            })?
            .collect::<SqliteResult<Vec<ScheduleEntry>>>()?;
        Ok(entries)
    }

    /// 查询目标月份排班明细视图（联表员工/门店）
    ///
    /// 排序: 日期 → 门店名称 → 班次
    pub fn rows_for_period(&self, period: &SchedulePeriod) -> RepositoryResult<Vec<ScheduleRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.shift_date, s.shift_code, l.location_id, l.name, l.mall_name,
                   e.employee_id, e.name, e.gender
            FROM schedule_entry s
            JOIN employee e ON e.employee_id = s.employee_id
            JOIN location l ON l.location_id = s.location_id
            WHERE s.shift_date BETWEEN ?1 AND ?2
            ORDER BY s.shift_date, l.name, l.location_id, s.shift_code
            "#,
        )?;
        let rows = stmt
            .query_map(params![period.first_day(), period.last_day()], |row| {
                let shift_code: String = row.get(1)?;
                let location_name: String = row.get(3)?;
                let mall_name: Option<String> = row.get(4)?;
                let gender: String = row.get(7)?;
                Ok(ScheduleRow {
                    date: row.get(0)?,
                    shift: parse_text_enum(1, &shift_code)?,
                    location_id: row.get(2)?,
                    location_label: location_label(&location_name, mall_name.as_deref()),
                    employee_id: row.get(5)?,
                    employee_name: row.get(6)?,
                    gender: parse_text_enum(7, &gender)?,
                })
            })?
            .collect::<SqliteResult<Vec<ScheduleRow>>>()?;
        Ok(rows)
    }

    /// 删除目标月份全部排班（重排前由调用方执行）
    pub fn delete_period(&self, period: &SchedulePeriod) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM schedule_entry WHERE shift_date BETWEEN ?1 AND ?2",
            params![period.first_day(), period.last_day()],
        )?;
        Ok(affected)
    }

    pub fn count_for_period(&self, period: &SchedulePeriod) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM schedule_entry WHERE shift_date BETWEEN ?1 AND ?2",
            params![period.first_day(), period.last_day()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
