// ==========================================
// 多门店排班系统 - 门店数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::staff::Location;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT location_id, name, address, mall_name, is_active, created_at FROM location";

// ==========================================
// LocationRepository - 门店仓储
// ==========================================
pub struct LocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LocationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Location> {
        Ok(Location {
            location_id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            mall_name: row.get(3)?,
            is_active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    pub fn insert(&self, location: &Location) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO location (location_id, name, address, mall_name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                location.location_id,
                location.name,
                location.address,
                location.mall_name,
                location.is_active,
                location.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, location: &Location) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE location
            SET name = ?2, address = ?3, mall_name = ?4, is_active = ?5
            WHERE location_id = ?1
            "#,
            params![
                location.location_id,
                location.name,
                location.address,
                location.mall_name,
                location.is_active,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Location".to_string(),
                id: location.location_id.clone(),
            });
        }
        Ok(())
    }

    pub fn set_active(&self, location_id: &str, is_active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE location SET is_active = ?2 WHERE location_id = ?1",
            params![location_id, is_active],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Location".to_string(),
                id: location_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, location_id: &str) -> RepositoryResult<Option<Location>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE location_id = ?1", SELECT_COLUMNS);
        let location = conn
            .query_row(&sql, params![location_id], Self::map_row)
            .optional()?;
        Ok(location)
    }

    /// 按ID列表查询门店,结果保持调用方给出的顺序
    ///
    /// 不存在的ID被忽略（由上层决定是否报错）
    pub fn find_by_ids(&self, location_ids: &[String]) -> RepositoryResult<Vec<Location>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE location_id = ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let mut locations = Vec::with_capacity(location_ids.len());
        for id in location_ids {
            if let Some(location) = stmt.query_row(params![id], Self::map_row).optional()? {
                locations.push(location);
            }
        }
        Ok(locations)
    }

    /// 查询营业中门店（按名称排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Location>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE is_active = 1 ORDER BY name, location_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let locations = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Location>>>()?;
        Ok(locations)
    }

    /// 查询全部门店（含已停用）
    pub fn list_all(&self) -> RepositoryResult<Vec<Location>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY name, location_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let locations = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Location>>>()?;
        Ok(locations)
    }
}
