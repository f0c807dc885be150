// ==========================================
// 多门店排班系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::staff::Employee;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_text_enum;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "SELECT employee_id, name, gender, phone, email, is_active, created_at FROM employee";

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Employee> {
        let gender: String = row.get(2)?;
        Ok(Employee {
            employee_id: row.get(0)?,
            name: row.get(1)?,
            gender: parse_text_enum(2, &gender)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    /// 插入员工
    pub fn insert(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee (employee_id, name, gender, phone, email, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                employee.employee_id,
                employee.name,
                employee.gender.code(),
                employee.phone,
                employee.email,
                employee.is_active,
                employee.created_at,
            ],
        )?;
        Ok(())
    }

    /// 更新员工基本信息
    ///
    /// # 返回
    /// - Err(NotFound): 员工不存在
    pub fn update(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE employee
            SET name = ?2, gender = ?3, phone = ?4, email = ?5, is_active = ?6
            WHERE employee_id = ?1
            "#,
            params![
                employee.employee_id,
                employee.name,
                employee.gender.code(),
                employee.phone,
                employee.email,
                employee.is_active,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee.employee_id.clone(),
            });
        }
        Ok(())
    }

    /// 设置在职状态（停用而非删除,保留历史排班）
    pub fn set_active(&self, employee_id: &str, is_active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE employee SET is_active = ?2 WHERE employee_id = ?1",
            params![employee_id, is_active],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, employee_id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE employee_id = ?1", SELECT_COLUMNS);
        let employee = conn
            .query_row(&sql, params![employee_id], Self::map_row)
            .optional()?;
        Ok(employee)
    }

    /// 查询在职员工（按姓名排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE is_active = 1 ORDER BY name, employee_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Employee>>>()?;
        Ok(employees)
    }

    /// 查询全部员工（含停用）
    pub fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY name, employee_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Employee>>>()?;
        Ok(employees)
    }
}
