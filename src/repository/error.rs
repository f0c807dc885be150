// ==========================================
// 多门店排班系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 单行查询统一使用 optional(),"不存在"由仓储显式返回 NotFound
// ==========================================

use chrono::NaiveDate;
use rusqlite::ErrorCode;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 记录级错误 =====
    #[error("记录未找到: {entity}(id={id})")]
    NotFound { entity: String, id: String },

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    /// 排班记录日期不在目标月份内
    #[error("排班日期 {date} 不属于 {year}-{month:02}")]
    OutOfPeriod { date: NaiveDate, month: u32, year: i32 },

    /// 库中枚举列（性别/班次）无法识别
    #[error("第 {column} 列数据无法解析: {message}")]
    CorruptValue { column: usize, message: String },

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    /// SQLite 忙/被锁,事务未能执行
    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let msg = msg.unwrap_or_else(|| code.to_string());
                match code.code {
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        RepositoryError::DatabaseTransactionError(msg)
                    }
                    _ if msg.contains("UNIQUE") => RepositoryError::UniqueConstraintViolation(msg),
                    _ if msg.contains("FOREIGN KEY") => RepositoryError::ForeignKeyViolation(msg),
                    _ => RepositoryError::DatabaseQueryError(msg),
                }
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, cause) => {
                RepositoryError::CorruptValue {
                    column,
                    message: cause.to_string(),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                RepositoryError::DatabaseQueryError("聚合查询未返回结果行".to_string())
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Type;
    use rusqlite::Connection;

    #[test]
    fn test_constraint_failures_are_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id TEXT PRIMARY KEY);
             INSERT INTO t VALUES ('a');",
        )
        .unwrap();

        let err: RepositoryError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_bad_enum_column_is_corrupt_value() {
        let cause: Box<dyn std::error::Error + Send + Sync> = "未知班次: X".into();
        let err: RepositoryError =
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, cause).into();
        assert!(matches!(err, RepositoryError::CorruptValue { column: 4, ref message } if message.contains("X")));
    }

    #[test]
    fn test_no_rows_is_query_error_not_not_found() {
        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));
    }
}
