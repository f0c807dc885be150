// ==========================================
// 多门店排班系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 排班引擎错误类型
///
/// 说明: 无法填充的班次不是错误,通过 GenerationReport.unfilled 返回
#[derive(Error, Debug)]
pub enum EngineError {
    /// 前置条件不满足（无在职员工 / 未选择门店），未做任何写入
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("无效排班周期: month={month}, year={year}")]
    InvalidPeriod { month: u32, year: i32 },

    #[error("配置读取失败: {0}")]
    Config(String),

    /// 读取或批量写入失败（批量写入为单事务,不会留下部分数据）
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
