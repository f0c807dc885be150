// ==========================================
// 多门店排班系统 - 报表层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 渲染失败时不返回任何部分文档
// ==========================================

use thiserror::Error;

/// 报表错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    /// 输入不合法（周期非法 / 明细行不属于目标月份）
    #[error("报表输入无效: {0}")]
    InvalidInput(String),

    #[error("XLSX 渲染失败: {0}")]
    Render(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("缓冲区写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
