// ==========================================
// 多门店排班系统 - 报表层
// ==========================================
// 职责: 将一个月的排班明细渲染为两张表（明细 + 员工汇总）
// 红线: 纯函数,不读写存储
// ==========================================

pub mod csv_export;
pub mod error;
pub mod model;
pub mod xlsx;

pub use csv_export::{CsvReport, CsvReportRenderer};
pub use error::{ReportError, ReportResult};
pub use model::{DetailRow, ScheduleReport, SummaryRow};
pub use xlsx::XlsxReportRenderer;

use crate::domain::calendar::SchedulePeriod;
use crate::domain::schedule::ScheduleRow;

/// 报表文件名: schedule_<MonthName>_<Year>.<ext>（月份名固定英文）
pub fn report_filename(month: u32, year: i32, ext: &str) -> ReportResult<String> {
    let period = SchedulePeriod::new(month, year).ok_or_else(|| {
        ReportError::InvalidInput(format!("无效的月份: month={}, year={}", month, year))
    })?;
    Ok(format!(
        "schedule_{}_{}.{}",
        period.month_name(),
        period.year(),
        ext.trim_start_matches('.')
    ))
}

/// 一步渲染 XLSX 报表
///
/// # 参数
/// - rows: 按 日期 → 门店 → 班次 排序的排班明细
/// - locale: 表头/星期/性别的显示语言
pub fn render_xlsx(rows: &[ScheduleRow], month: u32, year: i32, locale: &str) -> ReportResult<Vec<u8>> {
    let report = ScheduleReport::build(rows, month, year)?;
    XlsxReportRenderer::new(locale).render(&report)
}
