// ==========================================
// 多门店排班系统 - XLSX 报表渲染
// ==========================================
// 工具: rust_xlsxwriter
// 结构:
//   Sheet 1 明细: 日期 / 星期 / 门店 / 班次 / 员工 / 性别
//   Sheet 2 汇总: 标题行 + 第 3 行表头 + 第 4 行起数据
// ==========================================
// 样式仅为展示提示: 表头深蓝底白字,周末行浅蓝底,细边框
// ==========================================

use crate::i18n::{t_in, t_in_with_args, weekday_key};
use crate::report::error::ReportResult;
use crate::report::model::ScheduleReport;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};
use tracing::debug;

const HEADER_FILL: u32 = 0x366092;
const WEEKEND_FILL: u32 = 0xE6F3FF;
const MAX_COLUMN_WIDTH: usize = 50;

const DETAIL_COLUMNS: [&str; 6] = [
    "report.column.date",
    "report.column.day",
    "report.column.location",
    "report.column.shift",
    "report.column.employee",
    "report.column.gender",
];

const SUMMARY_COLUMNS: [&str; 4] = [
    "report.column.employee",
    "report.column.total_shifts",
    "report.column.weekend_shifts",
    "report.column.weekday_shifts",
];

// ==========================================
// XlsxReportRenderer
// ==========================================
#[derive(Debug, Clone)]
pub struct XlsxReportRenderer {
    locale: String,
}

impl XlsxReportRenderer {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// 明细 Sheet 名称
    pub fn detail_sheet_name(&self, report: &ScheduleReport) -> String {
        let month = report.period.month().to_string();
        let year = report.period.year().to_string();
        t_in_with_args(
            &self.locale,
            "report.detail_sheet",
            &[
                ("month_name", report.period.month_name()),
                ("month", &month),
                ("year", &year),
            ],
        )
    }

    pub fn summary_sheet_name(&self) -> String {
        t_in(&self.locale, "report.summary_sheet")
    }

    /// 渲染为 XLSX 字节
    ///
    /// 任一步骤失败即返回错误,不返回部分文档
    pub fn render(&self, report: &ScheduleReport) -> ReportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.detail_sheet(report)?);
        workbook.push_worksheet(self.summary_sheet(report)?);

        let bytes = workbook.save_to_buffer()?;
        debug!(
            month = report.period.month(),
            year = report.period.year(),
            detail_rows = report.detail.len(),
            summary_rows = report.summary.len(),
            bytes = bytes.len(),
            "XLSX 报表渲染完成"
        );
        Ok(bytes)
    }

    // ==========================================
    // 明细 Sheet
    // ==========================================
    fn detail_sheet(&self, report: &ScheduleReport) -> ReportResult<Worksheet> {
        let mut sheet = Worksheet::new();
        sheet.set_name(self.detail_sheet_name(report))?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_border(FormatBorder::Thin);
        let cell_format = Format::new().set_border(FormatBorder::Thin);
        let weekend_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(WEEKEND_FILL));

        let headers: Vec<String> = DETAIL_COLUMNS.iter().map(|k| t_in(&self.locale, k)).collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

        for (col, header) in headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }

        for (i, row) in report.detail.iter().enumerate() {
            let excel_row = (i + 1) as u32;
            let format = if row.is_weekend {
                &weekend_format
            } else {
                &cell_format
            };

            let values = [
                row.date_text(),
                t_in(&self.locale, weekday_key(row.weekday)),
                row.location_label.clone(),
                row.shift.label().to_string(),
                row.employee_name.clone(),
                t_in(&self.locale, row.gender.label_key()),
            ];
            for (col, value) in values.iter().enumerate() {
                sheet.write_string_with_format(excel_row, col as u16, value, format)?;
                widths[col] = widths[col].max(value.chars().count());
            }
        }

        apply_column_widths(&mut sheet, &widths)?;
        Ok(sheet)
    }

    // ==========================================
    // 汇总 Sheet
    // ==========================================
    fn summary_sheet(&self, report: &ScheduleReport) -> ReportResult<Worksheet> {
        let mut sheet = Worksheet::new();
        sheet.set_name(self.summary_sheet_name())?;

        let title_format = Format::new().set_bold().set_font_size(14);
        let header_format = Format::new().set_bold();

        sheet.write_string_with_format(0, 0, t_in(&self.locale, "report.summary_title"), &title_format)?;

        let headers: Vec<String> = SUMMARY_COLUMNS.iter().map(|k| t_in(&self.locale, k)).collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string_with_format(2, col as u16, header, &header_format)?;
        }

        for (i, stats) in report.summary.iter().enumerate() {
            let excel_row = (i + 3) as u32;
            sheet.write_string(excel_row, 0, &stats.employee_name)?;
            sheet.write_number(excel_row, 1, stats.total_shifts)?;
            sheet.write_number(excel_row, 2, stats.weekend_shifts)?;
            sheet.write_number(excel_row, 3, stats.weekday_shifts)?;
            widths[0] = widths[0].max(stats.employee_name.chars().count());
        }

        apply_column_widths(&mut sheet, &widths)?;
        Ok(sheet)
    }
}

/// 列宽 = 最长内容 + 2,上限 50
fn apply_column_widths(sheet: &mut Worksheet, widths: &[usize]) -> ReportResult<()> {
    for (col, width) in widths.iter().enumerate() {
        let adjusted = (width + 2).min(MAX_COLUMN_WIDTH);
        sheet.set_column_width(col as u16, adjusted as f64)?;
    }
    Ok(())
}
