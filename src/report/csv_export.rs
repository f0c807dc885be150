// ==========================================
// 多门店排班系统 - CSV 报表导出
// ==========================================
// 工具: csv crate
// 用途: 无法读取 XLSX 的下游工具使用,明细与汇总分别输出
// ==========================================

use crate::i18n::{t_in, weekday_key};
use crate::report::error::ReportResult;
use crate::report::model::ScheduleReport;
use csv::Writer;

/// CSV 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReport {
    pub detail: Vec<u8>,
    pub summary: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CsvReportRenderer {
    locale: String,
}

impl CsvReportRenderer {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn render(&self, report: &ScheduleReport) -> ReportResult<CsvReport> {
        Ok(CsvReport {
            detail: self.render_detail(report)?,
            summary: self.render_summary(report)?,
        })
    }

    pub fn render_detail(&self, report: &ScheduleReport) -> ReportResult<Vec<u8>> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record([
            t_in(&self.locale, "report.column.date"),
            t_in(&self.locale, "report.column.day"),
            t_in(&self.locale, "report.column.location"),
            t_in(&self.locale, "report.column.shift"),
            t_in(&self.locale, "report.column.employee"),
            t_in(&self.locale, "report.column.gender"),
        ])?;

        for row in &report.detail {
            writer.write_record([
                row.date_text(),
                t_in(&self.locale, weekday_key(row.weekday)),
                row.location_label.clone(),
                row.shift.label().to_string(),
                row.employee_name.clone(),
                t_in(&self.locale, row.gender.label_key()),
            ])?;
        }

        Ok(writer.into_inner().map_err(|e| e.into_error())?)
    }

    pub fn render_summary(&self, report: &ScheduleReport) -> ReportResult<Vec<u8>> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record([
            t_in(&self.locale, "report.column.employee"),
            t_in(&self.locale, "report.column.total_shifts"),
            t_in(&self.locale, "report.column.weekend_shifts"),
            t_in(&self.locale, "report.column.weekday_shifts"),
        ])?;

        for stats in &report.summary {
            writer.write_record([
                stats.employee_name.clone(),
                stats.total_shifts.to_string(),
                stats.weekend_shifts.to_string(),
                stats.weekday_shifts.to_string(),
            ])?;
        }

        Ok(writer.into_inner().map_err(|e| e.into_error())?)
    }
}
