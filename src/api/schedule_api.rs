// ==========================================
// 多门店排班系统 - 排班 API
// ==========================================
// 职责: 月度排班生成、查看、导出、清空
// 红线: 进程内同一时刻最多一次生成/清空在执行（全局生成锁）
// 红线: replace_existing 时旧排班的删除与新排班的写入同一事务
// ==========================================

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ScheduleConfigReader};
use crate::domain::calendar::SchedulePeriod;
use crate::domain::schedule::ScheduleRow;
use crate::engine::{GenerationReport, RosterRepositories, ScheduleGenerator};
use crate::perf::PerfGuard;
use crate::report::{
    report_filename, CsvReportRenderer, ScheduleReport, SummaryRow, XlsxReportRenderer,
};

/// 生成锁: 检查“已排班”与批量写入之间不允许其他生成/清空插入
///
/// 进程级静态锁,对所有 ScheduleApi 实例生效
static GENERATION_LOCK: Mutex<()> = Mutex::new(());

/// 导出文件（文件名 + 内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

// ==========================================
// ScheduleApi - 排班 API
// ==========================================
pub struct ScheduleApi {
    repos: Arc<RosterRepositories>,
    config: Arc<ConfigManager>,
    generator: ScheduleGenerator<RosterRepositories, ConfigManager>,
}

impl ScheduleApi {
    pub fn new(repos: Arc<RosterRepositories>, config: Arc<ConfigManager>) -> Self {
        Self {
            generator: ScheduleGenerator::new(repos.clone(), config.clone()),
            repos,
            config,
        }
    }

    fn period(month: u32, year: i32) -> ApiResult<SchedulePeriod> {
        SchedulePeriod::new(month, year).ok_or_else(|| {
            ApiError::InvalidInput(format!("无效的月份: month={}, year={}", month, year))
        })
    }

    fn lock_generation() -> ApiResult<MutexGuard<'static, ()>> {
        GENERATION_LOCK
            .lock()
            .map_err(|e| ApiError::InternalError(format!("生成锁获取失败: {}", e)))
    }

    fn report_locale(&self) -> ApiResult<String> {
        self.config
            .get_report_locale()
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))
    }

    // ==========================================
    // 生成
    // ==========================================

    /// 生成月度排班
    ///
    /// # 参数
    /// - month / year: 目标月份
    /// - location_ids: 选中门店（按此顺序分配）
    /// - replace_existing: true 时整体替换该月已有排班（失败则原样保留）
    ///
    /// # 返回
    /// - Ok(GenerationReport): 新建数、需求数、未填充班次
    /// - Err(InvalidInput): 月份非法 / 未选门店 / 无在职员工 / 门店均已停用
    /// - Err(NotFound): 门店ID不存在
    pub fn generate_month(
        &self,
        month: u32,
        year: i32,
        location_ids: &[String],
        replace_existing: bool,
    ) -> ApiResult<GenerationReport> {
        let _perf = PerfGuard::new("api.generate_month");
        Self::period(month, year)?;

        if location_ids.is_empty() {
            return Err(ApiError::InvalidInput("未选择任何门店".to_string()));
        }

        // 重复门店只保留首次出现的位置
        let mut seen = HashSet::new();
        let location_ids: Vec<String> = location_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let _guard = Self::lock_generation()?;

        let locations = self.repos.location_repo.find_by_ids(&location_ids)?;
        if locations.len() != location_ids.len() {
            let missing: Vec<&str> = location_ids
                .iter()
                .filter(|id| !locations.iter().any(|l| &l.location_id == *id))
                .map(|id| id.as_str())
                .collect();
            return Err(ApiError::NotFound(format!("门店不存在: {}", missing.join(", "))));
        }

        let report = if replace_existing {
            self.generator.regenerate(month, year, &locations)?
        } else {
            self.generator.generate(month, year, &locations)?
        };
        if report.replaced > 0 {
            info!(month, year, replaced = report.replaced, "已替换当月原有排班");
        }
        if !report.is_complete() {
            warn!(
                month,
                year,
                unfilled = report.unfilled_count(),
                requested = report.requested_slots,
                "部分班次无人可排"
            );
        }
        Ok(report)
    }

    // ==========================================
    // 查看 / 统计
    // ==========================================

    /// 当月排班明细（日期 → 门店 → 班次）
    pub fn month_rows(&self, month: u32, year: i32) -> ApiResult<Vec<ScheduleRow>> {
        let period = Self::period(month, year)?;
        Ok(self.repos.schedule_repo.rows_for_period(&period)?)
    }

    /// 当月员工排班统计（按姓名排序）
    pub fn employee_month_stats(&self, month: u32, year: i32) -> ApiResult<Vec<SummaryRow>> {
        let rows = self.month_rows(month, year)?;
        Ok(ScheduleReport::build(&rows, month, year)?.summary)
    }

    pub fn count_month(&self, month: u32, year: i32) -> ApiResult<usize> {
        let period = Self::period(month, year)?;
        Ok(self.repos.schedule_repo.count_for_period(&period)?)
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出当月 XLSX 报表
    pub fn export_month(&self, month: u32, year: i32) -> ApiResult<ExportedFile> {
        let _perf = PerfGuard::new("api.export_month");
        let rows = self.month_rows(month, year)?;
        let report = ScheduleReport::build(&rows, month, year)?;
        let bytes = XlsxReportRenderer::new(&self.report_locale()?).render(&report)?;

        Ok(ExportedFile {
            filename: report_filename(month, year, "xlsx")?,
            bytes,
        })
    }

    /// 导出当月 CSV（明细 + 汇总两个文件）
    pub fn export_month_csv(&self, month: u32, year: i32) -> ApiResult<Vec<ExportedFile>> {
        let rows = self.month_rows(month, year)?;
        let report = ScheduleReport::build(&rows, month, year)?;
        let csv = CsvReportRenderer::new(&self.report_locale()?).render(&report)?;

        let detail_name = report_filename(month, year, "csv")?;
        let summary_name = detail_name.replace(".csv", "_summary.csv");
        Ok(vec![
            ExportedFile {
                filename: detail_name,
                bytes: csv.detail,
            },
            ExportedFile {
                filename: summary_name,
                bytes: csv.summary,
            },
        ])
    }

    // ==========================================
    // 清空
    // ==========================================

    /// 清空当月排班（重新生成前由调用方执行）
    pub fn clear_month(&self, month: u32, year: i32) -> ApiResult<usize> {
        let period = Self::period(month, year)?;
        let _guard = Self::lock_generation()?;
        let removed = self.repos.schedule_repo.delete_period(&period)?;
        info!(month, year, removed, "清空当月排班");
        Ok(removed)
    }
}
