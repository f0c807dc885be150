// ==========================================
// 多门店排班系统 - 排班配置读取 Trait
// ==========================================
// 职责: 定义排班引擎与报表所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// ScheduleConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait ScheduleConfigReader: Send + Sync {
    /// 周末是否覆盖员工个人休息日
    ///
    /// # 返回
    /// - true: 周末忽略个人休息日（休息日仅屏蔽工作日排班）
    /// - false: 任何日期的个人休息日均生效
    ///
    /// # 默认值
    /// - true
    fn get_weekend_overrides_off_day(&self) -> Result<bool, Box<dyn Error>>;

    /// 同分随机打破的固定种子
    ///
    /// # 返回
    /// - Some(seed): 固定种子（可复现排班,测试/排查用）
    /// - None: 每次运行使用新的熵源
    ///
    /// # 默认值
    /// - None
    fn get_tie_break_seed(&self) -> Result<Option<u64>, Box<dyn Error>>;

    /// 报表语言
    ///
    /// # 默认值
    /// - "zh-CN"
    fn get_report_locale(&self) -> Result<String, Box<dyn Error>>;
}
