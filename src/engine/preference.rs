// ==========================================
// 多门店排班系统 - 班次偏好策略
// ==========================================
// 红线: 偏好为软约束,只影响排序,不剔除候选人
// ==========================================
// 策略以 weight(性别, 班次) -> {0,1} 的形式注入排班引擎,
// 替换策略无需改动分配循环
// ==========================================

use crate::domain::types::{Gender, ShiftKind};

// ==========================================
// ShiftPreferencePolicy Trait
// ==========================================
pub trait ShiftPreferencePolicy {
    /// 班次偏好惩罚值
    ///
    /// # 返回
    /// - 0: 偏好班次
    /// - 1: 非偏好班次（仍可排,仅在无 0 分候选人时使用）
    fn weight(&self, gender: Gender, shift: ShiftKind) -> u8;
}

// ==========================================
// FemaleDaytimePreference - 默认策略
// ==========================================
// 女性员工偏好早班与中班,男性员工三个班次均为偏好
#[derive(Debug, Clone, Copy, Default)]
pub struct FemaleDaytimePreference;

impl FemaleDaytimePreference {
    const FEMALE_PREFERRED: [ShiftKind; 2] = [ShiftKind::Morning, ShiftKind::Midday];
}

impl ShiftPreferencePolicy for FemaleDaytimePreference {
    fn weight(&self, gender: Gender, shift: ShiftKind) -> u8 {
        match gender {
            Gender::Male => 0,
            Gender::Female if Self::FEMALE_PREFERRED.contains(&shift) => 0,
            Gender::Female => 1,
        }
    }
}

// ==========================================
// NoPreference - 无偏好策略
// ==========================================
// 所有组合权重为 0,排序只看负载与随机数
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreference;

impl ShiftPreferencePolicy for NoPreference {
    fn weight(&self, _gender: Gender, _shift: ShiftKind) -> u8 {
        0
    }
}
