// ==========================================
// 多门店排班系统 - 领域类型定义
// ==========================================
// 班次与性别均为封闭集合,不可由用户配置
// 持久化格式: 固定代码字符串 (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 性别分类 (Gender)
// ==========================================
// 仅用于班次偏好权重,不参与任何硬约束
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// 数据库存储代码
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    /// 国际化键（报表展示用）
    pub fn label_key(&self) -> &'static str {
        match self {
            Gender::Male => "gender.male",
            Gender::Female => "gender.female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" => Ok(Gender::Male),
            "F" | "FEMALE" => Ok(Gender::Female),
            other => Err(format!("未知性别代码: {}", other)),
        }
    }
}

// ==========================================
// 班次类型 (Shift Kind)
// ==========================================
// 固定三个时间窗口,声明顺序即分配顺序
// 注: 代码字符串的字典序与声明顺序一致,查询可直接 ORDER BY shift_code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    #[serde(rename = "10AM-7PM")]
    Morning,
    #[serde(rename = "1PM-10PM")]
    Midday,
    #[serde(rename = "3PM-12AM")]
    Evening,
}

impl ShiftKind {
    /// 全部班次（固定分配顺序）
    pub const ALL: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Midday, ShiftKind::Evening];

    /// 数据库存储代码
    pub fn code(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "10AM-7PM",
            ShiftKind::Midday => "1PM-10PM",
            ShiftKind::Evening => "3PM-12AM",
        }
    }

    /// 完整时间段描述
    pub fn label(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "10:00 AM - 7:00 PM",
            ShiftKind::Midday => "1:00 PM - 10:00 PM",
            ShiftKind::Evening => "3:00 PM - 12:00 AM",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ShiftKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShiftKind::ALL
            .iter()
            .copied()
            .find(|k| k.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知班次代码: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_code_order_matches_declaration() {
        let mut codes: Vec<&str> = ShiftKind::ALL.iter().map(|k| k.code()).collect();
        codes.sort();
        let declared: Vec<&str> = ShiftKind::ALL.iter().map(|k| k.code()).collect();
        assert_eq!(codes, declared);
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("1pm-10pm".parse::<ShiftKind>().unwrap(), ShiftKind::Midday);
        assert!("9AM-5PM".parse::<ShiftKind>().is_err());
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert!("X".parse::<Gender>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&ShiftKind::Evening).unwrap();
        assert_eq!(json, "\"3PM-12AM\"");
        let g: Gender = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(g, Gender::Female);
    }
}
