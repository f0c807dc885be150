// ==========================================
// 报表导出集成测试
// ==========================================
// 职责: 生成排班 → 导出 XLSX/CSV → 用 calamine 回读校验
// ==========================================


use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use shift_roster::config::config_keys;
use shift_roster::domain::is_weekend;
use shift_roster::Gender;
use std::io::Cursor;
use test_helpers::*;

fn read_sheets(bytes: Vec<u8>) -> (Vec<String>, Range<Data>, Range<Data>) {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let names = workbook.sheet_names();
    let detail = workbook.worksheet_range(&names[0]).unwrap();
    let summary = workbook.worksheet_range(&names[1]).unwrap();
    (names, detail, summary)
}

fn text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("({}, {}) 不是文本: {:?}", row, col, other),
    }
}

fn number(range: &Range<Data>, row: u32, col: u32) -> u32 {
    match range.get_value((row, col)) {
        Some(Data::Float(f)) => *f as u32,
        Some(Data::Int(i)) => *i as u32,
        other => panic!("({}, {}) 不是数字: {:?}", row, col, other),
    }
}

#[test]
fn test_xlsx_export_round_trip() {
    let (_tmp, state) = create_test_state();
    fix_seed(&state, 7);
    state
        .config_manager
        .set_config_value(config_keys::REPORT_LOCALE, "en")
        .unwrap();

    add_employees(
        &state,
        &[
            ("Zoe", Gender::Female),
            ("Adam", Gender::Male),
            ("Mia", Gender::Female),
        ],
    );
    let loc = add_location(&state, "Downtown", Some("Central Mall"));
    state
        .schedule_api
        .generate_month(10, 2026, &[loc.location_id.clone()], false)
        .unwrap();
    let rows = state.schedule_api.month_rows(10, 2026).unwrap();

    let file = state.schedule_api.export_month(10, 2026).unwrap();
    assert_eq!(file.filename, "schedule_October_2026.xlsx");

    let (names, detail, summary) = read_sheets(file.bytes);
    assert_eq!(names, vec!["Schedule October 2026".to_string(), "Summary".to_string()]);

    // ===== 明细 =====
    let headers: Vec<String> = (0..6).map(|c| text(&detail, 0, c)).collect();
    assert_eq!(headers, vec!["Date", "Day", "Location", "Shift", "Employee", "Gender"]);
    assert_eq!(detail.height(), rows.len() + 1);

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        assert_eq!(text(&detail, r, 0), row.date.format("%Y-%m-%d").to_string());
        assert_eq!(text(&detail, r, 2), "Downtown - Central Mall");
        assert_eq!(text(&detail, r, 3), row.shift.label());
        assert_eq!(text(&detail, r, 4), row.employee_name);
    }
    assert_eq!(text(&detail, 1, 1), "Thursday"); // 2026-10-01

    // ===== 汇总 =====
    assert_eq!(text(&summary, 0, 0), "Employee Statistics");
    assert_eq!(text(&summary, 2, 0), "Employee");
    assert_eq!(text(&summary, 2, 3), "Weekday Shifts");

    let names: Vec<String> = (3..6).map(|r| text(&summary, r, 0)).collect();
    assert_eq!(names, vec!["Adam", "Mia", "Zoe"]);

    let mut grand_total = 0;
    for r in 3..6 {
        let total = number(&summary, r, 1);
        let weekend = number(&summary, r, 2);
        let weekday = number(&summary, r, 3);
        assert_eq!(weekend + weekday, total);

        let name = text(&summary, r, 0);
        let expected_weekend = rows
            .iter()
            .filter(|row| row.employee_name == name && is_weekend(row.date))
            .count() as u32;
        assert_eq!(weekend, expected_weekend);
        grand_total += total;
    }
    assert_eq!(grand_total as usize, rows.len());
}

#[test]
fn test_default_locale_is_chinese() {
    let (_tmp, state) = create_test_state();
    add_employees(&state, &[("Amy", Gender::Female)]);
    let loc = add_location(&state, "Downtown", None);
    state
        .schedule_api
        .generate_month(10, 2026, &[loc.location_id.clone()], false)
        .unwrap();

    let file = state.schedule_api.export_month(10, 2026).unwrap();
    let (names, detail, _) = read_sheets(file.bytes);
    assert_eq!(names, vec!["2026年10月排班".to_string(), "汇总".to_string()]);
    assert_eq!(text(&detail, 0, 0), "日期");
    assert_eq!(text(&detail, 1, 5), "女");
}

#[test]
fn test_empty_month_exports_headers_only() {
    let (_tmp, state) = create_test_state();
    state
        .config_manager
        .set_config_value(config_keys::REPORT_LOCALE, "en")
        .unwrap();

    let file = state.schedule_api.export_month(3, 2027).unwrap();
    assert_eq!(file.filename, "schedule_March_2027.xlsx");

    let (_, detail, summary) = read_sheets(file.bytes);
    assert_eq!(detail.height(), 1);
    assert_eq!(text(&summary, 2, 1), "Total Shifts");
    assert!(summary.get_value((3, 0)).is_none());
}

#[test]
fn test_csv_export() {
    let (_tmp, state) = create_test_state();
    state
        .config_manager
        .set_config_value(config_keys::REPORT_LOCALE, "en")
        .unwrap();
    add_employees(&state, &[("Amy", Gender::Female), ("Ben", Gender::Male)]);
    let loc = add_location(&state, "Downtown", None);
    state
        .schedule_api
        .generate_month(10, 2026, &[loc.location_id.clone()], false)
        .unwrap();

    let files = state.schedule_api.export_month_csv(10, 2026).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].filename, "schedule_October_2026.csv");

    let detail = String::from_utf8(files[0].bytes.clone()).unwrap();
    // 表头 + 31 天 × 2 人
    assert_eq!(detail.lines().count(), 1 + 62);

    let summary = String::from_utf8(files[1].bytes.clone()).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Amy,31,"));
    assert!(lines[2].starts_with("Ben,31,"));
}
