// ==========================================
// 月度排班生成端到端测试
// ==========================================
// 职责: 经由 AppState → ScheduleApi → ScheduleGenerator → SQLite
//       验证生成后整个持久化集合上的约束
// ==========================================


use shift_roster::api::ApiError;
use shift_roster::domain::{is_weekend, ScheduleRow};
use shift_roster::Gender;
use std::collections::HashSet;
use test_helpers::*;

fn assert_no_double_booking(rows: &[ScheduleRow]) {
    let mut seen = HashSet::new();
    for row in rows {
        assert!(
            seen.insert((row.employee_id.clone(), row.date)),
            "员工 {} 在 {} 被重复排班",
            row.employee_name,
            row.date
        );
    }
}

// ==========================================
// 整月约束
// ==========================================

#[test]
fn test_december_with_holidays_and_off_days() {
    let (_tmp, state) = create_test_state();
    fix_seed(&state, 2026);

    let staff = add_employees(
        &state,
        &[
            ("Amy", Gender::Female),
            ("Ben", Gender::Male),
            ("Cleo", Gender::Female),
            ("Dev", Gender::Male),
            ("Eva", Gender::Female),
            ("Finn", Gender::Male),
        ],
    );
    let mall = add_location(&state, "Mall Kiosk", Some("Central Mall"));
    let street = add_location(&state, "Street Store", None);

    // 重复节假日以往年日期登记；一次性节假日直接落在目标月份
    state
        .roster_api
        .add_holiday("Christmas", date(2020, 12, 25), true)
        .unwrap();
    state
        .roster_api
        .add_holiday("Year End", date(2026, 12, 31), false)
        .unwrap();

    // 12-08 周二, 12-12 周六
    let amy = &staff[0];
    state
        .roster_api
        .add_off_day(&amy.employee_id, date(2026, 12, 8), Some("appointment"))
        .unwrap();
    state
        .roster_api
        .add_off_day(&amy.employee_id, date(2026, 12, 12), None)
        .unwrap();

    let ids = vec![mall.location_id.clone(), street.location_id.clone()];
    let report = state
        .schedule_api
        .generate_month(12, 2026, &ids, false)
        .unwrap();

    // 29 个非节假日 × 2 门店 × 3 班次
    assert_eq!(report.requested_slots, 29 * 6);
    // 6 人恰好填满每天 6 个班次,仅 12-08 少一人
    assert_eq!(report.created, 29 * 6 - 1);
    assert_eq!(report.unfilled.len(), 1);
    assert_eq!(report.unfilled[0].date, date(2026, 12, 8));
    assert_eq!(
        report.skipped_holidays,
        vec![date(2026, 12, 25), date(2026, 12, 31)]
    );

    let rows = state.schedule_api.month_rows(12, 2026).unwrap();
    assert_eq!(rows.len(), report.created);
    assert_no_double_booking(&rows);

    assert!(rows
        .iter()
        .all(|r| r.date != date(2026, 12, 25) && r.date != date(2026, 12, 31)));
    assert!(!rows
        .iter()
        .any(|r| r.employee_id == amy.employee_id && r.date == date(2026, 12, 8)));
    // 周末覆盖个人休息日
    assert!(is_weekend(date(2026, 12, 12)));
    assert!(rows
        .iter()
        .any(|r| r.employee_id == amy.employee_id && r.date == date(2026, 12, 12)));
}

#[test]
fn test_entry_count_bound_with_few_employees() {
    let (_tmp, state) = create_test_state();
    add_employees(&state, &[("Solo", Gender::Female)]);
    let a = add_location(&state, "A", None);
    let b = add_location(&state, "B", None);

    let report = state
        .schedule_api
        .generate_month(
            2,
            2026,
            &[a.location_id.clone(), b.location_id.clone()],
            false,
        )
        .unwrap();

    assert!(report.created <= 28 * 2 * 3);
    // 一人每天只能排一个班
    assert_eq!(report.created, 28);
    assert_eq!(report.unfilled.len(), 28 * 5);
}

// ==========================================
// 场景
// ==========================================

#[test]
fn test_two_employees_single_open_day() {
    let (_tmp, state) = create_test_state();
    add_employees(&state, &[("Amy", Gender::Female), ("Ben", Gender::Male)]);
    let loc = add_location(&state, "Downtown", None);

    // 2026-10 除 14 日外全部登记为节假日
    for day in (1..=31).filter(|d| *d != 14) {
        state
            .roster_api
            .add_holiday("closed", date(2026, 10, day), false)
            .unwrap();
    }

    let report = state
        .schedule_api
        .generate_month(10, 2026, &[loc.location_id.clone()], false)
        .unwrap();

    assert_eq!(report.requested_slots, 3);
    assert_eq!(report.created, 2);
    assert_eq!(report.unfilled.len(), 1);

    let rows = state.schedule_api.month_rows(10, 2026).unwrap();
    assert!(rows.iter().all(|r| r.date == date(2026, 10, 14)));
    assert_no_double_booking(&rows);
}

#[test]
fn test_regenerate_after_clear_is_valid() {
    let (_tmp, state) = create_test_state();
    add_employees(
        &state,
        &[
            ("Amy", Gender::Female),
            ("Ben", Gender::Male),
            ("Cleo", Gender::Female),
            ("Dev", Gender::Male),
        ],
    );
    let loc = add_location(&state, "Downtown", None);
    let ids = vec![loc.location_id.clone()];

    let first = state.schedule_api.generate_month(11, 2026, &ids, false).unwrap();
    assert_eq!(first.created, 30 * 3);

    let removed = state.schedule_api.clear_month(11, 2026).unwrap();
    assert_eq!(removed, 90);

    let second = state.schedule_api.generate_month(11, 2026, &ids, false).unwrap();
    assert_eq!(second.created, 90);
    let rows = state.schedule_api.month_rows(11, 2026).unwrap();
    assert_no_double_booking(&rows);
}

#[test]
fn test_second_location_run_respects_first_run() {
    let (_tmp, state) = create_test_state();
    add_employees(
        &state,
        &[
            ("Amy", Gender::Female),
            ("Ben", Gender::Male),
            ("Cleo", Gender::Female),
            ("Dev", Gender::Male),
        ],
    );
    let a = add_location(&state, "A", None);
    let b = add_location(&state, "B", None);

    let first = state
        .schedule_api
        .generate_month(9, 2026, &[a.location_id.clone()], false)
        .unwrap();
    assert_eq!(first.created, 30 * 3);

    // 第二次只排 B 门店：每天仅剩 1 人可排
    let second = state
        .schedule_api
        .generate_month(9, 2026, &[b.location_id.clone()], false)
        .unwrap();
    assert_eq!(second.created, 30);
    assert_eq!(second.unfilled.len(), 30 * 2);

    let rows = state.schedule_api.month_rows(9, 2026).unwrap();
    assert_eq!(rows.len(), 120);
    assert_no_double_booking(&rows);
}

#[test]
fn test_deactivated_records_are_skipped() {
    let (_tmp, state) = create_test_state();
    let staff = add_employees(&state, &[("Amy", Gender::Female), ("Ben", Gender::Male)]);
    let open = add_location(&state, "Open", None);
    let closed = add_location(&state, "Closed", None);

    state
        .roster_api
        .deactivate_employee(&staff[1].employee_id)
        .unwrap();
    state
        .roster_api
        .deactivate_location(&closed.location_id)
        .unwrap();

    let report = state
        .schedule_api
        .generate_month(
            10,
            2026,
            &[closed.location_id.clone(), open.location_id.clone()],
            false,
        )
        .unwrap();
    assert_eq!(report.location_ids, vec![open.location_id.clone()]);
    assert_eq!(report.created, 31);

    let rows = state.schedule_api.month_rows(10, 2026).unwrap();
    assert!(rows.iter().all(|r| r.employee_id == staff[0].employee_id));
    assert!(rows.iter().all(|r| r.location_id == open.location_id));
}

#[test]
fn test_repeated_location_selection_fills_each_slot_once() {
    let (_tmp, state) = create_test_state();
    fix_seed(&state, 31);
    add_employees(
        &state,
        &[
            ("Amy", Gender::Female),
            ("Ben", Gender::Male),
            ("Cleo", Gender::Female),
            ("Dev", Gender::Male),
            ("Eva", Gender::Female),
            ("Finn", Gender::Male),
        ],
    );
    let loc = add_location(&state, "Downtown", None);
    let id = loc.location_id.clone();

    let report = state
        .schedule_api
        .generate_month(10, 2026, &[id.clone(), id.clone()], false)
        .unwrap();
    assert_eq!(report.location_ids, vec![id]);
    assert_eq!(report.requested_slots, 31 * 3);
    assert_eq!(report.created, 31 * 3);

    let rows = state.schedule_api.month_rows(10, 2026).unwrap();
    let slots: HashSet<_> = rows.iter().map(|r| (r.date, r.location_id.clone(), r.shift)).collect();
    assert_eq!(slots.len(), rows.len());
    assert_no_double_booking(&rows);
}

#[test]
fn test_failed_replace_keeps_existing_roster() {
    let (_tmp, state) = create_test_state();
    fix_seed(&state, 12);
    add_employees(&state, &[("Amy", Gender::Female), ("Ben", Gender::Male)]);
    let loc = add_location(&state, "Downtown", None);
    let ids = vec![loc.location_id.clone()];

    state.schedule_api.generate_month(10, 2026, &ids, false).unwrap();
    let before = state.schedule_api.month_rows(10, 2026).unwrap();
    assert_eq!(before.len(), 62);

    // 另开连接装上拒绝写入的触发器
    let conn = rusqlite::Connection::open(&state.db_path).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_schedule_insert BEFORE INSERT ON schedule_entry
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    )
    .unwrap();

    let result = state.schedule_api.generate_month(10, 2026, &ids, true);
    assert!(result.is_err());
    assert_eq!(state.schedule_api.month_rows(10, 2026).unwrap(), before);

    conn.execute_batch("DROP TRIGGER reject_schedule_insert;").unwrap();
    let report = state.schedule_api.generate_month(10, 2026, &ids, true).unwrap();
    assert_eq!(report.replaced, 62);
    assert_eq!(state.schedule_api.count_month(10, 2026).unwrap(), 62);
}

// ==========================================
// 前置条件
// ==========================================

#[test]
fn test_invalid_input_persists_nothing() {
    let (_tmp, state) = create_test_state();
    let loc = add_location(&state, "Downtown", None);

    let err = state
        .schedule_api
        .generate_month(10, 2026, &[loc.location_id.clone()], false)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    add_employees(&state, &[("Amy", Gender::Female)]);
    let err = state
        .schedule_api
        .generate_month(10, 2026, &[], false)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .schedule_api
        .generate_month(0, 2026, &[loc.location_id.clone()], false)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    assert_eq!(state.schedule_api.count_month(10, 2026).unwrap(), 0);
}

#[test]
fn test_state_survives_reopen() {
    let (tmp, state) = create_test_state();
    add_employees(&state, &[("Amy", Gender::Female)]);
    let loc = add_location(&state, "Downtown", None);
    state
        .schedule_api
        .generate_month(10, 2026, &[loc.location_id.clone()], false)
        .unwrap();
    let db_path = state.db_path.clone();
    drop(state);

    let reopened = shift_roster::app::AppState::new(db_path).unwrap();
    assert_eq!(reopened.schedule_api.count_month(10, 2026).unwrap(), 31);
    drop(tmp);
}
