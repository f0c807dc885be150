// ==========================================
// 多门店排班系统 - 命令行入口
// ==========================================
// 职责: 解析命令行参数,调用 AppState 中的 API
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use shift_roster::api::{EmployeeInput, LocationInput};
use shift_roster::app::{get_default_db_path, AppState};
use shift_roster::config::ScheduleConfigReader;
use shift_roster::i18n::{set_locale, t, t_with_args};
use shift_roster::{logging, Gender};

#[derive(Parser)]
#[command(name = "shift-roster")]
#[command(version)]
#[command(about = "多门店员工月度排班：生成、查看与导出", long_about = None)]
struct Cli {
    /// 数据库文件（默认: $SHIFT_ROSTER_DB 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 初始化数据库
    Init,

    /// 员工管理
    #[command(subcommand)]
    Employee(EmployeeCommand),

    /// 门店管理
    #[command(subcommand)]
    Location(LocationCommand),

    /// 节假日管理
    #[command(subcommand)]
    Holiday(HolidayCommand),

    /// 个人休息日管理
    #[command(subcommand)]
    OffDay(OffDayCommand),

    /// 生成月度排班
    Generate {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// 门店ID（可重复,按顺序分配；缺省为全部营业中门店）
        #[arg(long = "location")]
        locations: Vec<String>,
        /// 先清空该月已有排班
        #[arg(long)]
        replace: bool,
    },

    /// 查看月度排班
    Show {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },

    /// 导出月度报表
    Export {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// 输出目录
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// 导出 CSV（默认 XLSX）
        #[arg(long)]
        csv: bool,
    },

    /// 清空月度排班
    Clear {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum EmployeeCommand {
    Add {
        name: String,
        /// M / F
        #[arg(long)]
        gender: Gender,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    List {
        /// 包含已停用员工
        #[arg(long)]
        all: bool,
    },
    Deactivate {
        employee_id: String,
    },
}

#[derive(Subcommand)]
enum LocationCommand {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long)]
        mall: Option<String>,
    },
    List {
        #[arg(long)]
        all: bool,
    },
    Deactivate {
        location_id: String,
    },
}

#[derive(Subcommand)]
enum HolidayCommand {
    Add {
        name: String,
        /// YYYY-MM-DD
        date: NaiveDate,
        /// 每年重复
        #[arg(long)]
        recurring: bool,
    },
    List,
    Delete {
        holiday_id: String,
    },
}

#[derive(Subcommand)]
enum OffDayCommand {
    Add {
        employee_id: String,
        /// YYYY-MM-DD
        date: NaiveDate,
        #[arg(long)]
        reason: Option<String>,
    },
    List {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },
    Delete {
        off_day_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    Set { key: String, value: String },
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.json_log);

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    // 命令行输出与报表使用同一语言
    let locale = state
        .config_manager
        .get_report_locale()
        .map_err(|e| anyhow!("配置读取失败: {}", e))?;
    set_locale(&locale);

    match cli.command {
        Commands::Init => {
            println!("数据库已就绪: {}", state.db_path);
        }
        Commands::Employee(cmd) => run_employee(&state, cmd)?,
        Commands::Location(cmd) => run_location(&state, cmd)?,
        Commands::Holiday(cmd) => run_holiday(&state, cmd)?,
        Commands::OffDay(cmd) => run_off_day(&state, cmd)?,
        Commands::Generate {
            month,
            year,
            locations,
            replace,
        } => run_generate(&state, month, year, locations, replace)?,
        Commands::Show { month, year } => {
            for row in state.schedule_api.month_rows(month, year)? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.date,
                    row.shift.label(),
                    row.location_label,
                    row.employee_name,
                    row.gender.code()
                );
            }
        }
        Commands::Export {
            month,
            year,
            out,
            csv,
        } => {
            let files = if csv {
                state.schedule_api.export_month_csv(month, year)?
            } else {
                vec![state.schedule_api.export_month(month, year)?]
            };
            for file in files {
                let path = out.join(&file.filename);
                std::fs::write(&path, &file.bytes)
                    .with_context(|| format!("写入文件失败: {}", path.display()))?;
                println!("{}", path.display());
            }
        }
        Commands::Clear { month, year } => {
            let removed = state.schedule_api.clear_month(month, year)?;
            println!("已删除 {} 条排班记录", removed);
        }
        Commands::Config(ConfigCommand::Set { key, value }) => {
            state
                .config_manager
                .set_config_value(&key, &value)
                .map_err(|e| anyhow!("配置写入失败: {}", e))?;
        }
        Commands::Config(ConfigCommand::Show) => {
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| anyhow!("配置读取失败: {}", e))?;
            println!("{}", snapshot);
        }
    }

    Ok(())
}

fn run_employee(state: &AppState, cmd: EmployeeCommand) -> Result<()> {
    match cmd {
        EmployeeCommand::Add {
            name,
            gender,
            phone,
            email,
        } => {
            let employee = state.roster_api.add_employee(EmployeeInput {
                name,
                gender,
                phone,
                email,
            })?;
            println!("{}", employee.employee_id);
        }
        EmployeeCommand::List { all } => {
            for e in state.roster_api.list_employees(all)? {
                let status = if e.is_active { "" } else { " (inactive)" };
                println!("{}\t{}\t{}{}", e.employee_id, e.name, e.gender.code(), status);
            }
        }
        EmployeeCommand::Deactivate { employee_id } => {
            state.roster_api.deactivate_employee(&employee_id)?;
        }
    }
    Ok(())
}

fn run_location(state: &AppState, cmd: LocationCommand) -> Result<()> {
    match cmd {
        LocationCommand::Add {
            name,
            address,
            mall,
        } => {
            let location = state.roster_api.add_location(LocationInput {
                name,
                address,
                mall_name: mall,
            })?;
            println!("{}", location.location_id);
        }
        LocationCommand::List { all } => {
            for l in state.roster_api.list_locations(all)? {
                let status = if l.is_active { "" } else { " (inactive)" };
                println!("{}\t{}{}", l.location_id, l.label(), status);
            }
        }
        LocationCommand::Deactivate { location_id } => {
            state.roster_api.deactivate_location(&location_id)?;
        }
    }
    Ok(())
}

fn run_holiday(state: &AppState, cmd: HolidayCommand) -> Result<()> {
    match cmd {
        HolidayCommand::Add {
            name,
            date,
            recurring,
        } => {
            let holiday = state.roster_api.add_holiday(&name, date, recurring)?;
            println!("{}", holiday.holiday_id);
        }
        HolidayCommand::List => {
            for h in state.roster_api.list_holidays()? {
                let marker = if h.is_recurring { " *" } else { "" };
                println!("{}\t{}\t{}{}", h.holiday_id, h.date, h.name, marker);
            }
        }
        HolidayCommand::Delete { holiday_id } => {
            state.roster_api.delete_holiday(&holiday_id)?;
        }
    }
    Ok(())
}

fn run_off_day(state: &AppState, cmd: OffDayCommand) -> Result<()> {
    match cmd {
        OffDayCommand::Add {
            employee_id,
            date,
            reason,
        } => {
            let off_day = state
                .roster_api
                .add_off_day(&employee_id, date, reason.as_deref())?;
            println!("{}", off_day.off_day_id);
        }
        OffDayCommand::List { month, year } => {
            for o in state.roster_api.list_off_days(month, year)? {
                println!(
                    "{}\t{}\t{}\t{}",
                    o.off_day_id,
                    o.employee_id,
                    o.date,
                    o.reason.unwrap_or_default()
                );
            }
        }
        OffDayCommand::Delete { off_day_id } => {
            state.roster_api.delete_off_day(&off_day_id)?;
        }
    }
    Ok(())
}

fn run_generate(
    state: &AppState,
    month: u32,
    year: i32,
    locations: Vec<String>,
    replace: bool,
) -> Result<()> {
    let location_ids = if locations.is_empty() {
        state
            .roster_api
            .list_locations(false)?
            .into_iter()
            .map(|l| l.location_id)
            .collect()
    } else {
        locations
    };

    let report = state
        .schedule_api
        .generate_month(month, year, &location_ids, replace)?;

    let created = report.created.to_string();
    let requested = report.requested_slots.to_string();
    println!(
        "{}",
        t_with_args(
            "generate.done",
            &[("created", &created), ("requested", &requested)]
        )
    );
    if !report.is_complete() {
        let count = report.unfilled_count().to_string();
        println!("{}", t_with_args("generate.unfilled", &[("count", &count)]));
        for slot in &report.unfilled {
            println!("  {}\t{}\t{}", slot.date, slot.location_label, slot.shift.label());
        }
    } else {
        println!("{}", t("common.success"));
    }
    Ok(())
}
