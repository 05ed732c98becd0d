use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use chrono::Local;
use chrono::NaiveDate;
use clap::Parser;
use maintenance_environment::MonthRef;
use maintenance_schedule::board::BoardData;
use maintenance_schedule::board::MaintenanceBoard;
use maintenance_schedule::config::BoardConfig;
use maintenance_schedule::permissions::Action;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod render;

#[derive(Parser, Debug)]
#[command(name = "maintenance-board")]
#[command(about = "Month view of maintenance work orders and technician assignments")]
struct Args
{
    /// JSON file with technicians, customers and work orders
    #[arg(short, long)]
    data: PathBuf,

    /// JSON board configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Month to display, formatted YYYY-MM
    #[arg(short, long)]
    month: Option<MonthRef>,

    /// Day to open, formatted YYYY-MM-DD
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Work orders listed per technician before "+N more"
    #[arg(long)]
    preview_len: Option<usize>,
}

fn main() -> Result<()>
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maintenance_board=info,maintenance_schedule=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => BoardConfig::default(),
    };
    if let Some(month) = args.month {
        config.initial_month = Some(month);
    }
    if let Some(preview_len) = args.preview_len {
        config.preview_len = preview_len;
    }

    let data = load_data(&args.data)?;
    let permissions = config.permissions();
    let mut board = MaintenanceBoard::new(data, config, permissions, Local::now().date_naive())?;

    board.authorize(Action::View)?;

    if let Some(date) = args.date {
        board.calendar_mut().select_date(date);
    }

    print!("{}", render::month(&board)?);
    if let Some(date) = board.calendar().selected_date() {
        print!("{}", render::day(date, &board.selected_day_orders())?);
    }
    print!("{}", render::technicians(&board.technician_panel())?);
    print!("{}", render::double_bookings(&board.double_bookings(), board.technicians())?);

    info!(month = %board.calendar().month(), "Board rendered");
    Ok(())
}

fn load_config(path: &Path) -> Result<BoardConfig>
{
    let contents = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn load_data(path: &Path) -> Result<BoardData>
{
    let contents = fs::read_to_string(path).with_context(|| format!("Failed to read data {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse data {}", path.display()))
}
