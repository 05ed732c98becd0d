use std::fmt;
use std::fmt::Write;

use chrono::Datelike;
use chrono::NaiveDate;
use maintenance_environment::technician::Technician;
use maintenance_environment::work_order::MaintenanceWorkOrder;
use maintenance_schedule::board::MaintenanceBoard;
use maintenance_schedule::permissions::PermissionCheck;
use maintenance_schedule::technician_panel::DoubleBooking;
use maintenance_schedule::technician_panel::TechnicianSummary;

const CELL_WIDTH: usize = 8;

/// Month grid, each day followed by its number of work orders.
pub fn month<P: PermissionCheck>(board: &MaintenanceBoard<P>) -> Result<String, fmt::Error>
{
    let month = board.calendar().month();
    let orders_by_date = board.orders_by_date();

    let mut out = String::new();
    writeln!(out, "{}", month.first_day().format("%B %Y"))?;

    let mut weekday = board.config().week_start;
    for _ in 0..7 {
        write!(out, "{:<width$}", weekday.to_string(), width = CELL_WIDTH)?;
        weekday = weekday.succ();
    }
    out.push('\n');

    for week in board.month_grid() {
        for cell in week {
            let text = match cell {
                Some(date) => match orders_by_date.get(&date) {
                    Some(orders) => format!("{}({})", date.day(), orders.len()),
                    None => date.day().to_string(),
                },
                None => String::new(),
            };
            write!(out, "{:<width$}", text, width = CELL_WIDTH)?;
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out.push('\n');
    Ok(out)
}

pub fn day(date: NaiveDate, orders: &[&MaintenanceWorkOrder]) -> Result<String, fmt::Error>
{
    let mut out = String::new();
    writeln!(out, "Work orders on {date}")?;
    if orders.is_empty() {
        writeln!(out, "  none")?;
    }
    for work_order in orders {
        writeln!(out, "  {}", order_line(work_order))?;
    }
    out.push('\n');
    Ok(out)
}

pub fn technicians(panel: &[TechnicianSummary<'_>]) -> Result<String, fmt::Error>
{
    let mut out = String::new();
    writeln!(out, "Technicians")?;
    for summary in panel {
        writeln!(
            out,
            "  {} ({} work orders, {:.1} h)",
            summary.name, summary.order_count, summary.estimated_hours
        )?;
        for work_order in &summary.preview {
            writeln!(out, "    {}", order_line(work_order))?;
        }
        if summary.overflow > 0 {
            writeln!(out, "    +{} more", summary.overflow)?;
        }
    }
    out.push('\n');
    Ok(out)
}

pub fn double_bookings(bookings: &[DoubleBooking], technicians: &[Technician]) -> Result<String, fmt::Error>
{
    let mut out = String::new();
    if bookings.is_empty() {
        return Ok(out);
    }

    writeln!(out, "Double bookings")?;
    for booking in bookings {
        let name = technicians
            .iter()
            .find(|technician| technician.id() == booking.technician_id)
            .map_or("unknown technician", |technician| technician.name());
        writeln!(out, "  {name} on {}: {} work orders", booking.date, booking.work_orders.len())?;
    }
    out.push('\n');
    Ok(out)
}

fn order_line(work_order: &MaintenanceWorkOrder) -> String
{
    format!(
        "{} {} {:?}/{:?} {}",
        work_order.work_order_number(),
        work_order.scheduled_date(),
        work_order.priority(),
        work_order.status(),
        work_order.description()
    )
}
