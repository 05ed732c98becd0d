use std::collections::BTreeMap;

use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Weekday;
use maintenance_environment::MonthRef;
use maintenance_environment::work_order::MaintenanceWorkOrder;
use tracing::debug;

pub type Week = [Option<NaiveDate>; 7];

/// Work orders whose scheduled date falls in `month`, in input order.
pub fn orders_in_month(orders: &[MaintenanceWorkOrder], month: MonthRef) -> Vec<&MaintenanceWorkOrder>
{
    orders.iter().filter(|work_order| month.contains(work_order.scheduled_date())).collect()
}

/// Work orders scheduled on exactly `date`, in input order.
pub fn orders_on_date(orders: &[MaintenanceWorkOrder], date: NaiveDate) -> Vec<&MaintenanceWorkOrder>
{
    orders.iter().filter(|work_order| work_order.scheduled_date() == date).collect()
}

/// Groups the orders of `month` by their scheduled day. Days without any
/// work are absent from the map.
pub fn orders_by_date(orders: &[MaintenanceWorkOrder], month: MonthRef) -> BTreeMap<NaiveDate, Vec<&MaintenanceWorkOrder>>
{
    let mut days: BTreeMap<NaiveDate, Vec<&MaintenanceWorkOrder>> = BTreeMap::new();
    for work_order in orders_in_month(orders, month) {
        days.entry(work_order.scheduled_date()).or_default().push(work_order);
    }
    days
}

/// Lays the days of `month` out in weeks starting on `week_start`. Cells
/// before the first and after the last day of the month are `None`.
pub fn month_grid(month: MonthRef, week_start: Weekday) -> Vec<Week>
{
    let first_weekday = month.first_day().weekday().num_days_from_monday();
    let leading_blanks = ((7 + first_weekday - week_start.num_days_from_monday()) % 7) as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; leading_blanks];
    cells.extend(month.days().map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells
        .chunks(7)
        .map(|chunk| {
            let mut week: Week = [None; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect()
}

/// Which month is on screen and which day, if any, is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarView
{
    month: MonthRef,
    selected_date: Option<NaiveDate>,
}

impl CalendarView
{
    pub fn new(month: MonthRef) -> Self
    {
        Self { month, selected_date: None }
    }

    pub fn month(&self) -> MonthRef
    {
        self.month
    }

    pub fn selected_date(&self) -> Option<NaiveDate>
    {
        self.selected_date
    }

    /// Moving to another month drops the day selection.
    pub fn show_month(&mut self, month: MonthRef)
    {
        if self.month != month {
            debug!(target: "developer", from = %self.month, to = %month, "Calendar month changed");
            self.selected_date = None;
        }
        self.month = month;
    }

    pub fn next_month(&mut self)
    {
        self.show_month(self.month.next());
    }

    pub fn previous_month(&mut self)
    {
        self.show_month(self.month.previous());
    }

    /// Selecting a day outside the displayed month brings its month on
    /// screen.
    pub fn select_date(&mut self, date: NaiveDate)
    {
        self.show_month(MonthRef::of(date));
        self.selected_date = Some(date);
    }

    pub fn clear_selection(&mut self)
    {
        self.selected_date = None;
    }

    pub fn visible_orders<'a>(&self, orders: &'a [MaintenanceWorkOrder]) -> Vec<&'a MaintenanceWorkOrder>
    {
        orders_in_month(orders, self.month)
    }

    pub fn selected_orders<'a>(&self, orders: &'a [MaintenanceWorkOrder]) -> Vec<&'a MaintenanceWorkOrder>
    {
        match self.selected_date {
            Some(date) => orders_on_date(orders, date),
            None => vec![],
        }
    }
}
