use std::collections::BTreeMap;

use chrono::NaiveDate;
use maintenance_environment::MonthRef;
use maintenance_environment::technician::Technician;
use maintenance_environment::technician::TechnicianId;
use maintenance_environment::work_order::Hours;
use maintenance_environment::work_order::MaintenanceWorkOrder;
use maintenance_environment::work_order::WorkOrderId;

use crate::calendar::orders_in_month;

/// Work orders of `month` that list `technician_id` among their assigned
/// technicians.
pub fn orders_for_technician(orders: &[MaintenanceWorkOrder], technician_id: TechnicianId, month: MonthRef) -> Vec<&MaintenanceWorkOrder>
{
    orders_in_month(orders, month)
        .into_iter()
        .filter(|work_order| work_order.is_assigned_to(technician_id))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TechnicianSummary<'a>
{
    pub technician_id: TechnicianId,
    pub name: &'a str,
    pub order_count: usize,
    /// The first orders of the month, as many as the panel previews.
    pub preview: Vec<&'a MaintenanceWorkOrder>,
    /// Orders beyond the preview, shown as "+N more".
    pub overflow: usize,
    pub estimated_hours: Hours,
}

/// One summary per technician, in the order the technicians are given.
pub fn technician_panel<'a>(
    technicians: &'a [Technician],
    orders: &'a [MaintenanceWorkOrder],
    month: MonthRef,
    preview_len: usize,
) -> Vec<TechnicianSummary<'a>>
{
    technicians
        .iter()
        .map(|technician| {
            let assigned = orders_for_technician(orders, technician.id(), month);
            let estimated_hours: Hours = assigned.iter().map(|work_order| work_order.estimated_duration()).sum();
            let order_count = assigned.len();

            TechnicianSummary {
                technician_id: technician.id(),
                name: technician.name(),
                order_count,
                preview: assigned.into_iter().take(preview_len).collect(),
                overflow: order_count.saturating_sub(preview_len),
                estimated_hours,
            }
        })
        .collect()
}

/// A technician holding more than one active work order on the same day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoubleBooking
{
    pub technician_id: TechnicianId,
    pub date: NaiveDate,
    pub work_orders: Vec<WorkOrderId>,
}

/// Double bookings within `month`, sorted by technician and then date.
/// Only reported, saving a work order never checks for them.
pub fn double_bookings(orders: &[MaintenanceWorkOrder], month: MonthRef) -> Vec<DoubleBooking>
{
    let mut bookings: BTreeMap<(TechnicianId, NaiveDate), Vec<WorkOrderId>> = BTreeMap::new();

    for work_order in orders_in_month(orders, month)
        .into_iter()
        .filter(|work_order| work_order.status().is_active())
    {
        for &technician_id in work_order.assigned_technicians() {
            bookings
                .entry((technician_id, work_order.scheduled_date()))
                .or_default()
                .push(work_order.id());
        }
    }

    bookings
        .into_iter()
        .filter(|(_, work_orders)| work_orders.len() > 1)
        .map(|((technician_id, date), work_orders)| DoubleBooking {
            technician_id,
            date,
            work_orders,
        })
        .collect()
}
