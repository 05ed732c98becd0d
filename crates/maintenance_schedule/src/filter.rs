//! Narrowing the work-order list the way the board's toolbar does.

use maintenance_environment::technician::TechnicianId;
use maintenance_environment::work_order::MaintenanceWorkOrder;
use maintenance_environment::work_order::Priority;
use maintenance_environment::work_order::WorkOrderStatus;

/// Criteria combined with AND. Values inside `statuses` and `priorities`
/// are combined with OR. An empty filter matches every work order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkOrderFilter
{
    pub statuses: Vec<WorkOrderStatus>,
    pub priorities: Vec<Priority>,
    pub technician: Option<TechnicianId>,
    /// Case-insensitive match on work order number and description.
    pub search: Option<String>,
}

impl WorkOrderFilter
{
    pub fn is_empty(&self) -> bool
    {
        self.statuses.is_empty() && self.priorities.is_empty() && self.technician.is_none() && self.search_term().is_none()
    }

    pub fn with_status(mut self, status: WorkOrderStatus) -> Self
    {
        self.statuses.push(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self
    {
        self.priorities.push(priority);
        self
    }

    pub fn with_technician(mut self, technician_id: TechnicianId) -> Self
    {
        self.technician = Some(technician_id);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self
    {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, work_order: &MaintenanceWorkOrder) -> bool
    {
        if !self.statuses.is_empty() && !self.statuses.contains(&work_order.status()) {
            return false;
        }

        if !self.priorities.is_empty() && !self.priorities.contains(&work_order.priority()) {
            return false;
        }

        if let Some(technician_id) = self.technician
            && !work_order.is_assigned_to(technician_id)
        {
            return false;
        }

        match self.search_term() {
            Some(term) => {
                work_order.work_order_number().to_lowercase().contains(&term) || work_order.description().to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, orders: &'a [MaintenanceWorkOrder]) -> Vec<&'a MaintenanceWorkOrder>
    {
        orders.iter().filter(|work_order| self.matches(work_order)).collect()
    }

    fn search_term(&self) -> Option<String>
    {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests
{
    use chrono::NaiveDate;
    use maintenance_environment::work_order::MaintenanceWorkOrder;
    use maintenance_environment::work_order::Priority;
    use maintenance_environment::work_order::WorkOrderDetails;
    use maintenance_environment::work_order::WorkOrderStatus;

    use super::WorkOrderFilter;

    fn work_order(id: u64, priority: Priority, status: WorkOrderStatus, technicians: Vec<u64>, description: &str) -> MaintenanceWorkOrder
    {
        MaintenanceWorkOrder::new(
            id,
            format!("WO-2024-{id:04}"),
            WorkOrderDetails {
                equipment_id: 100,
                customer_id: 10,
                priority,
                status,
                scheduled_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                estimated_duration: 2.0,
                actual_duration: None,
                assigned_technicians: technicians,
                description: description.to_string(),
            },
        )
        .unwrap()
    }

    fn orders() -> Vec<MaintenanceWorkOrder>
    {
        vec![
            work_order(1, Priority::High, WorkOrderStatus::Open, vec![1], "Replace fuel filter"),
            work_order(2, Priority::Low, WorkOrderStatus::Completed, vec![2], "Clean condenser coils"),
            work_order(3, Priority::Critical, WorkOrderStatus::InProgress, vec![1, 2], "UPS battery swap"),
        ]
    }

    fn ids(orders: Vec<&MaintenanceWorkOrder>) -> Vec<u64>
    {
        orders.iter().map(|work_order| work_order.id()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything()
    {
        let filter = WorkOrderFilter::default().with_search("   ");

        assert!(filter.is_empty());
        assert_eq!(ids(filter.apply(&orders())), vec![1, 2, 3]);
    }

    #[test]
    fn test_status_and_priority_filter()
    {
        let orders = orders();

        let active = WorkOrderFilter::default()
            .with_status(WorkOrderStatus::Open)
            .with_status(WorkOrderStatus::InProgress);
        assert_eq!(ids(active.apply(&orders)), vec![1, 3]);

        let urgent_and_active = active.with_priority(Priority::Critical);
        assert_eq!(ids(urgent_and_active.apply(&orders)), vec![3]);
    }

    #[test]
    fn test_technician_filter()
    {
        let orders = orders();

        assert_eq!(ids(WorkOrderFilter::default().with_technician(2).apply(&orders)), vec![2, 3]);
        assert!(WorkOrderFilter::default().with_technician(9).apply(&orders).is_empty());
    }

    #[test]
    fn test_search_filter()
    {
        let orders = orders();

        assert_eq!(ids(WorkOrderFilter::default().with_search("ups").apply(&orders)), vec![3]);
        assert_eq!(ids(WorkOrderFilter::default().with_search("wo-2024-0002").apply(&orders)), vec![2]);
        assert!(WorkOrderFilter::default().with_search("chiller").apply(&orders).is_empty());
    }
}
