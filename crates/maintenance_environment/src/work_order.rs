use std::collections::HashSet;

use chrono::Datelike;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::customer::CustomerId;
use crate::equipment::AssetId;
use crate::technician::TechnicianId;

pub type WorkOrderId = u64;
pub type WorkOrderNumber = String;
pub type Hours = f64;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority
{
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderStatus
{
    Open,
    InProgress,
    OnHold,
    Completed,
    Closed,
    Cancelled,
}

impl WorkOrderStatus
{
    /// Work that still occupies a technician's day.
    pub fn is_active(&self) -> bool
    {
        matches!(self, WorkOrderStatus::Open | WorkOrderStatus::InProgress | WorkOrderStatus::OnHold)
    }

    pub fn is_terminal(&self) -> bool
    {
        !self.is_active()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorkOrderError
{
    #[error("work order {0} has an empty work order number")]
    MissingWorkOrderNumber(WorkOrderId),
    #[error("estimated duration must be a positive number of hours, got {0}")]
    InvalidEstimatedDuration(String),
    #[error("actual duration must be zero or more hours, got {0}")]
    InvalidActualDuration(String),
    #[error("technician {0} is assigned more than once")]
    DuplicatedTechnician(TechnicianId),
}

/// Format the number shown on a work order, `WO-2024-0007`.
pub fn format_work_order_number(year: i32, sequence: u64) -> WorkOrderNumber
{
    format!("WO-{year}-{sequence:04}")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkOrderData")]
pub struct MaintenanceWorkOrder
{
    id: WorkOrderId,
    work_order_number: WorkOrderNumber,
    equipment_id: AssetId,
    customer_id: CustomerId,
    priority: Priority,
    status: WorkOrderStatus,
    scheduled_date: NaiveDate,
    estimated_duration: Hours,
    actual_duration: Option<Hours>,
    assigned_technicians: Vec<TechnicianId>,
    description: String,
}

#[derive(Deserialize)]
struct WorkOrderData
{
    id: WorkOrderId,
    work_order_number: WorkOrderNumber,
    equipment_id: AssetId,
    customer_id: CustomerId,
    priority: Priority,
    status: WorkOrderStatus,
    scheduled_date: NaiveDate,
    estimated_duration: Hours,
    #[serde(default)]
    actual_duration: Option<Hours>,
    #[serde(default)]
    assigned_technicians: Vec<TechnicianId>,
    #[serde(default)]
    description: String,
}

impl TryFrom<WorkOrderData> for MaintenanceWorkOrder
{
    type Error = WorkOrderError;

    fn try_from(value: WorkOrderData) -> Result<Self, Self::Error>
    {
        let details = WorkOrderDetails {
            equipment_id: value.equipment_id,
            customer_id: value.customer_id,
            priority: value.priority,
            status: value.status,
            scheduled_date: value.scheduled_date,
            estimated_duration: value.estimated_duration,
            actual_duration: value.actual_duration,
            assigned_technicians: value.assigned_technicians,
            description: value.description,
        };
        MaintenanceWorkOrder::new(value.id, value.work_order_number, details)
    }
}

/// Everything except the identity of a work order. Produced by the form
/// and turned into a [`MaintenanceWorkOrder`] once an id is known.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkOrderDetails
{
    pub equipment_id: AssetId,
    pub customer_id: CustomerId,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    pub scheduled_date: NaiveDate,
    pub estimated_duration: Hours,
    pub actual_duration: Option<Hours>,
    pub assigned_technicians: Vec<TechnicianId>,
    pub description: String,
}

impl MaintenanceWorkOrder
{
    pub fn new(id: WorkOrderId, work_order_number: WorkOrderNumber, details: WorkOrderDetails) -> Result<Self, WorkOrderError>
    {
        if work_order_number.trim().is_empty() {
            return Err(WorkOrderError::MissingWorkOrderNumber(id));
        }

        if !details.estimated_duration.is_finite() || details.estimated_duration <= 0.0 {
            return Err(WorkOrderError::InvalidEstimatedDuration(details.estimated_duration.to_string()));
        }

        if let Some(actual_duration) = details.actual_duration
            && (!actual_duration.is_finite() || actual_duration < 0.0)
        {
            return Err(WorkOrderError::InvalidActualDuration(actual_duration.to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = details.assigned_technicians.iter().find(|&&technician| !seen.insert(technician)) {
            return Err(WorkOrderError::DuplicatedTechnician(*duplicate));
        }

        Ok(Self {
            id,
            work_order_number,
            equipment_id: details.equipment_id,
            customer_id: details.customer_id,
            priority: details.priority,
            status: details.status,
            scheduled_date: details.scheduled_date,
            estimated_duration: details.estimated_duration,
            actual_duration: details.actual_duration,
            assigned_technicians: details.assigned_technicians,
            description: details.description,
        })
    }

    pub fn id(&self) -> WorkOrderId
    {
        self.id
    }

    pub fn work_order_number(&self) -> &str
    {
        &self.work_order_number
    }

    pub fn equipment_id(&self) -> AssetId
    {
        self.equipment_id
    }

    pub fn customer_id(&self) -> CustomerId
    {
        self.customer_id
    }

    pub fn priority(&self) -> Priority
    {
        self.priority
    }

    pub fn status(&self) -> WorkOrderStatus
    {
        self.status
    }

    pub fn scheduled_date(&self) -> NaiveDate
    {
        self.scheduled_date
    }

    pub fn scheduled_year(&self) -> i32
    {
        self.scheduled_date.year()
    }

    pub fn estimated_duration(&self) -> Hours
    {
        self.estimated_duration
    }

    pub fn actual_duration(&self) -> Option<Hours>
    {
        self.actual_duration
    }

    pub fn assigned_technicians(&self) -> &[TechnicianId]
    {
        &self.assigned_technicians
    }

    pub fn description(&self) -> &str
    {
        &self.description
    }

    pub fn is_assigned_to(&self, technician_id: TechnicianId) -> bool
    {
        self.assigned_technicians.contains(&technician_id)
    }

    pub fn details(&self) -> WorkOrderDetails
    {
        WorkOrderDetails {
            equipment_id: self.equipment_id,
            customer_id: self.customer_id,
            priority: self.priority,
            status: self.status,
            scheduled_date: self.scheduled_date,
            estimated_duration: self.estimated_duration,
            actual_duration: self.actual_duration,
            assigned_technicians: self.assigned_technicians.clone(),
            description: self.description.clone(),
        }
    }

    pub fn set_status(&mut self, status: WorkOrderStatus)
    {
        self.status = status;
    }
}

#[cfg(test)]
mod tests
{
    use chrono::NaiveDate;

    use super::MaintenanceWorkOrder;
    use super::Priority;
    use super::WorkOrderDetails;
    use super::WorkOrderError;
    use super::WorkOrderStatus;
    use super::format_work_order_number;

    fn details() -> WorkOrderDetails
    {
        WorkOrderDetails {
            equipment_id: 100,
            customer_id: 10,
            priority: Priority::High,
            status: WorkOrderStatus::Open,
            scheduled_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            estimated_duration: 4.0,
            actual_duration: None,
            assigned_technicians: vec![1, 2],
            description: "Quarterly load bank test".to_string(),
        }
    }

    #[test]
    fn test_work_order_new()
    {
        let work_order = MaintenanceWorkOrder::new(1, "WO-2024-0001".to_string(), details()).unwrap();

        assert_eq!(work_order.id(), 1);
        assert_eq!(work_order.work_order_number(), "WO-2024-0001");
        assert!(work_order.is_assigned_to(2));
        assert!(!work_order.is_assigned_to(3));
        assert_eq!(work_order.details(), details());
    }

    #[test]
    fn test_work_order_rejects_invalid_input()
    {
        assert_eq!(
            MaintenanceWorkOrder::new(1, " ".to_string(), details()),
            Err(WorkOrderError::MissingWorkOrderNumber(1))
        );

        let mut zero_duration = details();
        zero_duration.estimated_duration = 0.0;
        assert_eq!(
            MaintenanceWorkOrder::new(1, "WO-2024-0001".to_string(), zero_duration),
            Err(WorkOrderError::InvalidEstimatedDuration("0".to_string()))
        );

        let mut negative_actual = details();
        negative_actual.actual_duration = Some(-1.5);
        assert_eq!(
            MaintenanceWorkOrder::new(1, "WO-2024-0001".to_string(), negative_actual),
            Err(WorkOrderError::InvalidActualDuration("-1.5".to_string()))
        );

        let mut duplicated = details();
        duplicated.assigned_technicians = vec![1, 2, 1];
        assert_eq!(
            MaintenanceWorkOrder::new(1, "WO-2024-0001".to_string(), duplicated),
            Err(WorkOrderError::DuplicatedTechnician(1))
        );
    }

    #[test]
    fn test_status_activity()
    {
        assert!(WorkOrderStatus::OnHold.is_active());
        assert!(WorkOrderStatus::InProgress.is_active());
        assert!(WorkOrderStatus::Completed.is_terminal());
        assert!(WorkOrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_format_work_order_number()
    {
        assert_eq!(format_work_order_number(2024, 7), "WO-2024-0007");
        assert_eq!(format_work_order_number(2025, 12345), "WO-2025-12345");
    }

    #[test]
    fn test_work_order_serde()
    {
        let work_order: MaintenanceWorkOrder = serde_json::from_str(
            r#"{
                "id": 3,
                "work_order_number": "WO-2024-0003",
                "equipment_id": 100,
                "customer_id": 10,
                "priority": "CRITICAL",
                "status": "IN_PROGRESS",
                "scheduled_date": "2024-03-15",
                "estimated_duration": 2.5
            }"#,
        )
        .unwrap();

        assert_eq!(work_order.priority(), Priority::Critical);
        assert_eq!(work_order.status(), WorkOrderStatus::InProgress);
        assert!(work_order.assigned_technicians().is_empty());
        assert_eq!(work_order.actual_duration(), None);

        let zero_duration = r#"{
            "id": 4,
            "work_order_number": "WO-2024-0004",
            "equipment_id": 100,
            "customer_id": 10,
            "priority": "LOW",
            "status": "OPEN",
            "scheduled_date": "2024-03-16",
            "estimated_duration": 0
        }"#;
        assert!(serde_json::from_str::<MaintenanceWorkOrder>(zero_duration).is_err());
    }
}
