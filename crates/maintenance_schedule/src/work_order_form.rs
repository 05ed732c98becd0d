use chrono::NaiveDate;
use maintenance_environment::customer::CustomerId;
use maintenance_environment::customer::MaintenanceCustomer;
use maintenance_environment::equipment::AssetId;
use maintenance_environment::equipment::EquipmentAsset;
use maintenance_environment::technician::Technician;
use maintenance_environment::technician::TechnicianId;
use maintenance_environment::work_order::Hours;
use maintenance_environment::work_order::MaintenanceWorkOrder;
use maintenance_environment::work_order::Priority;
use maintenance_environment::work_order::WorkOrderDetails;
use maintenance_environment::work_order::WorkOrderError;
use maintenance_environment::work_order::WorkOrderId;
use maintenance_environment::work_order::WorkOrderNumber;
use maintenance_environment::work_order::WorkOrderStatus;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorkOrderFormError
{
    #[error("no customer selected")]
    CustomerMissing,
    #[error("customer {0} does not exist")]
    CustomerNotFound(CustomerId),
    #[error("no equipment selected for customer {customer_id}")]
    EquipmentMissing
    {
        customer_id: CustomerId,
    },
    #[error("equipment {equipment_id} does not belong to customer {customer_id}")]
    EquipmentNotFound
    {
        customer_id: CustomerId,
        equipment_id: AssetId,
    },
    #[error("no scheduled date given")]
    ScheduledDateMissing,
    #[error("no estimated duration given")]
    EstimatedDurationMissing,
    #[error("technician {0} does not exist")]
    TechnicianNotFound(TechnicianId),
    #[error(transparent)]
    InvalidWorkOrder(#[from] WorkOrderError),
}

/// Input state of the create/edit dialog for a work order.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkOrderForm
{
    editing: Option<(WorkOrderId, WorkOrderNumber)>,
    customer_id: Option<CustomerId>,
    equipment_id: Option<AssetId>,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub estimated_duration: Option<Hours>,
    pub actual_duration: Option<Hours>,
    assigned_technicians: Vec<TechnicianId>,
    pub description: String,
}

impl WorkOrderForm
{
    pub fn new() -> Self
    {
        Self {
            editing: None,
            customer_id: None,
            equipment_id: None,
            priority: Priority::Medium,
            status: WorkOrderStatus::Open,
            scheduled_date: None,
            estimated_duration: None,
            actual_duration: None,
            assigned_technicians: vec![],
            description: String::new(),
        }
    }

    /// Prefills the form from an existing work order. Submitting keeps its
    /// id and number.
    pub fn edit(work_order: &MaintenanceWorkOrder) -> Self
    {
        Self {
            editing: Some((work_order.id(), work_order.work_order_number().to_string())),
            customer_id: Some(work_order.customer_id()),
            equipment_id: Some(work_order.equipment_id()),
            priority: work_order.priority(),
            status: work_order.status(),
            scheduled_date: Some(work_order.scheduled_date()),
            estimated_duration: Some(work_order.estimated_duration()),
            actual_duration: work_order.actual_duration(),
            assigned_technicians: work_order.assigned_technicians().to_vec(),
            description: work_order.description().to_string(),
        }
    }

    pub fn editing(&self) -> Option<WorkOrderId>
    {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    pub fn customer_id(&self) -> Option<CustomerId>
    {
        self.customer_id
    }

    pub fn equipment_id(&self) -> Option<AssetId>
    {
        self.equipment_id
    }

    pub fn assigned_technicians(&self) -> &[TechnicianId]
    {
        &self.assigned_technicians
    }

    /// Changing customer clears an equipment selection the new customer
    /// does not own.
    pub fn select_customer(&mut self, customer_id: CustomerId, customers: &[MaintenanceCustomer])
    {
        let owns_selected_equipment = self.equipment_id.is_some_and(|equipment_id| {
            find_customer(customers, customer_id).is_some_and(|customer| customer.equipment(equipment_id).is_some())
        });

        if !owns_selected_equipment && self.equipment_id.is_some() {
            debug!(target: "developer", customer_id, equipment_id = ?self.equipment_id, "Equipment selection cleared");
            self.equipment_id = None;
        }
        self.customer_id = Some(customer_id);
    }

    pub fn select_equipment(&mut self, equipment_id: AssetId)
    {
        self.equipment_id = Some(equipment_id);
    }

    /// The equipment the selected customer owns. Empty until a customer is
    /// chosen.
    pub fn equipment_options<'a>(&self, customers: &'a [MaintenanceCustomer]) -> &'a [EquipmentAsset]
    {
        self.customer_id
            .and_then(|customer_id| find_customer(customers, customer_id))
            .map(|customer| customer.equipment.as_slice())
            .unwrap_or(&[])
    }

    pub fn toggle_technician(&mut self, technician_id: TechnicianId)
    {
        match self.assigned_technicians.iter().position(|&assigned| assigned == technician_id) {
            Some(position) => {
                self.assigned_technicians.remove(position);
            }
            None => self.assigned_technicians.push(technician_id),
        }
    }

    /// Technicians specialized in the selected equipment's type and, once a
    /// date is set, working on that weekday. Without an equipment selection
    /// every technician qualifies.
    pub fn qualified_technicians<'a>(&self, technicians: &'a [Technician], customers: &[MaintenanceCustomer]) -> Vec<&'a Technician>
    {
        let equipment_type = self
            .equipment_id
            .and_then(|equipment_id| self.equipment_options(customers).iter().find(|asset| asset.id == equipment_id))
            .map(|asset| asset.equipment_type);

        technicians
            .iter()
            .filter(|technician| equipment_type.is_none_or(|equipment_type| technician.can_service(equipment_type)))
            .filter(|technician| self.scheduled_date.is_none_or(|date| technician.is_available_on(date)))
            .collect()
    }

    /// Checks the required fields and references and returns the record
    /// content. Nothing is dropped silently: a customer without a chosen
    /// piece of equipment is an error.
    pub fn validate(&self, customers: &[MaintenanceCustomer], technicians: &[Technician]) -> Result<WorkOrderDetails, WorkOrderFormError>
    {
        let customer_id = self.customer_id.ok_or(WorkOrderFormError::CustomerMissing)?;
        let customer = find_customer(customers, customer_id).ok_or(WorkOrderFormError::CustomerNotFound(customer_id))?;

        let equipment_id = self.equipment_id.ok_or(WorkOrderFormError::EquipmentMissing { customer_id })?;
        let equipment = customer.equipment(equipment_id).ok_or(WorkOrderFormError::EquipmentNotFound {
            customer_id,
            equipment_id,
        })?;

        let scheduled_date = self.scheduled_date.ok_or(WorkOrderFormError::ScheduledDateMissing)?;
        let estimated_duration = self.estimated_duration.ok_or(WorkOrderFormError::EstimatedDurationMissing)?;

        if let Some(&unknown) = self
            .assigned_technicians
            .iter()
            .find(|&&technician_id| !technicians.iter().any(|technician| technician.id() == technician_id))
        {
            return Err(WorkOrderFormError::TechnicianNotFound(unknown));
        }

        Ok(WorkOrderDetails {
            equipment_id: equipment.id,
            customer_id,
            priority: self.priority,
            status: self.status,
            scheduled_date,
            estimated_duration,
            actual_duration: self.actual_duration,
            assigned_technicians: self.assigned_technicians.clone(),
            description: self.description.trim().to_string(),
        })
    }

    /// Builds the finished record. `new_identity` is only consulted when
    /// the form is not editing an existing work order.
    pub fn submit<F>(
        &self,
        customers: &[MaintenanceCustomer],
        technicians: &[Technician],
        new_identity: F,
    ) -> Result<MaintenanceWorkOrder, WorkOrderFormError>
    where
        F: FnOnce(&WorkOrderDetails) -> (WorkOrderId, WorkOrderNumber),
    {
        let details = self.validate(customers, technicians)?;

        let (id, work_order_number) = match &self.editing {
            Some((id, work_order_number)) => (*id, work_order_number.clone()),
            None => new_identity(&details),
        };

        Ok(MaintenanceWorkOrder::new(id, work_order_number, details)?)
    }
}

impl Default for WorkOrderForm
{
    fn default() -> Self
    {
        Self::new()
    }
}

fn find_customer(customers: &[MaintenanceCustomer], customer_id: CustomerId) -> Option<&MaintenanceCustomer>
{
    customers.iter().find(|customer| customer.id == customer_id)
}
