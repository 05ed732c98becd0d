use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use chrono::Datelike;
use chrono::NaiveDate;
use maintenance_environment::MonthRef;
use maintenance_environment::customer::MaintenanceCustomer;
use maintenance_environment::technician::Technician;
use maintenance_environment::technician::TechnicianId;
use maintenance_environment::work_order::MaintenanceWorkOrder;
use maintenance_environment::work_order::WorkOrderId;
use maintenance_environment::work_order::WorkOrderStatus;
use maintenance_environment::work_order::format_work_order_number;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::calendar::CalendarView;
use crate::calendar::Week;
use crate::calendar::month_grid;
use crate::calendar::orders_by_date;
use crate::config::BoardConfig;
use crate::filter::WorkOrderFilter;
use crate::permissions::Action;
use crate::permissions::PermissionCheck;
use crate::technician_panel::DoubleBooking;
use crate::technician_panel::TechnicianSummary;
use crate::technician_panel::double_bookings;
use crate::technician_panel::technician_panel;
use crate::work_order_form::WorkOrderForm;
use crate::work_order_form::WorkOrderFormError;

pub const WORK_ORDERS: &str = "work_orders";

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BoardError
{
    #[error("access restricted: no permission to {action} {resource} in {service}")]
    PermissionDenied
    {
        service: String,
        resource: String,
        action: Action,
    },
    #[error("work order {0} does not exist")]
    WorkOrderMissing(WorkOrderId),
    #[error("work order {0} appears more than once")]
    WorkOrderDuplicate(WorkOrderId),
    #[error("technician {0} appears more than once")]
    TechnicianDuplicate(TechnicianId),
    #[error("work order ids are exhausted")]
    WorkOrderIdsExhausted,
    #[error(transparent)]
    Form(#[from] WorkOrderFormError),
}

/// Everything the board shows, as loaded by the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardData
{
    pub technicians: Vec<Technician>,
    pub customers: Vec<MaintenanceCustomer>,
    pub work_orders: Vec<MaintenanceWorkOrder>,
}

/// Owner of the work-order list. The calendar, the technician panel and
/// the form only ever see borrowed slices of it.
#[derive(Debug)]
pub struct MaintenanceBoard<P>
{
    work_orders: Vec<MaintenanceWorkOrder>,
    technicians: Vec<Technician>,
    customers: Vec<MaintenanceCustomer>,

    calendar: CalendarView,
    config: BoardConfig,
    permissions: P,

    /// Position of each work order in `work_orders`.
    work_order_indices: HashMap<WorkOrderId, usize>,
}

impl<P> MaintenanceBoard<P>
where
    P: PermissionCheck,
{
    /// The calendar opens on the configured month, else on the month of
    /// the earliest work order, else on the month of `today`.
    pub fn new(data: BoardData, config: BoardConfig, permissions: P, today: NaiveDate) -> Result<Self, BoardError>
    {
        let mut work_order_indices = HashMap::new();
        for (index, work_order) in data.work_orders.iter().enumerate() {
            if work_order_indices.insert(work_order.id(), index).is_some() {
                return Err(BoardError::WorkOrderDuplicate(work_order.id()));
            }
        }

        let mut technician_ids = HashSet::new();
        for technician in &data.technicians {
            if !technician_ids.insert(technician.id()) {
                return Err(BoardError::TechnicianDuplicate(technician.id()));
            }
        }

        let initial_month = config.initial_month.unwrap_or_else(|| {
            data.work_orders
                .iter()
                .map(|work_order| work_order.scheduled_date())
                .min()
                .map(MonthRef::of)
                .unwrap_or_else(|| MonthRef::of(today))
        });

        info!(
            work_orders = data.work_orders.len(),
            technicians = data.technicians.len(),
            customers = data.customers.len(),
            month = %initial_month,
            "Maintenance board loaded"
        );

        Ok(Self {
            work_orders: data.work_orders,
            technicians: data.technicians,
            customers: data.customers,
            calendar: CalendarView::new(initial_month),
            config,
            permissions,
            work_order_indices,
        })
    }

    pub fn authorize(&self, action: Action) -> Result<(), BoardError>
    {
        if self.permissions.has_permission(&self.config.service, WORK_ORDERS, action) {
            return Ok(());
        }

        warn!(service = %self.config.service, resource = WORK_ORDERS, %action, "Permission denied");
        Err(BoardError::PermissionDenied {
            service: self.config.service.clone(),
            resource: WORK_ORDERS.to_string(),
            action,
        })
    }

    pub fn work_orders(&self) -> &[MaintenanceWorkOrder]
    {
        &self.work_orders
    }

    pub fn technicians(&self) -> &[Technician]
    {
        &self.technicians
    }

    pub fn customers(&self) -> &[MaintenanceCustomer]
    {
        &self.customers
    }

    pub fn config(&self) -> &BoardConfig
    {
        &self.config
    }

    pub fn calendar(&self) -> &CalendarView
    {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarView
    {
        &mut self.calendar
    }

    pub fn work_order(&self, work_order_id: WorkOrderId) -> Option<&MaintenanceWorkOrder>
    {
        self.work_order_indices
            .get(&work_order_id)
            .map(|&index| &self.work_orders[index])
    }

    pub fn technician(&self, technician_id: TechnicianId) -> Option<&Technician>
    {
        self.technicians.iter().find(|technician| technician.id() == technician_id)
    }

    pub fn month_grid(&self) -> Vec<Week>
    {
        month_grid(self.calendar.month(), self.config.week_start)
    }

    pub fn month_orders(&self) -> Vec<&MaintenanceWorkOrder>
    {
        self.calendar.visible_orders(&self.work_orders)
    }

    pub fn orders_by_date(&self) -> BTreeMap<NaiveDate, Vec<&MaintenanceWorkOrder>>
    {
        orders_by_date(&self.work_orders, self.calendar.month())
    }

    pub fn selected_day_orders(&self) -> Vec<&MaintenanceWorkOrder>
    {
        self.calendar.selected_orders(&self.work_orders)
    }

    pub fn technician_panel(&self) -> Vec<TechnicianSummary<'_>>
    {
        technician_panel(&self.technicians, &self.work_orders, self.calendar.month(), self.config.preview_len)
    }

    pub fn double_bookings(&self) -> Vec<DoubleBooking>
    {
        double_bookings(&self.work_orders, self.calendar.month())
    }

    pub fn search(&self, filter: &WorkOrderFilter) -> Vec<&MaintenanceWorkOrder>
    {
        filter.apply(&self.work_orders)
    }

    /// A form prefilled with an existing work order.
    pub fn edit_form(&self, work_order_id: WorkOrderId) -> Result<WorkOrderForm, BoardError>
    {
        self.authorize(Action::Edit)?;
        self.work_order(work_order_id)
            .map(WorkOrderForm::edit)
            .ok_or(BoardError::WorkOrderMissing(work_order_id))
    }

    /// Submits the form and merges the record into the board: an edited
    /// work order replaces the one with the same id, a new one is appended
    /// with the next free id.
    pub fn save(&mut self, form: &WorkOrderForm) -> Result<WorkOrderId, BoardError>
    {
        let next_id = match form.editing() {
            Some(work_order_id) => {
                self.authorize(Action::Edit)?;
                if !self.work_order_indices.contains_key(&work_order_id) {
                    return Err(BoardError::WorkOrderMissing(work_order_id));
                }
                work_order_id
            }
            None => {
                self.authorize(Action::Create)?;
                self.next_work_order_id().ok_or(BoardError::WorkOrderIdsExhausted)?
            }
        };

        let work_order = form
            .submit(&self.customers, &self.technicians, |details| {
                (next_id, format_work_order_number(details.scheduled_date.year(), next_id))
            })
            .inspect_err(|error| warn!(%error, "Work order form rejected"))?;

        let work_order_id = work_order.id();
        let customer_id = work_order.customer_id();
        info!(work_order = work_order.work_order_number(), scheduled = %work_order.scheduled_date(), "Work order saved");

        match self.work_order_indices.get(&work_order_id) {
            Some(&index) => self.work_orders[index] = work_order,
            None => {
                self.work_order_indices.insert(work_order_id, self.work_orders.len());
                self.work_orders.push(work_order);
            }
        }

        // An edit may move the work order to another customer.
        for customer in &mut self.customers {
            if customer.id != customer_id {
                customer.work_orders.retain(|&id| id != work_order_id);
            } else if !customer.work_orders.contains(&work_order_id) {
                customer.work_orders.push(work_order_id);
            }
        }

        Ok(work_order_id)
    }

    /// Removes a work order. Asking the user for confirmation happens
    /// before this is called.
    pub fn delete(&mut self, work_order_id: WorkOrderId) -> Result<MaintenanceWorkOrder, BoardError>
    {
        self.authorize(Action::Delete)?;

        let index = *self
            .work_order_indices
            .get(&work_order_id)
            .ok_or(BoardError::WorkOrderMissing(work_order_id))?;

        let removed = self.work_orders.remove(index);
        self.rebuild_indices();

        for customer in &mut self.customers {
            customer.work_orders.retain(|&id| id != work_order_id);
        }

        info!(work_order = removed.work_order_number(), "Work order deleted");
        Ok(removed)
    }

    pub fn set_status(&mut self, work_order_id: WorkOrderId, status: WorkOrderStatus) -> Result<(), BoardError>
    {
        self.authorize(Action::Edit)?;

        let index = *self
            .work_order_indices
            .get(&work_order_id)
            .ok_or(BoardError::WorkOrderMissing(work_order_id))?;

        let work_order = &mut self.work_orders[index];
        debug!(work_order = work_order.work_order_number(), from = ?work_order.status(), to = ?status, "Work order status changed");
        work_order.set_status(status);
        Ok(())
    }
}

/// Private methods.
impl<P> MaintenanceBoard<P>
{
    /// `None` once the largest id is `WorkOrderId::MAX`.
    fn next_work_order_id(&self) -> Option<WorkOrderId>
    {
        match self.work_orders.iter().map(|work_order| work_order.id()).max() {
            Some(id) => id.checked_add(1),
            None => Some(1),
        }
    }

    fn rebuild_indices(&mut self)
    {
        self.work_order_indices = self
            .work_orders
            .iter()
            .enumerate()
            .map(|(index, work_order)| (work_order.id(), index))
            .collect();
    }
}

#[cfg(test)]
mod tests
{
    use chrono::NaiveDate;
    use chrono::Weekday;
    use maintenance_environment::MonthRef;
    use maintenance_environment::customer::MaintenanceCustomer;
    use maintenance_environment::equipment::EquipmentAsset;
    use maintenance_environment::equipment::EquipmentType;
    use maintenance_environment::technician::Technician;
    use maintenance_environment::work_order::MaintenanceWorkOrder;
    use maintenance_environment::work_order::Priority;
    use maintenance_environment::work_order::WorkOrderDetails;
    use maintenance_environment::work_order::WorkOrderStatus;

    use super::BoardData;
    use super::BoardError;
    use super::MaintenanceBoard;
    use crate::config::BoardConfig;
    use crate::filter::WorkOrderFilter;
    use crate::permissions::Action;
    use crate::permissions::PermissionGrant;
    use crate::permissions::PermissionSet;
    use crate::work_order_form::WorkOrderForm;
    use crate::work_order_form::WorkOrderFormError;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate
    {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn work_order(id: u64, scheduled_date: NaiveDate, technicians: Vec<u64>) -> MaintenanceWorkOrder
    {
        MaintenanceWorkOrder::new(
            id,
            format!("WO-{}-{id:04}", scheduled_date.format("%Y")),
            WorkOrderDetails {
                equipment_id: 100,
                customer_id: 10,
                priority: Priority::High,
                status: WorkOrderStatus::Open,
                scheduled_date,
                estimated_duration: 2.0,
                actual_duration: None,
                assigned_technicians: technicians,
                description: "Generator inspection".to_string(),
            },
        )
        .unwrap()
    }

    fn data() -> BoardData
    {
        BoardData {
            technicians: vec![
                Technician::builder(1, "Amina Yusuf")
                    .add_specialization(EquipmentType::Generator)
                    .available_on(Weekday::Fri)
                    .build()
                    .unwrap(),
                Technician::builder(2, "Jon Berg").build().unwrap(),
            ],
            customers: vec![MaintenanceCustomer {
                id: 10,
                name: "Northwind Hospital".to_string(),
                industry: "Healthcare".to_string(),
                contract: None,
                locations: vec![],
                equipment: vec![EquipmentAsset {
                    id: 100,
                    asset_number: "GEN-0100".to_string(),
                    equipment_type: EquipmentType::Generator,
                    model: "C150 D6".to_string(),
                    serial_number: "SN-100".to_string(),
                    manufacturer: "Cummins".to_string(),
                    customer_id: 10,
                    location: "Plant room".to_string(),
                    installation_date: date(2020, 1, 1),
                    last_service_date: None,
                    next_service_date: None,
                }],
                work_orders: vec![1, 2],
            }],
            work_orders: vec![work_order(1, date(2024, 3, 15), vec![1]), work_order(2, date(2024, 4, 2), vec![2])],
        }
    }

    fn board(permissions: PermissionSet) -> MaintenanceBoard<PermissionSet>
    {
        MaintenanceBoard::new(data(), BoardConfig::default(), permissions, date(2026, 1, 1)).unwrap()
    }

    fn new_form() -> WorkOrderForm
    {
        let mut form = WorkOrderForm::new();
        form.select_customer(10, &data().customers);
        form.select_equipment(100);
        form.scheduled_date = Some(date(2024, 3, 22));
        form.estimated_duration = Some(4.0);
        form.toggle_technician(1);
        form
    }

    #[test]
    fn test_initial_month()
    {
        let board = board(PermissionSet::default());
        assert_eq!(board.calendar().month(), MonthRef::new(2024, 3).unwrap());

        let config = BoardConfig {
            initial_month: Some(MonthRef::new(2024, 4).unwrap()),
            ..BoardConfig::default()
        };
        let configured = MaintenanceBoard::new(data(), config, PermissionSet::default(), date(2026, 1, 1)).unwrap();
        assert_eq!(configured.calendar().month(), MonthRef::new(2024, 4).unwrap());

        let empty = MaintenanceBoard::new(BoardData::default(), BoardConfig::default(), PermissionSet::default(), date(2026, 1, 9)).unwrap();
        assert_eq!(empty.calendar().month(), MonthRef::new(2026, 1).unwrap());
    }

    #[test]
    fn test_duplicate_work_orders_rejected()
    {
        let mut data = data();
        data.work_orders.push(work_order(1, date(2024, 5, 1), vec![]));

        let result = MaintenanceBoard::new(data, BoardConfig::default(), PermissionSet::default(), date(2026, 1, 1));

        assert!(matches!(result, Err(BoardError::WorkOrderDuplicate(1))));
    }

    #[test]
    fn test_duplicate_technicians_rejected()
    {
        let mut data = data();
        data.technicians.push(Technician::builder(2, "Jonas Berg").build().unwrap());

        let result = MaintenanceBoard::new(data, BoardConfig::default(), PermissionSet::default(), date(2026, 1, 1));

        assert!(matches!(result, Err(BoardError::TechnicianDuplicate(2))));
    }

    #[test]
    fn test_month_views()
    {
        let mut board = board(PermissionSet::default());

        assert_eq!(board.month_orders().len(), 1);
        assert_eq!(board.technician_panel()[0].order_count, 1);
        assert_eq!(board.technician_panel()[1].order_count, 0);
        assert_eq!(board.orders_by_date().len(), 1);
        assert_eq!(board.month_grid().len(), 5);

        board.calendar_mut().next_month();
        assert_eq!(board.month_orders()[0].id(), 2);
        assert_eq!(board.technician_panel()[1].order_count, 1);

        board.calendar_mut().select_date(date(2024, 3, 15));
        assert_eq!(board.selected_day_orders()[0].id(), 1);
    }

    #[test]
    fn test_save_new_work_order()
    {
        let mut board = board(PermissionSet::full_access("maintenance"));

        let work_order_id = board.save(&new_form()).unwrap();

        assert_eq!(work_order_id, 3);
        let saved = board.work_order(3).unwrap();
        assert_eq!(saved.work_order_number(), "WO-2024-0003");
        assert_eq!(board.month_orders().len(), 2);
        assert_eq!(board.technician_panel()[0].order_count, 2);
        assert_eq!(board.customers()[0].work_orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_save_edited_work_order()
    {
        let mut board = board(PermissionSet::full_access("maintenance"));

        let mut form = board.edit_form(1).unwrap();
        form.scheduled_date = Some(date(2024, 4, 9));
        form.priority = Priority::Critical;

        assert_eq!(board.save(&form), Ok(1));
        assert_eq!(board.work_orders().len(), 2);
        assert_eq!(board.work_order(1).unwrap().priority(), Priority::Critical);
        assert!(board.month_orders().is_empty());
        assert_eq!(board.customers()[0].work_orders, vec![1, 2]);
    }

    #[test]
    fn test_save_moves_work_order_between_customers()
    {
        let mut data = data();
        data.customers.push(MaintenanceCustomer {
            id: 20,
            name: "Harbor Logistics".to_string(),
            industry: "Logistics".to_string(),
            contract: None,
            locations: vec![],
            equipment: vec![EquipmentAsset {
                id: 200,
                asset_number: "AC-0200".to_string(),
                equipment_type: EquipmentType::AirConditioner,
                model: "AquaEdge 19DV".to_string(),
                serial_number: "SN-200".to_string(),
                manufacturer: "Carrier".to_string(),
                customer_id: 20,
                location: "Warehouse roof".to_string(),
                installation_date: date(2021, 6, 1),
                last_service_date: None,
                next_service_date: None,
            }],
            work_orders: vec![],
        });
        let mut board = MaintenanceBoard::new(data, BoardConfig::default(), PermissionSet::full_access("maintenance"), date(2026, 1, 1)).unwrap();

        let mut form = board.edit_form(1).unwrap();
        form.select_customer(20, board.customers());
        form.select_equipment(200);
        assert_eq!(board.save(&form), Ok(1));

        assert_eq!(board.work_order(1).unwrap().customer_id(), 20);
        assert_eq!(board.customers()[0].work_orders, vec![2]);
        assert_eq!(board.customers()[1].work_orders, vec![1]);
    }

    #[test]
    fn test_save_when_work_order_ids_are_exhausted()
    {
        let data = BoardData {
            work_orders: vec![work_order(u64::MAX, date(2024, 3, 1), vec![])],
            ..data()
        };
        let mut board = MaintenanceBoard::new(data, BoardConfig::default(), PermissionSet::full_access("maintenance"), date(2026, 1, 1)).unwrap();

        assert_eq!(board.save(&new_form()), Err(BoardError::WorkOrderIdsExhausted));
        assert_eq!(board.work_orders().len(), 1);

        // Editing does not need a fresh id.
        let mut form = board.edit_form(u64::MAX).unwrap();
        form.estimated_duration = Some(3.0);
        assert_eq!(board.save(&form), Ok(u64::MAX));
    }

    #[test]
    fn test_save_reports_missing_equipment()
    {
        let mut board = board(PermissionSet::full_access("maintenance"));
        let mut form = WorkOrderForm::new();
        form.select_customer(10, board.customers());
        form.scheduled_date = Some(date(2024, 3, 22));
        form.estimated_duration = Some(1.0);

        assert_eq!(
            board.save(&form),
            Err(BoardError::Form(WorkOrderFormError::EquipmentMissing { customer_id: 10 }))
        );
        assert_eq!(board.work_orders().len(), 2);
    }

    #[test]
    fn test_permissions_enforced()
    {
        let create_only = PermissionSet::new([PermissionGrant::new("maintenance", "work_orders", Action::Create)]);
        let mut board = board(create_only);

        assert!(board.save(&new_form()).is_ok());
        assert_eq!(
            board.delete(1),
            Err(BoardError::PermissionDenied {
                service: "maintenance".to_string(),
                resource: "work_orders".to_string(),
                action: Action::Delete,
            })
        );
        assert!(matches!(board.edit_form(1), Err(BoardError::PermissionDenied { action: Action::Edit, .. })));
        assert!(matches!(
            board.set_status(1, WorkOrderStatus::Closed),
            Err(BoardError::PermissionDenied { action: Action::Edit, .. })
        ));
        assert!(board.authorize(Action::View).is_err());
    }

    #[test]
    fn test_closure_permissions()
    {
        let read_only = |_service: &str, _resource: &str, action: Action| action == Action::View;
        let mut board = MaintenanceBoard::new(data(), BoardConfig::default(), read_only, date(2026, 1, 1)).unwrap();

        assert!(board.authorize(Action::View).is_ok());
        assert!(matches!(board.save(&new_form()), Err(BoardError::PermissionDenied { action: Action::Create, .. })));
    }

    #[test]
    fn test_delete_and_status()
    {
        let mut board = board(PermissionSet::full_access("maintenance"));

        board.set_status(2, WorkOrderStatus::InProgress).unwrap();
        assert_eq!(board.work_order(2).unwrap().status(), WorkOrderStatus::InProgress);

        let removed = board.delete(1).unwrap();
        assert_eq!(removed.id(), 1);
        assert!(board.work_order(1).is_none());
        assert_eq!(board.work_order(2).unwrap().id(), 2);
        assert_eq!(board.customers()[0].work_orders, vec![2]);

        assert_eq!(board.delete(1), Err(BoardError::WorkOrderMissing(1)));
        assert_eq!(board.set_status(9, WorkOrderStatus::Closed), Err(BoardError::WorkOrderMissing(9)));
    }

    #[test]
    fn test_search()
    {
        let board = board(PermissionSet::default());

        let found = board.search(&WorkOrderFilter::default().with_technician(2));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), 2);
    }
}
