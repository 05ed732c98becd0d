use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::equipment::AssetId;
use crate::equipment::EquipmentAsset;
use crate::work_order::WorkOrderId;

pub type CustomerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractKind
{
    Comprehensive,
    Preventive,
    OnCall,
}

/// Service terms agreed with a customer. Nothing schedules against these
/// terms, they are carried for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceContract
{
    pub contract_number: String,
    pub kind: ContractKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub response_time_hours: u32,
}

impl MaintenanceContract
{
    pub fn is_active(&self, on: NaiveDate) -> bool
    {
        self.start_date <= on && on <= self.end_date
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceCustomer
{
    pub id: CustomerId,
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub contract: Option<MaintenanceContract>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<EquipmentAsset>,
    #[serde(default)]
    pub work_orders: Vec<WorkOrderId>,
}

impl MaintenanceCustomer
{
    pub fn equipment(&self, asset_id: AssetId) -> Option<&EquipmentAsset>
    {
        self.equipment.iter().find(|asset| asset.id == asset_id)
    }

    pub fn has_active_contract(&self, on: NaiveDate) -> bool
    {
        self.contract.as_ref().is_some_and(|contract| contract.is_active(on))
    }
}

#[cfg(test)]
mod tests
{
    use chrono::NaiveDate;

    use super::ContractKind;
    use super::MaintenanceContract;
    use super::MaintenanceCustomer;

    #[test]
    fn test_contract_is_active()
    {
        let contract = MaintenanceContract {
            contract_number: "MC-2024-001".to_string(),
            kind: ContractKind::Comprehensive,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            response_time_hours: 4,
        };

        assert!(contract.is_active(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(contract.is_active(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!contract.is_active(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_customer_deserializes_without_optional_lists()
    {
        let customer: MaintenanceCustomer = serde_json::from_str(r#"{ "id": 7, "name": "Harbor Hotel", "industry": "Hospitality" }"#).unwrap();

        assert_eq!(customer.id, 7);
        assert!(customer.contract.is_none());
        assert!(customer.equipment.is_empty());
        assert!(customer.equipment(1).is_none());
        assert!(!customer.has_active_contract(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }
}
