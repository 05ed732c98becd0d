use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::customer::CustomerId;

pub type AssetId = u64;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType
{
    Generator,
    AirConditioner,
    Ups,
    Transformer,
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentAsset
{
    pub id: AssetId,
    pub asset_number: String,
    pub equipment_type: EquipmentType,
    pub model: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub customer_id: CustomerId,
    pub location: String,
    pub installation_date: NaiveDate,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_service_date: Option<NaiveDate>,
}

impl EquipmentAsset
{
    /// An asset without a planned next service is never due.
    pub fn is_service_due(&self, on: NaiveDate) -> bool
    {
        self.next_service_date.is_some_and(|next_service| next_service <= on)
    }
}
