use std::collections::BTreeSet;

use chrono::Datelike;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Weekday;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::equipment::EquipmentType;

pub type TechnicianId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TechnicianBuilderError
{
    #[error("technician {0} has no name")]
    MissingName(TechnicianId),
    #[error("working hours must start before they end, got {start} to {end}")]
    InvalidWorkingHours
    {
        start: NaiveTime,
        end: NaiveTime,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact
{
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// One flag per weekday.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyAvailability
{
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl WeeklyAvailability
{
    pub fn is_available(&self, weekday: Weekday) -> bool
    {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn set(&mut self, weekday: Weekday, available: bool)
    {
        let flag = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *flag = available;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WorkingHours(NaiveTime, NaiveTime);

impl WorkingHours
{
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, TechnicianBuilderError>
    {
        if start >= end {
            return Err(TechnicianBuilderError::InvalidWorkingHours { start, end });
        }
        Ok(Self(start, end))
    }

    pub fn start(&self) -> NaiveTime
    {
        self.0
    }

    pub fn end(&self) -> NaiveTime
    {
        self.1
    }

    pub fn contains(&self, time: NaiveTime) -> bool
    {
        self.0 <= time && time < self.1
    }

    pub fn duration_hours(&self) -> f64
    {
        (self.1 - self.0).num_minutes() as f64 / 60.0
    }
}

impl Default for WorkingHours
{
    fn default() -> Self
    {
        let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
        let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN);
        Self(start, end)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TechnicianData")]
pub struct Technician
{
    id: TechnicianId,
    name: String,
    contact: Contact,
    specializations: BTreeSet<EquipmentType>,
    availability: WeeklyAvailability,
    working_hours: WorkingHours,
}

/// Wire shape of a [`Technician`]. Deserialization goes through the
/// builder so that stored technicians obey the same rules.
#[derive(Deserialize)]
struct TechnicianData
{
    id: TechnicianId,
    name: String,
    #[serde(default)]
    contact: Contact,
    #[serde(default)]
    specializations: Vec<EquipmentType>,
    #[serde(default)]
    availability: WeeklyAvailability,
    #[serde(default)]
    working_hours: Option<(NaiveTime, NaiveTime)>,
}

impl TryFrom<TechnicianData> for Technician
{
    type Error = TechnicianBuilderError;

    fn try_from(value: TechnicianData) -> Result<Self, Self::Error>
    {
        let mut builder = Technician::builder(value.id, value.name)
            .contact(value.contact)
            .availability(value.availability);

        for specialization in value.specializations {
            builder = builder.add_specialization(specialization);
        }

        if let Some((start, end)) = value.working_hours {
            builder = builder.working_hours(start, end)?;
        }

        builder.build()
    }
}

pub struct TechnicianBuilder
{
    id: TechnicianId,
    name: String,
    contact: Contact,
    specializations: BTreeSet<EquipmentType>,
    availability: WeeklyAvailability,
    working_hours: WorkingHours,
}

impl TechnicianBuilder
{
    pub fn new(id: TechnicianId, name: impl Into<String>) -> Self
    {
        Self {
            id,
            name: name.into(),
            contact: Contact::default(),
            specializations: BTreeSet::new(),
            availability: WeeklyAvailability::default(),
            working_hours: WorkingHours::default(),
        }
    }

    pub fn contact(mut self, contact: Contact) -> Self
    {
        self.contact = contact;
        self
    }

    pub fn add_specialization(mut self, equipment_type: EquipmentType) -> Self
    {
        self.specializations.insert(equipment_type);
        self
    }

    /// Replaces the whole week at once.
    pub fn availability(mut self, availability: WeeklyAvailability) -> Self
    {
        self.availability = availability;
        self
    }

    pub fn available_on(mut self, weekday: Weekday) -> Self
    {
        self.availability.set(weekday, true);
        self
    }

    pub fn working_hours(mut self, start: NaiveTime, end: NaiveTime) -> Result<Self, TechnicianBuilderError>
    {
        self.working_hours = WorkingHours::new(start, end)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Technician, TechnicianBuilderError>
    {
        if self.name.trim().is_empty() {
            return Err(TechnicianBuilderError::MissingName(self.id));
        }

        Ok(Technician {
            id: self.id,
            name: self.name,
            contact: self.contact,
            specializations: self.specializations,
            availability: self.availability,
            working_hours: self.working_hours,
        })
    }
}

impl Technician
{
    pub fn builder(id: TechnicianId, name: impl Into<String>) -> TechnicianBuilder
    {
        TechnicianBuilder::new(id, name)
    }

    pub fn id(&self) -> TechnicianId
    {
        self.id
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn contact(&self) -> &Contact
    {
        &self.contact
    }

    pub fn specializations(&self) -> Vec<&EquipmentType>
    {
        self.specializations.iter().collect()
    }

    pub fn availability(&self) -> &WeeklyAvailability
    {
        &self.availability
    }

    pub fn working_hours(&self) -> WorkingHours
    {
        self.working_hours
    }

    pub fn can_service(&self, equipment_type: EquipmentType) -> bool
    {
        self.specializations.contains(&equipment_type)
    }

    pub fn is_available_on(&self, date: NaiveDate) -> bool
    {
        self.availability.is_available(date.weekday())
    }
}
