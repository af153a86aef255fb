//! Holiday entity - national, state and optional holidays.
//!
//! National holidays have no region. State and optional holidays may be
//! tied to a location name.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Holiday category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum HolidayType {
    /// Observed by every location.
    #[sea_orm(string_value = "national")]
    National,
    /// Observed by one location.
    #[sea_orm(string_value = "state")]
    State,
    /// Employees may take it against their optional quota.
    #[sea_orm(string_value = "optional")]
    Optional,
}

/// Holiday database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "holidays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub holiday_type: HolidayType,
    pub date: Date,
    /// Location name; `None` means every location
    pub region: Option<String>,
    pub colour: String,
    pub description: Option<String>,
    pub is_optional: bool,
}

impl Model {
    /// Whether the holiday closes the office for an employee at `location`.
    ///
    /// National holidays apply everywhere; state holidays only to their
    /// region. Optional holidays never close the office.
    pub fn is_mandatory_for(&self, location: Option<&str>) -> bool {
        if self.is_optional || self.holiday_type == HolidayType::Optional {
            return false;
        }
        match self.holiday_type {
            HolidayType::National => true,
            HolidayType::State => match (self.region.as_deref(), location) {
                (Some(region), Some(location)) => region.eq_ignore_ascii_case(location),
                _ => false,
            },
            HolidayType::Optional => false,
        }
    }

    /// Whether the holiday is visible to an employee at `location`.
    pub fn applies_to(&self, location: Option<&str>) -> bool {
        match (self.region.as_deref(), location) {
            (None, _) => true,
            (Some(region), Some(location)) => region.eq_ignore_ascii_case(location),
            (Some(_), None) => false,
        }
    }

    /// Whether this is an optional holiday.
    pub fn is_optional_holiday(&self) -> bool {
        self.is_optional || self.holiday_type == HolidayType::Optional
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn holiday(holiday_type: HolidayType, region: Option<&str>, is_optional: bool) -> Model {
        Model {
            id: 1,
            name: "Test".to_string(),
            holiday_type,
            date: NaiveDate::from_ymd_opt(2026, 4, 14).unwrap(),
            region: region.map(str::to_string),
            colour: "#ff0000".to_string(),
            description: None,
            is_optional,
        }
    }

    #[test]
    fn test_national_holiday_is_mandatory_everywhere() {
        let h = holiday(HolidayType::National, None, false);
        assert!(h.is_mandatory_for(Some("Bhubaneswar")));
        assert!(h.is_mandatory_for(None));
    }

    #[test]
    fn test_state_holiday_only_for_its_region() {
        let h = holiday(HolidayType::State, Some("Bhubaneswar"), false);
        assert!(h.is_mandatory_for(Some("bhubaneswar")));
        assert!(!h.is_mandatory_for(Some("Bangalore")));
        assert!(!h.is_mandatory_for(None));
    }

    #[test]
    fn test_optional_flag_overrides_type() {
        let h = holiday(HolidayType::National, None, true);
        assert!(!h.is_mandatory_for(Some("Bhubaneswar")));
        assert!(h.is_optional_holiday());
    }
}
