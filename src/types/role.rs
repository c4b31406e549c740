//! Work roles, sub-roles and the permission flags that enable them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Top-level job category that decides which wizard branch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkRole {
    Mechanic,
    General,
    Truck,
    Tasco,
}

impl WorkRole {
    /// All roles in the order they are offered to the user
    pub fn all() -> &'static [WorkRole] {
        &[
            WorkRole::Mechanic,
            WorkRole::General,
            WorkRole::Truck,
            WorkRole::Tasco,
        ]
    }

    /// Wire key, also used as the `workType` payload value
    pub fn key(&self) -> &'static str {
        match self {
            WorkRole::Mechanic => "mechanic",
            WorkRole::General => "general",
            WorkRole::Truck => "truck",
            WorkRole::Tasco => "tasco",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "mechanic" => Some(WorkRole::Mechanic),
            "general" | "labor" => Some(WorkRole::General),
            "truck" | "trucking" => Some(WorkRole::Truck),
            "tasco" => Some(WorkRole::Tasco),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkRole::Mechanic => "Mechanic",
            WorkRole::General => "General Labor",
            WorkRole::Truck => "Trucking",
            WorkRole::Tasco => "Tasco",
        }
    }

    /// Sub-roles that belong to this role
    pub fn sub_roles(&self) -> &'static [ClockInRoleType] {
        match self {
            WorkRole::Mechanic => &[ClockInRoleType::Mechanic],
            WorkRole::General => &[ClockInRoleType::General],
            WorkRole::Truck => &[
                ClockInRoleType::TruckDriver,
                ClockInRoleType::TruckEquipmentOperator,
                ClockInRoleType::TruckLabor,
            ],
            WorkRole::Tasco => &[
                ClockInRoleType::TascoAbcdLabor,
                ClockInRoleType::TascoAbcdEquipment,
                ClockInRoleType::TascoEEquipment,
                ClockInRoleType::TascoFEquipment,
            ],
        }
    }

    /// Sub-role used when the role is picked without an explicit variant
    pub fn default_sub_role(&self) -> ClockInRoleType {
        self.sub_roles()[0]
    }
}

impl fmt::Display for WorkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WorkRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown work role '{}'", s))
    }
}

/// Finer-grained variant within a role; controls which optional steps run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ClockInRoleType {
    General,
    Mechanic,
    TruckDriver,
    TruckEquipmentOperator,
    TruckLabor,
    TascoAbcdLabor,
    TascoAbcdEquipment,
    TascoEEquipment,
    TascoFEquipment,
}

impl ClockInRoleType {
    pub fn key(&self) -> &'static str {
        match self {
            ClockInRoleType::General => "general",
            ClockInRoleType::Mechanic => "mechanic",
            ClockInRoleType::TruckDriver => "truckDriver",
            ClockInRoleType::TruckEquipmentOperator => "truckEquipmentOperator",
            ClockInRoleType::TruckLabor => "truckLabor",
            ClockInRoleType::TascoAbcdLabor => "tascoAbcdLabor",
            ClockInRoleType::TascoAbcdEquipment => "tascoAbcdEquipment",
            ClockInRoleType::TascoEEquipment => "tascoEEquipment",
            ClockInRoleType::TascoFEquipment => "tascoFEquipment",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        WorkRole::all()
            .iter()
            .flat_map(|r| r.sub_roles().iter())
            .copied()
            .find(|s| s.key().eq_ignore_ascii_case(key.trim()))
    }

    /// The role this sub-role belongs to
    pub fn role(&self) -> WorkRole {
        match self {
            ClockInRoleType::General => WorkRole::General,
            ClockInRoleType::Mechanic => WorkRole::Mechanic,
            ClockInRoleType::TruckDriver
            | ClockInRoleType::TruckEquipmentOperator
            | ClockInRoleType::TruckLabor => WorkRole::Truck,
            ClockInRoleType::TascoAbcdLabor
            | ClockInRoleType::TascoAbcdEquipment
            | ClockInRoleType::TascoEEquipment
            | ClockInRoleType::TascoFEquipment => WorkRole::Tasco,
        }
    }

    /// Tasco shift label for this sub-role (None outside Tasco)
    pub fn shift_type(&self) -> Option<&'static str> {
        match self {
            ClockInRoleType::TascoAbcdLabor | ClockInRoleType::TascoAbcdEquipment => {
                Some("ABCD Shift")
            }
            ClockInRoleType::TascoEEquipment => Some("E Shift"),
            ClockInRoleType::TascoFEquipment => Some("F Shift"),
            _ => None,
        }
    }

    /// F-shift crews haul no material, so material selection is skipped
    pub fn skips_material(&self) -> bool {
        matches!(self, ClockInRoleType::TascoFEquipment)
    }

    /// ABCD labor works without equipment, so the equipment step auto-advances
    pub fn skips_equipment(&self) -> bool {
        matches!(self, ClockInRoleType::TascoAbcdLabor)
    }

    /// Whether the detail step for this sub-role selects a piece of equipment
    pub fn needs_equipment(&self) -> bool {
        matches!(
            self,
            ClockInRoleType::TruckEquipmentOperator
                | ClockInRoleType::TascoAbcdEquipment
                | ClockInRoleType::TascoEEquipment
                | ClockInRoleType::TascoFEquipment
        )
    }
}

impl fmt::Display for ClockInRoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ClockInRoleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown sub-role '{}'", s))
    }
}

/// Permission-derived view flags for the current user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViewFlags {
    #[serde(default)]
    pub mechanic_view: bool,
    #[serde(default)]
    pub labor_view: bool,
    #[serde(default)]
    pub truck_view: bool,
    #[serde(default)]
    pub tasco_view: bool,
}

impl ViewFlags {
    pub fn allows(&self, role: WorkRole) -> bool {
        match role {
            WorkRole::Mechanic => self.mechanic_view,
            WorkRole::General => self.labor_view,
            WorkRole::Truck => self.truck_view,
            WorkRole::Tasco => self.tasco_view,
        }
    }
}
