//! Fixed tables of known downstream services, API operations and the
//! per-operation statistics buckets.
//!
//! Matching is substring based and ordered: the first entry whose pattern
//! occurs in the searched text wins, so more specific patterns must come first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Downstream system a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Windsurfer,
    Sabre,
    Oracle,
}

impl Service {
    /// Preference order used when a label mentions more than one service.
    pub const ALL: [Service; 3] = [Service::Windsurfer, Service::Sabre, Service::Oracle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Windsurfer => "windsurfer",
            Service::Sabre => "sabre",
            Service::Oracle => "oracle",
        }
    }

    /// First known service whose name occurs in `text`.
    pub fn find_in(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|service| text.contains(service.as_str()))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Remote API call type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    GetRateCalendar,
    GetAvailability,
    GetRoomDetails,
    GetAddons,
    GetPackage,
    GetRoomRate,
    MakeReservation,
    CancelReservation,
    ModifyReservation,
    GetReservation,
    CreateConfig,
    ReadConfig,
    UpdateConfig,
    DeleteConfig,
    ListAllConfigs,
    GetPricingInfo,
}

impl Operation {
    /// Substring match order. No pattern is a substring of a later one.
    pub const MATCH_ORDER: [Operation; 16] = [
        Operation::GetRateCalendar,
        Operation::GetAvailability,
        Operation::GetRoomDetails,
        Operation::GetAddons,
        Operation::GetPackage,
        Operation::GetRoomRate,
        Operation::MakeReservation,
        Operation::CancelReservation,
        Operation::ModifyReservation,
        Operation::GetReservation,
        Operation::CreateConfig,
        Operation::ReadConfig,
        Operation::UpdateConfig,
        Operation::DeleteConfig,
        Operation::ListAllConfigs,
        Operation::GetPricingInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetRateCalendar => "GetRateCalendar",
            Operation::GetAvailability => "GetAvailability",
            Operation::GetRoomDetails => "GetRoomDetails",
            Operation::GetAddons => "GetAddons",
            Operation::GetPackage => "GetPackage",
            Operation::GetRoomRate => "GetRoomRate",
            Operation::MakeReservation => "MakeReservation",
            Operation::CancelReservation => "CancelReservation",
            Operation::ModifyReservation => "ModifyReservation",
            Operation::GetReservation => "GetReservation",
            Operation::CreateConfig => "CreateConfig",
            Operation::ReadConfig => "ReadConfig",
            Operation::UpdateConfig => "UpdateConfig",
            Operation::DeleteConfig => "DeleteConfig",
            Operation::ListAllConfigs => "ListAllConfigs",
            Operation::GetPricingInfo => "GetPricingInfo",
        }
    }

    /// First known operation whose name occurs in `text`, in match order.
    pub fn find_in(text: &str) -> Option<Self> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|operation| text.contains(operation.as_str()))
    }

    /// Statistics bucket for this operation. Configuration calls have none.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Operation::GetRateCalendar => Some(Endpoint::RateCalendar),
            Operation::GetAvailability => Some(Endpoint::Availability),
            Operation::GetRoomDetails => Some(Endpoint::RoomDetails),
            Operation::GetAddons => Some(Endpoint::Addons),
            Operation::GetPackage => Some(Endpoint::Package),
            Operation::GetRoomRate => Some(Endpoint::RoomRate),
            Operation::MakeReservation => Some(Endpoint::MakeReservation),
            Operation::GetReservation => Some(Endpoint::GetReservation),
            Operation::CancelReservation => Some(Endpoint::CancelReservation),
            Operation::ModifyReservation => Some(Endpoint::ModifyReservation),
            Operation::GetPricingInfo => Some(Endpoint::GetPricingInfo),
            Operation::CreateConfig
            | Operation::ReadConfig
            | Operation::UpdateConfig
            | Operation::DeleteConfig
            | Operation::ListAllConfigs => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|operation| operation.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Per-operation statistics bucket, in export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    RateCalendar,
    Availability,
    RoomDetails,
    Addons,
    Package,
    RoomRate,
    MakeReservation,
    GetReservation,
    CancelReservation,
    ModifyReservation,
    GetPricingInfo,
}

impl Endpoint {
    pub const ALL: [Endpoint; 11] = [
        Endpoint::RateCalendar,
        Endpoint::Availability,
        Endpoint::RoomDetails,
        Endpoint::Addons,
        Endpoint::Package,
        Endpoint::RoomRate,
        Endpoint::MakeReservation,
        Endpoint::GetReservation,
        Endpoint::CancelReservation,
        Endpoint::ModifyReservation,
        Endpoint::GetPricingInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::RateCalendar => "rate_calendar",
            Endpoint::Availability => "availability",
            Endpoint::RoomDetails => "room_details",
            Endpoint::Addons => "addons",
            Endpoint::Package => "package",
            Endpoint::RoomRate => "room_rate",
            Endpoint::MakeReservation => "make_reservation",
            Endpoint::GetReservation => "get_reservation",
            Endpoint::CancelReservation => "cancel_reservation",
            Endpoint::ModifyReservation => "modify_reservation",
            Endpoint::GetPricingInfo => "get_pricing_info",
        }
    }

    /// Column heading prefix, e.g. "Rate Calendar".
    pub fn title(&self) -> &'static str {
        match self {
            Endpoint::RateCalendar => "Rate Calendar",
            Endpoint::Availability => "Availability",
            Endpoint::RoomDetails => "Room Details",
            Endpoint::Addons => "Addons",
            Endpoint::Package => "Package",
            Endpoint::RoomRate => "Room Rate",
            Endpoint::MakeReservation => "Make Reservation",
            Endpoint::GetReservation => "Get Reservation",
            Endpoint::CancelReservation => "Cancel Reservation",
            Endpoint::ModifyReservation => "Modify Reservation",
            Endpoint::GetPricingInfo => "Get Pricing Info",
        }
    }

    /// Exact-match dispatch from an operation name to its bucket.
    pub fn for_operation_name(name: &str) -> Option<Self> {
        name.parse::<Operation>()
            .ok()
            .and_then(|operation| operation.endpoint())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog name: {0}")]
pub struct UnknownName(pub String);
