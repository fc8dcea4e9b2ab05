//! Order lifecycle statuses.

use serde::{Deserialize, Serialize};

/// Order status lifecycle.
///
/// Strict forward sequence, no cycles, no skips:
/// `OrderCreated → ManufacturerOffer → OrderAccepted → MachineSetup →
/// StartedManufacturing → QualityCheck → Shipped → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    OrderCreated,
    ManufacturerOffer,
    OrderAccepted,
    MachineSetup,
    StartedManufacturing,
    QualityCheck,
    Shipped,
    Completed,
}

impl OrderStatus {
    /// Every status, in transition order.
    pub const SEQUENCE: [OrderStatus; 8] = [
        OrderStatus::OrderCreated,
        OrderStatus::ManufacturerOffer,
        OrderStatus::OrderAccepted,
        OrderStatus::MachineSetup,
        OrderStatus::StartedManufacturing,
        OrderStatus::QualityCheck,
        OrderStatus::Shipped,
        OrderStatus::Completed,
    ];

    /// The next status in the sequence, or `None` once `Completed`.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::OrderCreated => Some(OrderStatus::ManufacturerOffer),
            OrderStatus::ManufacturerOffer => Some(OrderStatus::OrderAccepted),
            OrderStatus::OrderAccepted => Some(OrderStatus::MachineSetup),
            OrderStatus::MachineSetup => Some(OrderStatus::StartedManufacturing),
            OrderStatus::StartedManufacturing => Some(OrderStatus::QualityCheck),
            OrderStatus::QualityCheck => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Terminal means no further transition exists.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::OrderCreated => "order_created",
            OrderStatus::ManufacturerOffer => "manufacturer_offer",
            OrderStatus::OrderAccepted => "order_accepted",
            OrderStatus::MachineSetup => "machine_setup",
            OrderStatus::StartedManufacturing => "started_manufacturing",
            OrderStatus::QualityCheck => "quality_check",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}
