//! Status enums for reservations and their line items.
//!
//! Both are stored as `TEXT` with a `CHECK` constraint; each variant's wire
//! value is the exact string persisted and exchanged over JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in lifecycle order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted wire value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "'{other}' is not a valid {}; expected one of: {}",
                        stringify!($name),
                        [$($val),+].join(", "),
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_status_enum! {
    /// Reservation header status.
    ReservationStatus {
        Cart = "en_carrito",
        Pending = "pendiente",
        Confirmed = "confirmada",
        Cancelled = "cancelada",
        Completed = "completada",
    }
}

define_status_enum! {
    /// Per line item status. Mirrors [`ReservationStatus`] variant by variant.
    LineItemStatus {
        Cart = "en_carrito",
        Pending = "pendiente",
        Confirmed = "confirmado",
        Cancelled = "cancelado",
        Completed = "completado",
    }
}

impl ReservationStatus {
    /// The line item status that corresponds to this reservation status.
    pub fn line_item_status(self) -> LineItemStatus {
        match self {
            ReservationStatus::Cart => LineItemStatus::Cart,
            ReservationStatus::Pending => LineItemStatus::Pending,
            ReservationStatus::Confirmed => LineItemStatus::Confirmed,
            ReservationStatus::Cancelled => LineItemStatus::Cancelled,
            ReservationStatus::Completed => LineItemStatus::Completed,
        }
    }

    /// Whether moving the header into this status rewrites every owned item.
    ///
    /// Only the outcomes of a pending reservation propagate; `en_carrito`
    /// and `pendiente` items are managed by the cart operations.
    pub fn propagates_to_items(self) -> bool {
        matches!(
            self,
            ReservationStatus::Confirmed
                | ReservationStatus::Cancelled
                | ReservationStatus::Completed
        )
    }
}
