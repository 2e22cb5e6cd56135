// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Enumerations for CQG WebAPI wire values.
//!
//! The WebAPI transmits enumerations as raw `uint32` values. These types give them names and
//! convert in both directions via [`strum::FromRepr`].

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

/// Logon result codes returned in `LogonResult.result_code`.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CqgLogonResultCode {
    Success = 0,
    Failure = 101,
    NoOnetimePassword = 103,
    PasswordExpired = 104,
    ConcurrentSessions = 105,
    Redirected = 106,
    RoutineError = 107,
    AccessTokenExpired = 108,
}

/// Order types.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CqgOrderType {
    /// Market order.
    #[default]
    Mkt = 1,
    /// Limit order.
    Lmt = 2,
    /// Stop order.
    Stp = 3,
    /// Stop-limit order.
    Stl = 4,
}

/// Order sides.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CqgOrderSide {
    #[default]
    Buy = 1,
    Sell = 2,
}

/// Order durations (time in force).
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CqgOrderDuration {
    #[default]
    Day = 1,
    Gtc = 2,
    Gtd = 3,
    Gtt = 4,
    Fak = 5,
    Fok = 6,
    Ato = 7,
    Atc = 8,
    Gfa = 9,
}

/// Trade subscription scopes.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CqgSubscriptionScope {
    Orders = 1,
    Positions = 2,
    Collaterals = 3,
    AccountSummary = 4,
}

/// Order statuses reported by `OrderStatus.status`.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CqgOrderStatus {
    InTransit = 1,
    Rejected = 2,
    Working = 3,
    Expired = 4,
    InCancel = 5,
    InModify = 6,
    Cancelled = 7,
    Filled = 8,
    Suspended = 9,
    Disconnected = 10,
    ActiveAt = 11,
    ApproveRequired = 12,
    ApprovedByExchange = 13,
    ApproveRejected = 14,
    Matched = 15,
    PartiallyMatched = 16,
    TradeBroken = 17,
}

impl CqgOrderStatus {
    /// Returns whether the order has not yet been acknowledged by the venue.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::InTransit | Self::ApproveRequired)
    }

    /// Returns whether the order was refused.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected | Self::ApproveRejected)
    }
}

macro_rules! impl_as_u32 {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Returns the raw wire value.
                #[must_use]
                pub const fn as_u32(self) -> u32 {
                    self as u32
                }
            }
        )*
    };
}

impl_as_u32!(
    CqgLogonResultCode,
    CqgOrderType,
    CqgOrderSide,
    CqgOrderDuration,
    CqgSubscriptionScope,
    CqgOrderStatus,
);
