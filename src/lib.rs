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

//! [NautilusTrader](http://nautilustrader.io) adapter for the [CQG](https://www.cqg.com) WebAPI.
//!
//! The CQG WebAPI is a binary, protobuf-framed trading protocol carried over a persistent
//! WebSocket. A client logs on once, then drives short asynchronous workflows (resolving
//! accounts and symbols, subscribing to trade events, submitting orders) where every step is
//! triggered only after the server confirms the previous one.
//!
//! The `nautilus-cqg` crate provides:
//!
//! - A protobuf [`codec`] for the subset of WebAPI 2 messages used by the workflows.
//! - A sans-IO [`engine`] made of a session, a request correlator, an inbound dispatcher and a
//!   generic step-driven workflow state machine.
//! - Ready-made [`workflows`] for account discovery, algo order placement, algo strategy
//!   definition lookup and order entitlement lookup.
//! - A [`websocket`] client that runs a workflow against a live endpoint.
//!
//! # Platform
//!
//! [NautilusTrader](http://nautilustrader.io) is an open-source, high-performance, production-grade
//! algorithmic trading platform, providing quantitative traders with the ability to backtest
//! portfolios of automated trading strategies on historical data with an event-driven engine,
//! and also deploy those same strategies live, with no code changes.
//!
//! # Documentation
//!
//! - WebAPI reference: <https://partners.cqg.com/api-resources/web-api>

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod codec;
pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod websocket;
pub mod workflows;
