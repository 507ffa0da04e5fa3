// Copyright (c) 2026 The TCPCC Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! TCPCC is a sender-side TCP congestion control library. Given a stream of
//! acknowledgment events carrying round-trip-time samples and packet counts,
//! it decides how many packets the sender may keep in flight (the congestion
//! window) and what window to fall back to after a loss (the slow start
//! threshold).
//!
//! Two algorithms are provided behind one [`CongestionController`] trait:
//!
//! * **RENO**: classic slow start plus additive increase, with the
//!   conventional half-window loss response.
//! * **RENO_BWE**: Reno growth combined with a Westwood-style bandwidth
//!   estimator, so the loss response targets the estimated bandwidth-delay
//!   product instead of blindly halving the window.
//!
//! The host transport stack owns the per-connection window fields
//! ([`SendWindow`]) and drives the algorithm through four callbacks, invoked
//! in ack/loss arrival order for each connection: `init`, `update`,
//! `on_ack_batch` and `on_loss`. All operations are short, deterministic,
//! non-blocking computations over in-memory state; serialization of calls for
//! a single connection is the host's responsibility.

/// Initial congestion window in packets, used unless the host configures a
/// larger one.
pub const INITIAL_WINDOW_PACKETS: u32 = 1;

/// Sentinel for an unset slow start threshold. A fresh connection starts in
/// slow start with its threshold at "infinity".
pub const INFINITE_SSTHRESH: u32 = u32::MAX;

/// Lower bound for the slow start threshold and the post-loss window target.
/// The window is never allowed to collapse below two packets.
pub const MIN_SSTHRESH: u32 = 2;

/// Size in bytes of the per-connection scratch block that hosts reserve for
/// algorithm private state. Each controller's private state must fit; this is
/// verified at compile time next to the state types.
pub const CA_PRIV_SIZE: usize = 128;

pub use crate::congestion_control::build_congestion_controller;
pub use crate::congestion_control::CongestionConfig;
pub use crate::congestion_control::CongestionControlAlgorithm;
pub use crate::congestion_control::CongestionController;
pub use crate::congestion_control::CongestionStats;
pub use crate::congestion_control::Reno;
pub use crate::congestion_control::RenoBwe;
pub use crate::connection::AckSample;
pub use crate::connection::SendWindow;
pub use crate::error::Error;

/// A specialized [`Result`] type for tcpcc operations.
pub type Result<T> = std::result::Result<T, Error>;

#[path = "congestion_control/congestion_control.rs"]
pub mod congestion_control;

pub mod connection;
pub mod error;
