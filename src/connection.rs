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

//! Per-connection state exchanged between the host transport stack and the
//! congestion control algorithms.

/// Send window state of a single connection.
///
/// These fields are owned by the host's connection object. The congestion
/// control algorithm reads and writes `cwnd` and `ssthresh`; `cwnd_clamp` is
/// read-only to the algorithm and constant for the connection's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendWindow {
    /// Congestion window in packets. Always at least 1 and never above
    /// `cwnd_clamp`.
    pub cwnd: u32,

    /// Slow start threshold in packets. Starts at the "infinite" sentinel so
    /// a fresh connection begins in slow start.
    pub ssthresh: u32,

    /// Hard upper bound on `cwnd` in packets, set by the host.
    pub cwnd_clamp: u32,
}

impl SendWindow {
    /// Create a send window at the initial condition of a new connection.
    pub fn new(cwnd_clamp: u32) -> Self {
        Self {
            cwnd: crate::INITIAL_WINDOW_PACKETS,
            ssthresh: crate::INFINITE_SSTHRESH,
            cwnd_clamp,
        }
    }

    /// Whether the connection is in the slow start phase.
    ///
    /// The phase is derived by comparing `cwnd` and `ssthresh` on every call
    /// rather than stored, so the connection conceptually re-enters slow
    /// start whenever `ssthresh` rises above the current window.
    pub fn in_slow_start(&self) -> bool {
        self.cwnd < self.ssthresh
    }
}

impl Default for SendWindow {
    fn default() -> Self {
        Self::new(u32::MAX)
    }
}

/// A batch of newly acknowledged packets with the RTT sample the host
/// computed from wire-level ack/timestamp data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AckSample {
    /// RTT sample in microseconds. Values of zero or below mean the batch
    /// carried no usable RTT sample, e.g. a timestamp-less ack.
    pub rtt_us: i64,

    /// Count of packets newly acknowledged in this batch.
    pub pkts_acked: u32,
}

impl AckSample {
    /// Create an ack sample.
    pub fn new(rtt_us: i64, pkts_acked: u32) -> Self {
        Self { rtt_us, pkts_acked }
    }

    /// Whether the sample can feed the bandwidth and RTT estimators.
    ///
    /// A sample is unusable when it lacks a positive RTT, acknowledges no
    /// packets, or carries an RTT beyond the 32 bit microsecond range the
    /// estimators track.
    pub fn is_usable(&self) -> bool {
        self.rtt_us > 0 && self.rtt_us <= i64::from(u32::MAX) && self.pkts_acked > 0
    }
}
