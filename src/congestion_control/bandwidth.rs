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

//! A Westwood-style bandwidth and minimum RTT estimator.
//!
//! The estimator consumes ack batches and maintains a running minimum RTT and
//! an EWMA-smoothed packets-per-second bandwidth estimate. Their product is
//! the bandwidth-delay product the window controller uses as its loss
//! recovery target and growth cap.

use crate::connection::AckSample;

/// Microseconds per second, for scaling RTT-based rates.
pub(crate) const USEC_PER_SEC: u64 = 1_000_000;

/// EWMA smoothing shift: the filtered estimate moves 1/8 of the way toward
/// each new sample, damping noise from bursty ack batching.
const BW_SMOOTHING_SHIFT: u32 = 3;

/// Bandwidth and minimum RTT estimator for a single connection.
#[derive(Debug, Default, Clone)]
pub struct BandwidthEstimator {
    /// Smallest RTT observed so far, in microseconds. Monotonically
    /// non-increasing once set; it never expires or decays, so it reflects
    /// the best RTT ever seen on the connection and does not adapt to a
    /// genuine path RTT increase such as a route change.
    min_rtt_us: Option<u32>,

    /// Most recent instantaneous bandwidth sample in packets per second.
    bw_pps: u32,

    /// EWMA-smoothed bandwidth estimate in packets per second. Zero until
    /// the first usable sample arrives.
    bw_filt_pps: u32,
}

impl BandwidthEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the state of a fresh connection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed one ack batch. Batches without a usable RTT sample or packet
    /// count leave the estimator untouched.
    pub fn update(&mut self, sample: &AckSample) {
        if !sample.is_usable() {
            return;
        }
        let rtt_us = sample.rtt_us as u64;

        match self.min_rtt_us {
            Some(min) if rtt_us >= u64::from(min) => (),
            _ => self.min_rtt_us = Some(rtt_us as u32),
        }

        // Instantaneous rate = pkts / rtt, scaled to packets per second. The
        // multiplication must stay in 64 bits: pkts * 1_000_000 overflows
        // u32 from 4295 packets up.
        let inst_pps = (u64::from(sample.pkts_acked) * USEC_PER_SEC) / rtt_us;
        self.bw_pps = inst_pps.min(u64::from(u32::MAX)) as u32;

        if self.bw_filt_pps == 0 {
            self.bw_filt_pps = self.bw_pps;
        } else {
            let filt = (7 * u64::from(self.bw_filt_pps) + u64::from(self.bw_pps))
                >> BW_SMOOTHING_SHIFT;
            self.bw_filt_pps = filt as u32;
        }
    }

    /// Smallest RTT observed so far, in microseconds.
    pub fn min_rtt_us(&self) -> Option<u32> {
        self.min_rtt_us
    }

    /// Most recent instantaneous bandwidth sample in packets per second.
    pub fn instant_bandwidth(&self) -> u32 {
        self.bw_pps
    }

    /// Smoothed bandwidth estimate in packets per second, once primed.
    pub fn bandwidth(&self) -> Option<u32> {
        if self.bw_filt_pps > 0 {
            Some(self.bw_filt_pps)
        } else {
            None
        }
    }

    /// Estimated bandwidth-delay product in packets, once both the minimum
    /// RTT and the smoothed bandwidth are known.
    pub fn bdp_packets(&self) -> Option<u64> {
        match (self.min_rtt_us, self.bandwidth()) {
            (Some(min_rtt_us), Some(bw_pps)) => {
                Some(u64::from(bw_pps) * u64::from(min_rtt_us) / USEC_PER_SEC)
            }
            _ => None,
        }
    }
}
