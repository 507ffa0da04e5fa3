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

use log::*;

use super::cong_avoid_ai;
use super::slow_start;
use super::CongestionController;
use super::CongestionStats;
use crate::connection::AckSample;
use crate::connection::SendWindow;

/// Reno configuration.
#[derive(Debug, Clone)]
pub struct RenoConfig {
    /// Initial congestion window in packets.
    initial_congestion_window: u32,
}

impl RenoConfig {
    pub fn new(initial_congestion_window: u32) -> Self {
        Self {
            initial_congestion_window: initial_congestion_window.max(1),
        }
    }

    /// Update initial congestion window.
    pub fn set_initial_congestion_window(&mut self, initial_congestion_window: u32) -> &mut Self {
        self.initial_congestion_window = initial_congestion_window.max(1);
        self
    }
}

impl Default for RenoConfig {
    fn default() -> Self {
        Self {
            initial_congestion_window: crate::INITIAL_WINDOW_PACKETS,
        }
    }
}

/// Classic Reno congestion control.
///
/// Slow start doubles the window each round trip; congestion avoidance adds
/// one packet per round trip; the loss response falls back to half the
/// window, floored at two packets.
#[derive(Debug)]
pub struct Reno {
    /// Configuration.
    config: RenoConfig,

    /// Fractional additive-increase credit carried across ack batches.
    cwnd_cnt: u32,

    /// Window observed by the last growth log line. Per-connection, so
    /// connections never share logging state.
    prior_cwnd: u32,

    /// Congestion statistics.
    stats: CongestionStats,
}

impl Reno {
    pub fn new(config: RenoConfig) -> Self {
        Self {
            config,
            cwnd_cnt: 0,
            prior_cwnd: 0,
            stats: Default::default(),
        }
    }

    fn log_cwnd_change(&mut self, window: &SendWindow) {
        if window.cwnd != self.prior_cwnd {
            trace!(
                "{} cwnd {} -> {}, ssthresh {}",
                self.name(),
                self.prior_cwnd,
                window.cwnd,
                window.ssthresh
            );
            self.prior_cwnd = window.cwnd;
        }
    }
}

impl CongestionController for Reno {
    fn name(&self) -> &str {
        "RENO"
    }

    fn init(&mut self, window: &mut SendWindow) {
        window.cwnd = self
            .config
            .initial_congestion_window
            .min(window.cwnd_clamp)
            .max(1);
        window.ssthresh = crate::INFINITE_SSTHRESH;

        self.cwnd_cnt = 0;
        self.prior_cwnd = window.cwnd;
        self.stats = Default::default();

        debug!("{} init, cwnd {}", self.name(), window.cwnd);
    }

    fn update(&mut self, sample: &AckSample) {
        // Reno keeps no estimator state; samples only feed the counters.
        self.stats.pkts_acked_in_total = self
            .stats
            .pkts_acked_in_total
            .saturating_add(u64::from(sample.pkts_acked));
        if !sample.is_usable() {
            self.stats.ack_samples_ignored = self.stats.ack_samples_ignored.saturating_add(1);
        }
    }

    fn on_ack_batch(&mut self, window: &mut SendWindow, is_cwnd_limited: bool, acked: u32) {
        if !is_cwnd_limited {
            return;
        }

        let mut acked = acked;
        if window.in_slow_start() {
            acked = slow_start(window, acked);
            if acked == 0 {
                self.log_cwnd_change(window);
                return;
            }
        }

        let w = window.cwnd;
        cong_avoid_ai(window, &mut self.cwnd_cnt, w, acked);

        window.cwnd = window.cwnd.min(window.cwnd_clamp);
        self.log_cwnd_change(window);
    }

    fn on_loss(&mut self, window: &SendWindow) -> u32 {
        self.stats.loss_events = self.stats.loss_events.saturating_add(1);

        let ssthresh = (window.cwnd / 2).max(crate::MIN_SSTHRESH);
        debug!(
            "{} loss, cwnd {}, new ssthresh {}",
            self.name(),
            window.cwnd,
            ssthresh
        );
        ssthresh
    }

    fn stats(&self) -> &CongestionStats {
        &self.stats
    }
}

// Private state handed to a host scratch block must fit it.
const _: () = assert!(std::mem::size_of::<Reno>() <= crate::CA_PRIV_SIZE);
