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

use core::str::FromStr;
use std::fmt;

use crate::connection::AckSample;
use crate::connection::SendWindow;
use crate::Error;
use crate::Result;
pub use bandwidth::BandwidthEstimator;
pub use reno::Reno;
pub use reno::RenoConfig;
pub use reno_bwe::RenoBwe;
pub use reno_bwe::RenoBweConfig;

/// Available congestion control algorithm
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum CongestionControlAlgorithm {
    /// Classic Reno: slow start plus additive increase, with the
    /// conventional half-window response to loss.
    Reno,

    /// Reno growth combined with a Westwood-style bandwidth estimator. The
    /// window is capped near the estimated bandwidth-delay product and the
    /// loss response targets the BDP instead of half the window.
    #[default]
    RenoBwe,
}

impl FromStr for CongestionControlAlgorithm {
    type Err = Error;

    fn from_str(algor: &str) -> Result<CongestionControlAlgorithm> {
        if algor.eq_ignore_ascii_case("reno") {
            Ok(CongestionControlAlgorithm::Reno)
        } else if algor.eq_ignore_ascii_case("reno_bwe") {
            Ok(CongestionControlAlgorithm::RenoBwe)
        } else {
            Err(Error::InvalidConfig("unknown".into()))
        }
    }
}

/// Congestion control statistics.
///
/// All counters are per-connection. The source of observability state being
/// per-connection (and never process-wide) is part of the contract here.
#[derive(Debug, Default, Clone)]
pub struct CongestionStats {
    /// Total packets newly acknowledged, including batches whose RTT sample
    /// was unusable.
    pub pkts_acked_in_total: u64,

    /// Ack batches that could not feed the estimators for lack of a usable
    /// RTT sample or packet count.
    pub ack_samples_ignored: u64,

    /// Total loss events reported by the host.
    pub loss_events: u64,
}

/// Congestion control configuration.
#[derive(Debug, Clone)]
pub struct CongestionConfig {
    /// The congestion control algorithm to build.
    pub congestion_control_algorithm: CongestionControlAlgorithm,

    /// Initial congestion window in packets.
    pub initial_congestion_window: u32,
}

impl Default for CongestionConfig {
    fn default() -> Self {
        Self {
            congestion_control_algorithm: CongestionControlAlgorithm::default(),
            initial_congestion_window: crate::INITIAL_WINDOW_PACKETS,
        }
    }
}

/// Congestion control interfaces shared by different algorithms.
///
/// One controller instance is owned by each connection and is only mutated by
/// that connection's callbacks, strictly in ack/loss arrival order. The host
/// invokes `update` on every ack processing pass, then `on_ack_batch`; on a
/// detected loss it invokes `on_loss` and applies the returned threshold to
/// both `ssthresh` and `cwnd` per its own multiplicative-decrease convention.
pub trait CongestionController {
    /// Name of congestion control algorithm.
    fn name(&self) -> &str;

    /// Reset the controller and the host window fields to the initial
    /// condition of a new connection. The host calls this once at connection
    /// setup, and again if it switches the connection to this algorithm.
    fn init(&mut self, window: &mut SendWindow);

    /// Feed one batch of newly acknowledged packets to the estimators.
    /// Unusable samples are ignored.
    fn update(&mut self, sample: &AckSample);

    /// Grow the congestion window after an ack batch was processed.
    ///
    /// `is_cwnd_limited` reports whether the sender was actually bottlenecked
    /// on its window this round; growth must not reward a sender that was
    /// not window-limited, so the call is a no-op when it is false.
    fn on_ack_batch(&mut self, window: &mut SendWindow, is_cwnd_limited: bool, acked: u32);

    /// Slow start threshold to adopt after a loss event.
    ///
    /// Does not mutate the window: the host applies the returned value to
    /// `ssthresh` and `cwnd` itself.
    fn on_loss(&mut self, window: &SendWindow) -> u32;

    /// Congestion window to restore after a loss detection turns out to be
    /// spurious. Both algorithms here keep the current window unchanged.
    fn undo_cwnd(&self, window: &SendWindow) -> u32 {
        window.cwnd
    }

    /// Congestion stats.
    fn stats(&self) -> &CongestionStats;
}

impl fmt::Debug for dyn CongestionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "congestion controller.")
    }
}

/// Build a congestion controller.
pub fn build_congestion_controller(conf: &CongestionConfig) -> Box<dyn CongestionController> {
    match conf.congestion_control_algorithm {
        CongestionControlAlgorithm::Reno => {
            Box::new(Reno::new(RenoConfig::new(conf.initial_congestion_window)))
        }
        CongestionControlAlgorithm::RenoBwe => Box::new(RenoBwe::new(RenoBweConfig::new(
            conf.initial_congestion_window,
        ))),
    }
}

/// Slow start growth: one packet per acknowledged packet, capped so the
/// window does not cross `ssthresh` inside this step.
///
/// Returns the portion of `acked` left unused once the window reaches
/// `ssthresh`; the caller forwards it into the additive increase of the same
/// round.
pub(crate) fn slow_start(window: &mut SendWindow, acked: u32) -> u32 {
    let cwnd = window.cwnd.saturating_add(acked).min(window.ssthresh);
    let acked = acked - (cwnd - window.cwnd);
    window.cwnd = cwnd.min(window.cwnd_clamp);
    acked
}

/// Additive increase: grow the window by `acked / w` packets, accumulating
/// the remainder in `cwnd_cnt` so growth is not lost to integer truncation
/// across many small ack batches.
pub(crate) fn cong_avoid_ai(window: &mut SendWindow, cwnd_cnt: &mut u32, w: u32, acked: u32) {
    if *cwnd_cnt >= w {
        *cwnd_cnt = 0;
        window.cwnd = window.cwnd.saturating_add(1);
    }

    *cwnd_cnt = cwnd_cnt.saturating_add(acked);
    if *cwnd_cnt >= w {
        let delta = *cwnd_cnt / w;
        *cwnd_cnt -= delta * w;
        window.cwnd = window.cwnd.saturating_add(delta);
    }

    window.cwnd = window.cwnd.min(window.cwnd_clamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn congestion_control_name() {
        let cases = [
            ("reno", Ok(CongestionControlAlgorithm::Reno)),
            ("Reno", Ok(CongestionControlAlgorithm::Reno)),
            ("RENO", Ok(CongestionControlAlgorithm::Reno)),
            ("reno_bwe", Ok(CongestionControlAlgorithm::RenoBwe)),
            ("Reno_Bwe", Ok(CongestionControlAlgorithm::RenoBwe)),
            ("RENO_BWE", Ok(CongestionControlAlgorithm::RenoBwe)),
            ("renoo", Err(Error::InvalidConfig("unknown".into()))),
            ("westwood", Err(Error::InvalidConfig("unknown".into()))),
        ];

        for (name, algor) in cases {
            assert_eq!(CongestionControlAlgorithm::from_str(name), algor);
        }
    }

    #[test]
    fn build_controller() {
        let mut conf = CongestionConfig::default();
        assert_eq!(
            conf.congestion_control_algorithm,
            CongestionControlAlgorithm::RenoBwe
        );
        let cc = build_congestion_controller(&conf);
        assert_eq!(cc.name(), "RENO_BWE");

        conf.congestion_control_algorithm = CongestionControlAlgorithm::Reno;
        let cc = build_congestion_controller(&conf);
        assert_eq!(cc.name(), "RENO");
    }

    #[test]
    fn slow_start_caps_at_ssthresh() {
        let mut window = SendWindow::new(100);
        window.cwnd = 4;
        window.ssthresh = 10;

        // 6 of the 20 acked packets are consumed reaching ssthresh.
        let remaining = slow_start(&mut window, 20);
        assert_eq!(window.cwnd, 10);
        assert_eq!(remaining, 14);

        // Already at ssthresh: nothing consumed.
        let remaining = slow_start(&mut window, 5);
        assert_eq!(window.cwnd, 10);
        assert_eq!(remaining, 5);
    }

    #[test]
    fn slow_start_respects_clamp() {
        let mut window = SendWindow::new(8);
        window.cwnd = 4;
        window.ssthresh = 10;

        let remaining = slow_start(&mut window, 20);
        assert_eq!(window.cwnd, 8);
        // The remainder is still measured against ssthresh.
        assert_eq!(remaining, 14);
    }

    #[test]
    fn cong_avoid_ai_accumulates_credit() {
        let mut window = SendWindow::new(100);
        window.cwnd = 7;
        window.ssthresh = 2;
        let mut cwnd_cnt = 0;

        // Seven single-packet batches add up to one full window of credit.
        for _ in 0..6 {
            let cwnd = window.cwnd;
            cong_avoid_ai(&mut window, &mut cwnd_cnt, cwnd, 1);
            assert_eq!(window.cwnd, 7);
        }
        let cwnd = window.cwnd;
        cong_avoid_ai(&mut window, &mut cwnd_cnt, cwnd, 1);
        assert_eq!(window.cwnd, 8);
        assert_eq!(cwnd_cnt, 0);
    }

    #[test]
    fn cong_avoid_ai_large_batch() {
        let mut window = SendWindow::new(100);
        window.cwnd = 10;
        window.ssthresh = 2;
        let mut cwnd_cnt = 0;

        // 25 packets against a window of 10 yields +2 with 5 left as credit.
        let cwnd = window.cwnd;
        cong_avoid_ai(&mut window, &mut cwnd_cnt, cwnd, 25);
        assert_eq!(window.cwnd, 12);
        assert_eq!(cwnd_cnt, 5);
    }

    #[test]
    fn cong_avoid_ai_respects_clamp() {
        let mut window = SendWindow::new(10);
        window.cwnd = 10;
        window.ssthresh = 2;
        let mut cwnd_cnt = 0;

        let cwnd = window.cwnd;
        cong_avoid_ai(&mut window, &mut cwnd_cnt, cwnd, 100);
        assert_eq!(window.cwnd, 10);
    }
}

mod bandwidth;
mod reno;
mod reno_bwe;
