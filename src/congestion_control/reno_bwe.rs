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
use super::BandwidthEstimator;
use super::CongestionController;
use super::CongestionStats;
use crate::connection::AckSample;
use crate::connection::SendWindow;

/// The window is capped at this multiple of the estimated bandwidth-delay
/// product, so additive increase cannot push it far beyond double the
/// estimated pipe capacity.
const BDP_CAP_MULTIPLIER: u64 = 2;

/// On loss, the BDP target is distrusted beyond this multiple of the current
/// window. An estimator claiming the path carries far more than is in flight
/// is bounding noise or overshoot, not capacity.
const LOSS_TARGET_CEILING_MULTIPLIER: u64 = 4;

/// Bandwidth-aware Reno configuration.
#[derive(Debug, Clone)]
pub struct RenoBweConfig {
    /// Initial congestion window in packets.
    initial_congestion_window: u32,
}

impl RenoBweConfig {
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

impl Default for RenoBweConfig {
    fn default() -> Self {
        Self {
            initial_congestion_window: crate::INITIAL_WINDOW_PACKETS,
        }
    }
}

/// Reno with a Westwood-style bandwidth estimator.
///
/// Window growth is plain Reno for fairness. The estimator's
/// bandwidth-delay product caps the window near twice the estimated pipe
/// capacity and replaces the blind half-window loss response with a
/// BDP-informed target. Until the estimator is primed the algorithm behaves
/// exactly like Reno.
#[derive(Debug)]
pub struct RenoBwe {
    /// Configuration.
    config: RenoBweConfig,

    /// Bandwidth and minimum RTT estimator.
    bwe: BandwidthEstimator,

    /// Fractional additive-increase credit carried across ack batches.
    cwnd_cnt: u32,

    /// Window observed by the last growth log line. Per-connection, so
    /// connections never share logging state.
    prior_cwnd: u32,

    /// Congestion statistics.
    stats: CongestionStats,
}

impl RenoBwe {
    pub fn new(config: RenoBweConfig) -> Self {
        Self {
            config,
            bwe: BandwidthEstimator::new(),
            cwnd_cnt: 0,
            prior_cwnd: 0,
            stats: Default::default(),
        }
    }

    /// Access to the bandwidth estimator, e.g. for host observability.
    pub fn bandwidth_estimator(&self) -> &BandwidthEstimator {
        &self.bwe
    }

    fn log_cwnd_change(&mut self, window: &SendWindow) {
        if window.cwnd != self.prior_cwnd {
            trace!(
                "{} cwnd {} -> {}, ssthresh {}, bdp {:?}",
                self.name(),
                self.prior_cwnd,
                window.cwnd,
                window.ssthresh,
                self.bwe.bdp_packets()
            );
            self.prior_cwnd = window.cwnd;
        }
    }
}

impl CongestionController for RenoBwe {
    fn name(&self) -> &str {
        "RENO_BWE"
    }

    fn init(&mut self, window: &mut SendWindow) {
        window.cwnd = self
            .config
            .initial_congestion_window
            .min(window.cwnd_clamp)
            .max(1);
        window.ssthresh = crate::INFINITE_SSTHRESH;

        self.bwe.reset();
        self.cwnd_cnt = 0;
        self.prior_cwnd = window.cwnd;
        self.stats = Default::default();

        debug!("{} init, cwnd {}", self.name(), window.cwnd);
    }

    fn update(&mut self, sample: &AckSample) {
        self.stats.pkts_acked_in_total = self
            .stats
            .pkts_acked_in_total
            .saturating_add(u64::from(sample.pkts_acked));
        if !sample.is_usable() {
            self.stats.ack_samples_ignored = self.stats.ack_samples_ignored.saturating_add(1);
            return;
        }

        self.bwe.update(sample);
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

        // Keep the window within twice the estimated pipe capacity.
        if let Some(bdp) = self.bwe.bdp_packets() {
            let cap = bdp
                .saturating_mul(BDP_CAP_MULTIPLIER)
                .min(u64::from(u32::MAX)) as u32;
            if cap > 0 && window.cwnd > cap {
                trace!(
                    "{} bdp cap, cwnd {} -> {}, bdp {}",
                    self.name(),
                    window.cwnd,
                    cap,
                    bdp
                );
                window.cwnd = cap;
            }
        }

        window.cwnd = window.cwnd.min(window.cwnd_clamp);
        self.log_cwnd_change(window);
    }

    fn on_loss(&mut self, window: &SendWindow) -> u32 {
        self.stats.loss_events = self.stats.loss_events.saturating_add(1);

        let reno_half = (window.cwnd / 2).max(crate::MIN_SSTHRESH);

        let ssthresh = match self.bwe.bdp_packets() {
            // Not enough samples yet: degrade gracefully to plain Reno.
            None => reno_half,
            Some(bdp) => {
                let ceiling = u64::from(window.cwnd) * LOSS_TARGET_CEILING_MULTIPLIER;
                let target = if bdp < u64::from(crate::MIN_SSTHRESH) {
                    u64::from(crate::MIN_SSTHRESH)
                } else if bdp > ceiling {
                    ceiling
                } else {
                    bdp
                };
                (target.min(u64::from(u32::MAX)) as u32).max(crate::MIN_SSTHRESH)
            }
        };

        debug!(
            "{} loss, cwnd {}, bdp {:?}, new ssthresh {}",
            self.name(),
            window.cwnd,
            self.bwe.bdp_packets(),
            ssthresh
        );
        ssthresh
    }

    fn stats(&self) -> &CongestionStats {
        &self.stats
    }
}

// Private state handed to a host scratch block must fit it.
const _: () = assert!(std::mem::size_of::<RenoBwe>() <= crate::CA_PRIV_SIZE);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn new_reno_bwe(cwnd: u32, ssthresh: u32, cwnd_clamp: u32) -> (RenoBwe, SendWindow) {
        let mut cc = RenoBwe::new(RenoBweConfig::default());
        let mut window = SendWindow::new(cwnd_clamp);
        cc.init(&mut window);
        window.cwnd = cwnd;
        window.ssthresh = ssthresh;
        (cc, window)
    }

    /// Feed identical samples until the EWMA settles at the sample rate.
    fn prime_estimator(cc: &mut RenoBwe, rtt_us: i64, pkts: u32) {
        for _ in 0..64 {
            cc.update(&AckSample::new(rtt_us, pkts));
        }
    }

    #[test]
    fn reno_bwe_init_resets_estimator() {
        let (mut cc, mut window) = new_reno_bwe(4, 10, 100);
        prime_estimator(&mut cc, 100_000, 10);
        assert!(cc.bandwidth_estimator().bdp_packets().is_some());

        cc.init(&mut window);
        assert_eq!(cc.bandwidth_estimator().bdp_packets(), None);
        assert_eq!(window.cwnd, 1);
        assert_eq!(window.ssthresh, crate::INFINITE_SSTHRESH);
    }

    #[test]
    fn reno_bwe_not_cwnd_limited_is_noop() {
        let (mut cc, mut window) = new_reno_bwe(4, 10, 100);
        prime_estimator(&mut cc, 100_000, 10);

        for acked in [1, 7, 100] {
            cc.on_ack_batch(&mut window, false, acked);
            assert_eq!(window.cwnd, 4);
        }
    }

    #[test]
    fn reno_bwe_grows_like_reno_without_estimates() {
        let (mut cc, mut window) = new_reno_bwe(4, 10, 100);

        cc.on_ack_batch(&mut window, true, 20);
        assert_eq!(window.cwnd, 11);
        assert_eq!(window.in_slow_start(), false);
    }

    #[test]
    fn reno_bwe_bdp_caps_growth() {
        init_logger();
        let (mut cc, mut window) = new_reno_bwe(4, 10, 100);

        // 100 pps at 100ms min RTT: BDP = 10 packets, cap = 20.
        prime_estimator(&mut cc, 100_000, 10);
        assert_eq!(cc.bandwidth_estimator().bdp_packets(), Some(10));

        // Slow start up to ssthresh, then additive increase; the cap bites
        // once the window would pass 20.
        for _ in 0..500 {
            let cwnd = window.cwnd;
            cc.on_ack_batch(&mut window, true, cwnd);
        }
        assert_eq!(window.cwnd, 20);
    }

    #[test]
    fn reno_bwe_pure_slow_start_skips_bdp_cap() {
        let (mut cc, mut window) = new_reno_bwe(4, 100, 1000);
        prime_estimator(&mut cc, 100_000, 10);

        // Entirely inside slow start the window may overshoot the BDP cap;
        // the cap only applies on the additive-increase path.
        cc.on_ack_batch(&mut window, true, 30);
        assert_eq!(window.cwnd, 34);
    }

    #[test]
    fn reno_bwe_loss_without_estimates_is_reno() {
        let (mut cc, window) = new_reno_bwe(20, 100, 100);
        assert_eq!(cc.on_loss(&window), 10);

        let (mut cc, window) = new_reno_bwe(2, 100, 100);
        assert_eq!(cc.on_loss(&window), 2);
    }

    #[test]
    fn reno_bwe_loss_targets_bdp() {
        let (mut cc, window) = new_reno_bwe(100, 100, 1000);

        // BDP = 40 packets sits between the floor and the ceiling.
        prime_estimator(&mut cc, 200_000, 40);
        assert_eq!(cc.bandwidth_estimator().bdp_packets(), Some(40));
        assert_eq!(cc.on_loss(&window), 40);
    }

    #[test]
    fn reno_bwe_loss_target_floor() {
        let (mut cc, window) = new_reno_bwe(100, 100, 1000);

        // 1000 pps at 1ms min RTT: BDP of 1 packet is floored at 2.
        prime_estimator(&mut cc, 1_000, 1);
        assert_eq!(cc.on_loss(&window), 2);
    }

    #[test]
    fn reno_bwe_loss_target_ceiling() {
        let (mut cc, window) = new_reno_bwe(4, 100, 1000);

        // BDP = 100 packets, far beyond 4 * cwnd = 16: distrust it.
        prime_estimator(&mut cc, 100_000, 100);
        assert_eq!(cc.on_loss(&window), 16);
    }

    #[test]
    fn reno_bwe_loss_target_bounds_randomized() {
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let cwnd = rng.gen_range(2..10_000);
            let (mut cc, window) = new_reno_bwe(cwnd, 100, u32::MAX);

            if rng.gen_bool(0.5) {
                prime_estimator(&mut cc, rng.gen_range(1..1_000_000), rng.gen_range(1..1000));
            }

            let ssthresh = cc.on_loss(&window);
            assert!(ssthresh >= crate::MIN_SSTHRESH);
            match cc.bandwidth_estimator().bdp_packets() {
                Some(_) => assert!(u64::from(ssthresh) <= u64::from(cwnd) * 4),
                None => assert_eq!(ssthresh, (cwnd / 2).max(2)),
            }
        }
    }

    #[test]
    fn reno_bwe_clamp_respected_randomized() {
        let mut rng = rand::thread_rng();
        let (mut cc, mut window) = new_reno_bwe(4, 50, 64);

        for _ in 0..2000 {
            cc.update(&AckSample::new(
                rng.gen_range(-10..500_000),
                rng.gen_range(0..64),
            ));
            cc.on_ack_batch(&mut window, rng.gen_bool(0.8), rng.gen_range(0..64));
            assert!(window.cwnd <= window.cwnd_clamp);
            assert!(window.cwnd >= 1);
        }
    }

    #[test]
    fn reno_bwe_undo_cwnd_is_passthrough() {
        let (cc, window) = new_reno_bwe(23, 100, 100);

        for _ in 0..3 {
            assert_eq!(cc.undo_cwnd(&window), 23);
        }
        assert_eq!(window.cwnd, 23);
    }
}
