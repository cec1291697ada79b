use tokio::sync::watch;

/// Remaining-work meter. Samples are `(done, total)` pairs; the published
/// value is the fraction of work left, so 0.0 means idle or complete and
/// 1.0 means nothing retrieved yet. Each sample replaces the previous
/// value outright; there is no history and no smoothing.
///
/// Clones share the same underlying value, which is how a meter doubles
/// as the progress sink handed to backend calls.
#[derive(Clone, Debug)]
pub struct ProgressMeter {
    fraction: watch::Sender<f64>,
}

impl Default for ProgressMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressMeter {
    pub fn new() -> ProgressMeter {
        let (fraction, _) = watch::channel(0.0);
        ProgressMeter { fraction }
    }

    /// Records one sample. A zero total means a zero-sized task: nothing
    /// left to do, not a division.
    pub fn observe(&self, done: usize, total: usize) {
        let fraction = if total == 0 {
            0.0
        } else {
            1.0 - done as f64 / total as f64
        };
        self.fraction.send_replace(fraction);
    }

    pub fn set(&self, fraction: f64) {
        self.fraction.send_replace(fraction);
    }

    pub fn fraction(&self) -> f64 {
        *self.fraction.borrow()
    }

    /// Await-able view for UIs; receivers only ever see the latest value.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.fraction.subscribe()
    }

    /// Atomically moves an idle meter (0.0) to "just started" (1.0).
    /// Returns false when a load is already in flight.
    pub fn try_begin(&self) -> bool {
        let mut began = false;
        self.fraction.send_if_modified(|fraction| {
            if *fraction == 0.0 {
                *fraction = 1.0;
                began = true;
                true
            } else {
                false
            }
        });
        began
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_means_complete() {
        let meter = ProgressMeter::new();
        meter.set(0.7);
        meter.observe(0, 0);
        assert_eq!(meter.fraction(), 0.0);
    }

    #[test]
    fn fraction_decreases_as_work_completes() {
        let meter = ProgressMeter::new();
        let samples = [(0, 4), (1, 4), (2, 4), (4, 4)];
        let mut last = f64::INFINITY;
        for (done, total) in samples {
            meter.observe(done, total);
            assert!(meter.fraction() < last);
            last = meter.fraction();
        }
        assert_eq!(meter.fraction(), 0.0);
    }

    #[test]
    fn each_sample_replaces_the_previous_value() {
        let meter = ProgressMeter::new();
        meter.observe(3, 4);
        meter.observe(1, 2);
        assert_eq!(meter.fraction(), 0.5);
    }

    #[test]
    fn clones_share_the_same_value() {
        let meter = ProgressMeter::new();
        let sink = meter.clone();
        sink.observe(1, 4);
        assert_eq!(meter.fraction(), 0.75);
    }

    #[test]
    fn try_begin_blocks_reentry_until_reset() {
        let meter = ProgressMeter::new();
        assert!(meter.try_begin());
        assert_eq!(meter.fraction(), 1.0);
        assert!(!meter.try_begin());

        meter.set(0.0);
        assert!(meter.try_begin());
    }

    #[tokio::test]
    async fn subscribers_are_woken_on_every_sample() {
        let meter = ProgressMeter::new();
        let mut rx = meter.subscribe();
        rx.borrow_and_update();

        meter.observe(0, 0);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 0.0);
    }
}
