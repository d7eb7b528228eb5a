//! Wave progression bookkeeping and per-row spawn pressure.

#[derive(Clone, Copy, Debug)]
pub(crate) struct WaveState {
    /// One-based number of the most recently started wave. The opening
    /// garrison counts as wave one.
    pub(crate) current_wave: u32,
    pub(crate) completion_emitted: bool,
}

impl WaveState {
    pub(crate) fn new() -> Self {
        Self {
            current_wave: 1,
            completion_emitted: false,
        }
    }
}

/// Cumulative spawn pressure per row, consumed by flare reactions.
#[derive(Clone, Debug)]
pub(crate) struct RowPressure {
    counters: Vec<u32>,
}

impl RowPressure {
    pub(crate) fn new(rows: u32) -> Self {
        Self {
            counters: vec![0; usize::try_from(rows).unwrap_or(0)],
        }
    }

    pub(crate) fn add(&mut self, row: u32, amount: u32) {
        if let Some(counter) = self.counter_mut(row) {
            *counter = counter.saturating_add(amount);
        }
    }

    pub(crate) fn reset(&mut self, row: u32) {
        if let Some(counter) = self.counter_mut(row) {
            *counter = 0;
        }
    }

    /// Deducts `threshold` from the row's counter when it is covered,
    /// reporting whether the deduction happened. A zero threshold never
    /// consumes, so misconfiguration cannot spin forever.
    pub(crate) fn try_consume(&mut self, row: u32, threshold: u32) -> bool {
        if threshold == 0 {
            return false;
        }
        match self.counter_mut(row) {
            Some(counter) if *counter >= threshold => {
                *counter -= threshold;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn counters(&self) -> &[u32] {
        &self.counters
    }

    fn counter_mut(&mut self, row: u32) -> Option<&mut u32> {
        usize::try_from(row)
            .ok()
            .and_then(|index| self.counters.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::RowPressure;

    #[test]
    fn pressure_accumulates_and_consumes_per_threshold() {
        let mut pressure = RowPressure::new(5);
        pressure.add(2, 18);
        assert!(pressure.try_consume(2, 9));
        assert!(pressure.try_consume(2, 9));
        assert!(!pressure.try_consume(2, 9));
        assert_eq!(pressure.counters()[2], 0);
    }

    #[test]
    fn out_of_range_rows_are_ignored() {
        let mut pressure = RowPressure::new(2);
        pressure.add(9, 4);
        pressure.reset(9);
        assert!(!pressure.try_consume(9, 1));
        assert_eq!(pressure.counters(), &[0, 0]);
    }

    #[test]
    fn zero_threshold_never_consumes() {
        let mut pressure = RowPressure::new(1);
        pressure.add(0, 100);
        assert!(!pressure.try_consume(0, 0));
    }
}
