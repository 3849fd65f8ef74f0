/// Patience counter over a loss sequence.
///
/// An observation improves when `loss < best - min_delta`; `patience`
/// consecutive non-improving observations trigger a stop. The payload `P`
/// is whatever produced the best loss so far.
#[derive(Clone, Debug)]
pub struct EarlyStopping<P> {
    patience: usize,
    min_delta: f64,
    best: Option<(f64, usize, P)>,
    stalled: usize,
}

impl<P> EarlyStopping<P> {
    pub fn new(patience: usize, min_delta: f64) -> Self {
        Self {
            patience,
            min_delta,
            best: None,
            stalled: 0,
        }
    }

    /// Records `loss` measured at `iteration` with `payload`; returns `true`
    /// once training should stop.
    pub fn observe(&mut self, iteration: usize, loss: f64, payload: P) -> bool {
        let improved = match &self.best {
            None => true,
            Some((best, _, _)) => loss < best - self.min_delta,
        };
        if improved {
            self.best = Some((loss, iteration, payload));
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.stalled >= self.patience
    }

    pub fn best_loss(&self) -> Option<f64> {
        self.best.as_ref().map(|(loss, _, _)| *loss)
    }

    pub fn best_iteration(&self) -> Option<usize> {
        self.best.as_ref().map(|(_, iteration, _)| *iteration)
    }

    pub fn into_best(self) -> Option<P> {
        self.best.map(|(_, _, payload)| payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_after_patience() {
        let mut es = EarlyStopping::new(2, 0.0);
        assert!(!es.observe(0, 1.0, "a"));
        assert!(!es.observe(1, 0.5, "b"));
        assert!(!es.observe(2, 0.6, "c"));
        assert!(es.observe(3, 0.5, "d"));
        assert_eq!(es.best_loss(), Some(0.5));
        assert_eq!(es.best_iteration(), Some(1));
        assert_eq!(es.into_best(), Some("b"));
    }

    #[test]
    fn test_min_delta_counts_small_gains_as_stalls() {
        let mut es = EarlyStopping::new(2, 0.1);
        es.observe(0, 1.0, 0);
        assert!(!es.observe(1, 0.95, 1));
        assert!(es.observe(2, 0.91, 2));
        assert_eq!(es.into_best(), Some(0));
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut es = EarlyStopping::new(2, 0.0);
        es.observe(0, 1.0, ());
        assert!(!es.observe(1, 1.0, ()));
        assert!(!es.observe(2, 0.1, ()));
        assert!(!es.observe(3, 0.2, ()));
        assert_eq!(es.best_iteration(), Some(2));
    }
}
