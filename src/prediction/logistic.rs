/// Bounded logistic growth curve: `rating(t) = L / (1 + exp(-k * (t - t0)))`.
///
/// Monotonically increasing in `t` for `k > 0`, saturating at the ceiling `L`.
pub fn logistic(t: f64, l: f64, k: f64, t0: f64) -> f64 {
    l / (1.0 + (-k * (t - t0)).exp())
}

/// A fitted logistic curve plus the training time window.
///
/// Created by the fitter, consumed by the projector. Lives for one
/// prediction request; never persisted or shared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticModel {
    pub l: f64,
    pub k: f64,
    pub t0: f64,
    pub t_min: f64,
    pub t_max: f64,
}

impl LogisticModel {
    pub fn evaluate(&self, t: f64) -> f64 {
        logistic(t, self.l, self.k, self.t0)
    }
}
