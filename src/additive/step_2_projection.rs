// Internal imports
use super::step_1_decomposition::AdditiveModel;

impl AdditiveModel {
    /// Projects the fitted model `periods` steps past the last
    /// observation, in chronological order
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (0..periods)
            .map(|h| self.predict_at(self.n_obs + h))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_continues_the_trend() {
        let values: Vec<f64> = (0..30).map(|i| 5.0 + 1.5 * i as f64).collect();
        let model = AdditiveModel::fit(&values, 1).unwrap();

        let forecast = model.forecast(4);
        assert_eq!(forecast.len(), 4);
        for (h, value) in forecast.iter().enumerate() {
            let expected = 5.0 + 1.5 * (30 + h) as f64;
            assert!((value - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn projection_repeats_the_seasonal_cycle() {
        // Trend plus a zero-sum cycle orthogonal to the index
        let cycle = [4.0, -8.0, 4.0];
        let values: Vec<f64> = (0..24).map(|i| 10.0 + 0.5 * i as f64 + cycle[i % 3]).collect();
        let model = AdditiveModel::fit(&values, 3).unwrap();

        let forecast = model.forecast(6);
        // n_obs = 24, so forecasts resume at cycle position 0
        for (h, value) in forecast.iter().enumerate() {
            let expected = 10.0 + 0.5 * (24 + h) as f64 + cycle[(24 + h) % 3];
            assert!((value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_periods_projects_nothing() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let model = AdditiveModel::fit(&values, 1).unwrap();
        assert!(model.forecast(0).is_empty());
    }
}
