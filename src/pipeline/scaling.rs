//! Feature standardisation (zero mean, unit variance)

use faer::Mat;

/// Per-column location and scale learned from a training matrix
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    /// Population standard deviation, or 1.0 for constant columns
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Learn means and standard deviations from the rows of `x`
    pub fn fit(x: &Mat<f64>) -> Self {
        let (n, p) = (x.nrows(), x.ncols());
        let mut means = vec![0.0; p];
        let mut scales = vec![1.0; p];
        if n == 0 {
            return Self { means, scales };
        }

        for j in 0..p {
            let mean = (0..n).map(|i| x[(i, j)]).sum::<f64>() / n as f64;
            let var = (0..n).map(|i| (x[(i, j)] - mean).powi(2)).sum::<f64>() / n as f64;
            let std = var.sqrt();
            means[j] = mean;
            // Constant columns are only centred
            scales[j] = if std > 10.0 * f64::EPSILON * mean.abs().max(1.0) {
                std
            } else {
                1.0
            };
        }

        Self { means, scales }
    }

    /// Apply the learned transform to any matrix with the same columns
    pub fn transform(&self, x: &Mat<f64>) -> Mat<f64> {
        Mat::from_fn(x.nrows(), x.ncols(), |i, j| {
            (x[(i, j)] - self.means[j]) / self.scales[j]
        })
    }

    pub fn fit_transform(x: &Mat<f64>) -> (Self, Mat<f64>) {
        let scaler = Self::fit(x);
        let scaled = scaler.transform(x);
        (scaler, scaled)
    }
}
