//! Summary statistics over a batch of contestant results: mean, median,
//! variance, standard deviation, quartiles, min/max, and an optional
//! histogram, generalized from integer distances to the probabilities and
//! spreads a search run actually produces.

use log::info;
use plotters::prelude::*;

pub struct Statistics;

impl Statistics {
    pub fn mean(data: &[f64]) -> f64 {
        data.iter().sum::<f64>() / data.len() as f64
    }

    pub fn median(data: &[f64]) -> f64 {
        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    pub fn variance(data: &[f64]) -> f64 {
        let m = Statistics::mean(data);
        data.iter().map(|value| (value - m).powi(2)).sum::<f64>() / data.len() as f64
    }

    pub fn std_dev(data: &[f64]) -> f64 {
        Statistics::variance(data).sqrt()
    }

    pub fn min_max(data: &[f64]) -> (f64, f64) {
        let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }

    pub fn quartiles(data: &[f64]) -> (f64, f64, f64) {
        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let n = sorted.len();

        let q2 = Statistics::median(&sorted);
        let q1 = Statistics::median(&sorted[..n / 2]);
        let q3 = Statistics::median(&sorted[(n + 1) / 2..]);

        (q1, q2, q3)
    }

    /// Bins `values` into 20 buckets and renders them to `filename` as a PNG.
    pub fn plot_histogram(values: &[f64], filename: &str) {
        let (min, max) = Statistics::min_max(values);

        let root = BitMapBackend::new(filename, (1280, 720)).into_drawing_area();
        root.fill(&WHITE).unwrap();

        let bins = 20;
        let step = ((max - min) / bins as f64).max(f64::EPSILON);

        let mut counts = vec![0usize; bins];
        for &v in values {
            let mut bucket = ((v - min) / step) as usize;
            if bucket >= bins {
                bucket = bins - 1;
            }
            counts[bucket] += 1;
        }

        let y_max = counts.iter().max().copied().unwrap_or(0) + 1;

        let mut chart = ChartBuilder::on(&root)
            .caption("Streak Probability Distribution", ("sans-serif", 40))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(min..max, 0..y_max)
            .unwrap();

        chart.configure_mesh().draw().unwrap();

        for (b, &count) in counts.iter().enumerate() {
            let start = min + b as f64 * step;
            let end = start + step;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(start, 0), (end, count)],
                    BLUE.mix(0.6).filled(),
                )))
                .unwrap();
        }
    }

    /// Logs mean/median/variance/std-dev/min-max/quartiles for `values`,
    /// and saves a histogram to `histogram_file` when requested.
    pub fn generate_statistics(values: &[f64], histogram_file: Option<&str>) {
        if values.is_empty() {
            info!("No values to summarize");
            return;
        }

        info!("Mean: {}", Statistics::mean(values));
        info!("Median: {}", Statistics::median(values));
        info!("Variance: {}", Statistics::variance(values));
        info!("Std Dev: {}", Statistics::std_dev(values));
        info!("Min-Max: {:?}", Statistics::min_max(values));
        info!("Quartiles: {:?}", Statistics::quartiles(values));

        if let Some(path) = histogram_file {
            Statistics::plot_histogram(values, path);
        }
    }
}
