// numeric helpers used to check symbolic results against plain floating point

/// `num_values` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            (0..num_values).map(|i| start + i as f64 * step).collect()
        }
    }
}

/*
    let x_values = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let h = 0.001;
    let derivatives = numerical_derivative(f, x_values, h);
*/
/// Central difference (f(x+h) - f(x-h)) / 2h at every point.
pub fn numerical_derivative<F>(f: F, x_values: Vec<f64>, h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    x_values
        .into_iter()
        .map(|x| (f(x + h) - f(x - h)) / (2.0 * h))
        .collect()
}

/// Root-mean-square difference of two equally long vectors.
pub fn norm(x: Vec<f64>, y: Vec<f64>) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len().min(y.len()) as f64;
    (x.iter().zip(y.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>() / n).sqrt()
}
