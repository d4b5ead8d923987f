//! Rolling-window primitives.

/// Trailing simple moving average over `values`.
///
/// The output has the same length as the input. Position `i` holds the mean
/// of `values[i + 1 - window ..= i]` once the window has filled
/// (`i + 1 >= window`) and `None` during the warm-up prefix. A window that
/// never fills, or a zero window, yields all `None`; it is never zero-filled.
pub fn trailing_sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}
