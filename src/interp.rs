/// How to evaluate a piecewise-linear curve outside its control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrapolation {
    /// Extend the first and last segments.
    Linear,
    /// Hold the first and last control values.
    Clamp,
}

/// Evaluate the piecewise-linear curve through `(xs, ys)` at `at`.
///
/// `xs` must be strictly ascending and the same length as `ys`. A single
/// control point yields its value everywhere.
pub fn interpolate(xs: &[f32], ys: &[f32], at: f32, mode: Extrapolation) -> f32 {
    debug_assert_eq!(xs.len(), ys.len());
    match xs.len() {
        0 => return 0.0,
        1 => return ys[0],
        _ => {}
    }
    let last = xs.len() - 1;
    if mode == Extrapolation::Clamp {
        if at <= xs[0] {
            return ys[0];
        }
        if at >= xs[last] {
            return ys[last];
        }
    }
    let upper = xs.partition_point(|x| *x < at).clamp(1, last);
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    let slope = (y1 - y0) / (x1 - x0);
    y0 + slope * (at - x0)
}

/// Evaluate the curve at every entry of `at`.
pub fn interpolate_all(xs: &[f32], ys: &[f32], at: &[f32], mode: Extrapolation) -> Vec<f32> {
    at.iter()
        .map(|&value| interpolate(xs, ys, value, mode))
        .collect()
}
