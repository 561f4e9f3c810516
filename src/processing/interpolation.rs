/// Piecewise-linear interpolation of `ys` as a function of `xs` at `x`.
///
/// `xs` must be non-decreasing and the same length as `ys`. Outside the
/// observed range the result is clamped to the first/last `ys` value; the
/// curve is never extrapolated. Returns `None` for empty input.
///
/// On flat runs of `xs` the last support point at `x` wins, matching
/// numpy's `interp`.
pub fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return None;
    }

    if x < xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[n - 1] {
        return Some(ys[n - 1]);
    }

    // Last index with xs[lo] <= x; then xs[lo] <= x < xs[lo + 1].
    let lo = xs[..n].partition_point(|&v| v <= x) - 1;
    if xs[lo] == x {
        return Some(ys[lo]);
    }

    let hi = lo + 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    Some(ys[lo] + t * (ys[hi] - ys[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_support_points() {
        let xs = [0.0, 10.0, 20.0];
        let ys = [1.0, 2.0, 4.0];
        assert_eq!(interp_clamped(&xs, &ys, 5.0), Some(1.5));
        assert_eq!(interp_clamped(&xs, &ys, 15.0), Some(3.0));
    }

    #[test]
    fn hits_support_points_exactly() {
        let xs = [5.0, 20.0, 45.0];
        let ys = [-1.0, 0.0, 1.0];
        assert_eq!(interp_clamped(&xs, &ys, 20.0), Some(0.0));
        assert_eq!(interp_clamped(&xs, &ys, 45.0), Some(1.0));
    }

    #[test]
    fn clamps_outside_range() {
        let xs = [5.0, 20.0, 45.0];
        let ys = [-1.0, 0.0, 1.0];
        assert_eq!(interp_clamped(&xs, &ys, 0.0), Some(-1.0));
        assert_eq!(interp_clamped(&xs, &ys, -50.0), Some(-1.0));
        assert_eq!(interp_clamped(&xs, &ys, 100.0), Some(1.0));
    }

    #[test]
    fn flat_run_uses_last_point_at_target() {
        let xs = [10.0, 30.0, 30.0, 60.0];
        let ys = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(interp_clamped(&xs, &ys, 30.0), Some(2.0));
        assert_eq!(interp_clamped(&xs, &ys, 20.0), Some(0.5));
        assert_eq!(interp_clamped(&xs, &ys, 45.0), Some(2.5));
    }

    #[test]
    fn flat_run_at_either_end() {
        let xs = [5.0, 5.0, 20.0, 100.0, 100.0];
        let ys = [-1.0, -0.5, 0.0, 3.0, 4.0];
        assert_eq!(interp_clamped(&xs, &ys, 5.0), Some(-0.5));
        assert_eq!(interp_clamped(&xs, &ys, 4.0), Some(-1.0));
        assert_eq!(interp_clamped(&xs, &ys, 100.0), Some(4.0));
    }

    #[test]
    fn empty_input_has_no_value() {
        assert_eq!(interp_clamped(&[], &[], 1.0), None);
    }
}
