use nalgebra::RealField;
use simba::scalar::SupersetOf;

/// Evaluates `f` at `num_segments + 1` evenly spaced parameters, from `t_start`
/// to `t_end` inclusive.
///
/// # Panics
///
/// Panics if `num_segments` is zero.
pub fn parametric_samples<F, S, T>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = T> + Clone
where
    F: Fn(S) -> T + Clone,
    S: RealField + SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}
