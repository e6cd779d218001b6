//! One-time linear resampling for table building.

use tambor_core::lerp;

/// Resample `input` from `from_rate` to `to_rate` by linear interpolation.
///
/// The output covers the whole input: its length is
/// `ceil(len * to_rate / from_rate)` and nothing is truncated or padded
/// beyond that. Equal rates return the input unchanged.
pub fn resample_linear(input: &[f32], from_rate: f32, to_rate: f32) -> Vec<f32> {
    if input.is_empty() || from_rate <= 0.0 || to_rate <= 0.0 || from_rate == to_rate {
        return input.to_vec();
    }

    let step = f64::from(from_rate) / f64::from(to_rate);
    let out_len = (input.len() as f64 * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize;
    let last = input.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let index = (pos.floor() as usize).min(last);
            let frac = (pos - index as f64) as f32;
            let next = (index + 1).min(last);
            lerp(input[index], input[next], frac.clamp(0.0, 1.0))
        })
        .collect()
}
