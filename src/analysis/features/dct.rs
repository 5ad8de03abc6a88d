// DCT module - orthonormal DCT-II basis for cepstral coefficients

use ndarray::Array2;

/// Orthonormal DCT-II basis truncated to the first `num_coefficients` rows.
///
/// basis[k][n] = s_k * cos(pi * k * (2n + 1) / (2N)), with s_0 = sqrt(1/N)
/// and s_k = sqrt(2/N) otherwise.
pub fn dct_basis(num_coefficients: usize, n: usize) -> Array2<f32> {
    let scale_dc = (1.0 / n as f64).sqrt();
    let scale_ac = (2.0 / n as f64).sqrt();
    Array2::from_shape_fn((num_coefficients, n), |(k, i)| {
        let angle = std::f64::consts::PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64;
        let scale = if k == 0 { scale_dc } else { scale_ac };
        (scale * angle.cos()) as f32
    })
}
