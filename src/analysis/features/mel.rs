// Mel module - Slaney mel filterbank and power-to-decibel conversion
//
// Mel scale (Slaney): linear below 1 kHz (200/3 Hz per mel), logarithmic
// above with step ln(6.4)/27. Triangular filters are area-normalised by
// 2 / (f_upper - f_lower).

use ndarray::Array2;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

/// Power floor before taking the logarithm
pub const AMIN: f32 = 1e-10;
/// Dynamic range kept below the spectrogram maximum
pub const TOP_DB: f32 = 80.0;

fn log_step() -> f64 {
    6.4_f64.ln() / 27.0
}

pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Build a (n_mels, n_fft / 2 + 1) filterbank spanning 0 Hz to Nyquist.
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Array2<f32> {
    let n_bins = n_fft / 2 + 1;
    let nyquist = sample_rate as f64 / 2.0;

    let fft_freqs: Vec<f64> = (0..n_bins)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    let mel_max = hz_to_mel(nyquist);
    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();

    let mut weights = Array2::<f32>::zeros((n_mels, n_bins));
    for m in 0..n_mels {
        let (lower_hz, center_hz, upper_hz) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
        let enorm = 2.0 / (upper_hz - lower_hz);
        for (k, &freq) in fft_freqs.iter().enumerate() {
            let rising = (freq - lower_hz) / (center_hz - lower_hz);
            let falling = (upper_hz - freq) / (upper_hz - center_hz);
            let weight = rising.min(falling).max(0.0);
            weights[[m, k]] = (weight * enorm) as f32;
        }
    }

    weights
}

/// Convert power to decibels in place: 10 * log10(max(AMIN, S)), then clip
/// to `max - TOP_DB`.
pub fn power_to_db(spectrogram: &mut Array2<f32>) {
    spectrogram.mapv_inplace(|power| 10.0 * power.max(AMIN).log10());
    let max = spectrogram.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = max - TOP_DB;
    spectrogram.mapv_inplace(|db| db.max(floor));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mel_scale_anchor_points() {
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
        assert!((hz_to_mel(500.0) - 7.5).abs() < 1e-9);
        assert!((mel_to_hz(15.0) - 1000.0).abs() < 1e-9);
        for hz in [0.0, 120.0, 999.0, 1000.0, 4000.0, 11025.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
    }

    #[test]
    fn test_filterbank_shape_and_coverage() {
        let fb = mel_filterbank(22050, 2048, 128);
        assert_eq!(fb.shape(), &[128, 1025]);
        assert!(fb.iter().all(|&w| w >= 0.0));
        for row in fb.rows() {
            assert!(row.iter().any(|&w| w > 0.0), "every band covers a bin");
        }
    }

    #[test]
    fn test_filter_centers_ascend() {
        let fb = mel_filterbank(16000, 512, 40);
        let centers: Vec<usize> = fb
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                    .map(|(i, _)| i)
                    .unwrap()
            })
            .collect();
        assert!(centers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_power_to_db_floor_and_top_db() {
        let mut spec = array![[1.0_f32, 0.0], [1e-12, 100.0]];
        power_to_db(&mut spec);
        assert!((spec[[1, 1]] - 20.0).abs() < 1e-4);
        assert!(spec[[0, 0]].abs() < 1e-4);
        // Both tiny values clip to max - 80 dB.
        assert!((spec[[0, 1]] + 60.0).abs() < 1e-4);
        assert!((spec[[1, 0]] + 60.0).abs() < 1e-4);
    }
}
