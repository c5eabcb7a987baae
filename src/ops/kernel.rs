//! Convolution kernels and the height map filter built on them.

use rayon::prelude::*;

/// Square-or-rectangular convolution matrix with an anchor offset
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    x_offset: usize,
    y_offset: usize,
    /// Row-major weights
    data: Vec<f64>,
}

impl Kernel {
    /// Build from row-major weights. Returns `None` if the weight count does
    /// not match the dimensions or the anchor lies outside the kernel.
    pub fn new(width: usize, height: usize, x_offset: usize, y_offset: usize, data: Vec<f64>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width * height || x_offset >= width || y_offset >= height {
            return None;
        }
        Some(Self {
            width,
            height,
            x_offset,
            y_offset,
            data,
        })
    }

    /// Centered square kernel of side `2 * radius + 1` from a weight function
    /// of the offset from the center, normalized to sum to one.
    fn centered(radius: usize, weight: impl Fn(f64, f64) -> f64) -> Self {
        let diameter = radius * 2 + 1;
        let center = radius as f64;
        let mut data = Vec::with_capacity(diameter * diameter);
        for y in 0..diameter {
            for x in 0..diameter {
                data.push(weight(x as f64 - center, y as f64 - center));
            }
        }
        let sum: f64 = data.iter().sum();
        if sum > 0.0 {
            data.iter_mut().for_each(|w| *w /= sum);
        }
        Self {
            width: diameter,
            height: diameter,
            x_offset: radius,
            y_offset: radius,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn weight(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    pub fn weights(&self) -> &[f64] {
        &self.data
    }
}

/// Gaussian blur kernel
pub struct GaussianKernel;

impl GaussianKernel {
    /// Kernel of side `2 * radius + 1` with standard deviation `sigma`
    pub fn new(radius: usize, sigma: f64) -> Kernel {
        let denominator = 2.0 * sigma * sigma;
        Kernel::centered(radius, |dx, dy| (-(dx * dx + dy * dy) / denominator).exp())
    }
}

/// Box blur kernel, every cell weighted equally
pub struct LinearKernel;

impl LinearKernel {
    pub fn new(radius: usize) -> Kernel {
        Kernel::centered(radius, |_, _| 1.0)
    }
}

/// Convolves a 2-D height map with a kernel.
///
/// Samples beyond the border repeat the nearest edge value, and every output
/// is rounded half up to an integer height.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMapFilter {
    kernel: Kernel,
}

impl HeightMapFilter {
    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Filter a row-major `width * height` map.
    ///
    /// Each output row reads only `input`, so rows are spread across the
    /// rayon pool. The result matches a serial pass bit for bit and no world
    /// state is touched here; edits still commit on the caller's thread.
    pub fn filter(&self, input: &[i32], width: usize, height: usize) -> Vec<i32> {
        debug_assert_eq!(input.len(), width * height);
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let kernel = &self.kernel;
        let mut output = vec![0; width * height];
        output.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut z = 0.0;
                for ky in 0..kernel.height {
                    let sy = clamp_index(y + ky, kernel.y_offset, height);
                    for kx in 0..kernel.width {
                        let sx = clamp_index(x + kx, kernel.x_offset, width);
                        z += kernel.weight(kx, ky) * input[sy * width + sx] as f64;
                    }
                }
                *out = (z + 0.5).floor() as i32;
            }
        });
        output
    }

    /// Apply the filter `iterations` times; zero iterations is the identity
    pub fn filter_n(&self, input: &[i32], width: usize, height: usize, iterations: usize) -> Vec<i32> {
        let mut data = input.to_vec();
        for _ in 0..iterations {
            data = self.filter(&data, width, height);
        }
        data
    }
}

/// `shifted - offset` clamped to `[0, len)`
fn clamp_index(shifted: usize, offset: usize, len: usize) -> usize {
    shifted.saturating_sub(offset).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_normalized_and_symmetric() {
        let kernel = GaussianKernel::new(2, 1.0);
        assert_eq!(kernel.width(), 5);
        let sum: f64 = kernel.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(kernel.weight(0, 2), kernel.weight(4, 2));
        assert!(kernel.weight(2, 2) > kernel.weight(1, 2));
    }

    #[test]
    fn test_linear_weights_equal() {
        let kernel = LinearKernel::new(1);
        assert!(kernel.weights().iter().all(|w| (w - 1.0 / 9.0).abs() < 1e-12));
    }

    #[test]
    fn test_kernel_new_validates() {
        assert!(Kernel::new(2, 2, 0, 0, vec![0.25; 4]).is_some());
        assert!(Kernel::new(2, 2, 0, 0, vec![0.25; 3]).is_none());
        assert!(Kernel::new(2, 2, 2, 0, vec![0.25; 4]).is_none());
    }

    #[test]
    fn test_flat_map_unchanged() {
        let filter = HeightMapFilter::new(GaussianKernel::new(5, 1.0));
        let input = vec![12; 7 * 4];
        assert_eq!(filter.filter(&input, 7, 4), input);
    }

    #[test]
    fn test_box_blur_spike() {
        let filter = HeightMapFilter::new(LinearKernel::new(1));
        #[rustfmt::skip]
        let input = vec![
            0, 0, 0,
            0, 9, 0,
            0, 0, 0,
        ];
        // Center sees the whole spike, edges clamp so corners see it once
        let output = filter.filter(&input, 3, 3);
        assert_eq!(output[4], 1);
        assert_eq!(output[0], 1);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let filter = HeightMapFilter::new(GaussianKernel::new(1, 1.0));
        let input = vec![1, 5, 2, 8];
        assert_eq!(filter.filter_n(&input, 2, 2, 0), input);
    }

    #[test]
    fn test_rows_match_serial_pass() {
        // Off-center anchor so edge clamping differs per side
        let kernel = Kernel::new(3, 2, 2, 0, vec![0.1, 0.2, 0.3, 0.15, 0.15, 0.1]).unwrap();
        let filter = HeightMapFilter::new(kernel.clone());
        let (width, height) = (23, 17);
        let input: Vec<i32> = (0..width * height).map(|i| ((i * 37 + 11) % 64) as i32).collect();

        let mut serial = Vec::with_capacity(input.len());
        for y in 0..height {
            for x in 0..width {
                let mut z = 0.0;
                for ky in 0..kernel.height() {
                    let sy = clamp_index(y + ky, 0, height);
                    for kx in 0..kernel.width() {
                        let sx = clamp_index(x + kx, 2, width);
                        z += kernel.weight(kx, ky) * input[sy * width + sx] as f64;
                    }
                }
                serial.push((z + 0.5).floor() as i32);
            }
        }

        assert_eq!(filter.filter(&input, width, height), serial);
        assert_eq!(filter.filter_n(&input, width, height, 3), filter.filter_n(&input, width, height, 3));
    }

    #[test]
    fn test_step_is_smoothed() {
        let filter = HeightMapFilter::new(LinearKernel::new(1));
        let input = vec![0, 0, 0, 9, 9, 9];
        let output = filter.filter(&input, 6, 1);
        assert_eq!(output, vec![0, 0, 3, 6, 9, 9]);
    }
}
