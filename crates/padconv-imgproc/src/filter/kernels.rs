use std::{fmt, str::FromStr};

/// An error type for kernel construction.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum KernelError {
    /// The number of weights is not the area of an odd sided square.
    #[error("Kernel must have (2k+1)^2 weights, got {0}")]
    InvalidKernelLength(usize),

    /// The divisor is zero.
    #[error("Kernel divisor must be non-zero")]
    ZeroDivisor,

    /// The kernel name is not one of the named kernels.
    #[error("Unknown kernel: {0}")]
    UnknownKernel(String),
}

/// A square convolution kernel with an integer divisor.
///
/// The weights are stored row-major with an odd side of `2 * half_size + 1`.
/// Every weighted term is divided by `divisor` before accumulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
    half_size: usize,
    divisor: i32,
}

impl Kernel {
    /// Create a kernel from row-major weights.
    ///
    /// # Arguments
    ///
    /// * `weights` - The kernel weights, `(2k+1)^2` values in row-major order.
    /// * `divisor` - The divisor applied to every weighted term.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidKernelLength`] if the weights do not form
    /// an odd sided square, and [`KernelError::ZeroDivisor`] if `divisor` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use padconv_imgproc::filter::Kernel;
    ///
    /// let kernel = Kernel::new(vec![1.0; 9], 9).unwrap();
    ///
    /// assert_eq!(kernel.half_size(), 1);
    /// assert_eq!(kernel.side(), 3);
    /// ```
    pub fn new(weights: Vec<f64>, divisor: i32) -> Result<Self, KernelError> {
        let side = (weights.len() as f64).sqrt() as usize;
        if side * side != weights.len() || side % 2 == 0 {
            return Err(KernelError::InvalidKernelLength(weights.len()));
        }

        if divisor == 0 {
            return Err(KernelError::ZeroDivisor);
        }

        Ok(Self {
            weights,
            half_size: side / 2,
            divisor,
        })
    }

    /// Create a kernel from a square matrix of weights.
    pub fn from_matrix<const N: usize>(
        matrix: [[f64; N]; N],
        divisor: i32,
    ) -> Result<Self, KernelError> {
        Self::new(matrix.iter().flatten().copied().collect(), divisor)
    }

    /// The passthrough kernel.
    pub fn identity() -> Self {
        Self::kernel3([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]])
    }

    /// The edge enhancing sharpen kernel.
    pub fn sharpen() -> Self {
        Self::kernel3([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
    }

    /// The laplacian style edge detection kernel.
    pub fn edge_detection() -> Self {
        Self::kernel3([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    // 3x3 with unit divisor, always valid
    fn kernel3(matrix: [[f64; 3]; 3]) -> Self {
        Self {
            weights: matrix.iter().flatten().copied().collect(),
            half_size: 1,
            divisor: 1,
        }
    }

    /// Number of elements the kernel extends from its center.
    pub fn half_size(&self) -> usize {
        self.half_size
    }

    /// Side length of the kernel, `2 * half_size + 1`.
    pub fn side(&self) -> usize {
        2 * self.half_size + 1
    }

    /// The divisor applied to every weighted term.
    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// The weights in row-major order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over the kernel rows.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.weights.chunks_exact(self.side())
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            for w in row {
                write!(f, "{:.1}\t", w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The kernels selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedKernel {
    /// See [`Kernel::identity`].
    Identity,
    /// See [`Kernel::sharpen`].
    Sharpen,
    /// See [`Kernel::edge_detection`].
    EdgeDetection,
}

impl NamedKernel {
    /// Build the kernel.
    pub fn kernel(&self) -> Kernel {
        match self {
            NamedKernel::Identity => Kernel::identity(),
            NamedKernel::Sharpen => Kernel::sharpen(),
            NamedKernel::EdgeDetection => Kernel::edge_detection(),
        }
    }
}

impl fmt::Display for NamedKernel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NamedKernel::Identity => "identity",
            NamedKernel::Sharpen => "sharpen",
            NamedKernel::EdgeDetection => "edge-detection",
        };
        write!(f, "{name}")
    }
}

impl FromStr for NamedKernel {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "identity" => Ok(NamedKernel::Identity),
            "sharpen" => Ok(NamedKernel::Sharpen),
            "edge-detection" | "edgedetection" => Ok(NamedKernel::EdgeDetection),
            _ => Err(KernelError::UnknownKernel(s.to_string())),
        }
    }
}
