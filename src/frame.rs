#![doc = r#"
Sliding-window framing of note matrices

A matrix of `N` note vectors is cut into overlapping frames of `width` rows,
each starting `stride` rows after the previous one. Trailing rows that do not
fill a last frame are dropped, so unwrapping the frames gives back the first
`frame_count(N) * stride` rows only.
"#]

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, s};

use crate::{Error, Result};

/// Notes advanced per frame in notes files
pub const NOTES_WRAP: usize = 50;

/// Notes per frame in notes files
pub const FRAME_LENGTH: usize = 100;

#[doc = r#"
Stride and width of a framing, with `width >= stride > 0`.

# Example
```rust
# use notematrix::prelude::*;
# use ndarray::Array2;
let geometry = FrameGeometry::new(2, 3).unwrap();
let matrix = Array2::from_shape_fn((8, 4), |(row, _)| row as f64);

let frames = geometry.wrap(matrix.view());
// (8 - (3 - 2)) / 2 frames
assert_eq!(frames.dim(), (3, 3, 4));

let rows = geometry.unwrap(frames.view()).unwrap();
assert_eq!(rows, matrix.slice(ndarray::s![..6, ..]));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "(usize, usize)", into = "(usize, usize)")
)]
pub struct FrameGeometry {
    stride: usize,
    width: usize,
}

impl TryFrom<(usize, usize)> for FrameGeometry {
    type Error = Error;
    fn try_from((stride, width): (usize, usize)) -> Result<Self> {
        Self::new(stride, width)
    }
}

impl From<FrameGeometry> for (usize, usize) {
    fn from(value: FrameGeometry) -> Self {
        (value.stride, value.width)
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FrameGeometry {
    /// 100-note frames advancing by 50 notes
    pub const DEFAULT: Self = Self {
        stride: NOTES_WRAP,
        width: FRAME_LENGTH,
    };

    /// Largest frame width. Notes files store the geometry as `i32`.
    pub const MAX_WIDTH: usize = i32::MAX as usize;

    /// Create a frame geometry
    pub const fn new(stride: usize, width: usize) -> Result<Self> {
        if stride == 0 || width < stride || width > Self::MAX_WIDTH {
            return Err(Error::FrameGeometry { stride, width });
        }
        Ok(Self { stride, width })
    }

    /// Rows advanced per frame
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Rows per frame
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of whole frames in `rows` rows
    pub const fn frame_count(&self, rows: usize) -> usize {
        rows.saturating_sub(self.width - self.stride) / self.stride
    }

    /// Cut `matrix` into frames, shaped `(frames, width, columns)`
    pub fn wrap(&self, matrix: ArrayView2<f64>) -> Array3<f64> {
        let count = self.frame_count(matrix.nrows());
        let mut frames = Array3::zeros((count, self.width, matrix.ncols()));
        for (i, mut frame) in frames.outer_iter_mut().enumerate() {
            let start = i * self.stride;
            frame.assign(&matrix.slice(s![start..start + self.width, ..]));
        }
        frames
    }

    /// Join frames back into rows, keeping the first `stride` rows of each frame
    pub fn unwrap(&self, frames: ArrayView3<f64>) -> Result<Array2<f64>> {
        let (count, width, columns) = frames.dim();
        if width < self.stride {
            return Err(Error::FrameGeometry {
                stride: self.stride,
                width,
            });
        }
        let mut rows = Array2::zeros((count * self.stride, columns));
        for (i, frame) in frames.outer_iter().enumerate() {
            let start = i * self.stride;
            rows.slice_mut(s![start..start + self.stride, ..])
                .assign(&frame.slice(s![..self.stride, ..]));
        }
        Ok(rows)
    }
}

#[cfg(test)]
fn numbered(rows: usize, columns: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, columns), |(r, c)| (r * columns + c) as f64)
}

#[test]
fn invalid_geometries() {
    assert!(matches!(
        FrameGeometry::new(0, 10),
        Err(Error::FrameGeometry { stride: 0, width: 10 })
    ));
    assert!(FrameGeometry::new(11, 10).is_err());
    assert!(FrameGeometry::new(10, 10).is_ok());
}

#[test]
fn width_fits_notes_file_header() {
    let widest = FrameGeometry::new(1, FrameGeometry::MAX_WIDTH).unwrap();
    assert_eq!(widest.width(), i32::MAX as usize);
    assert!(matches!(
        FrameGeometry::new(1, FrameGeometry::MAX_WIDTH + 1),
        Err(Error::FrameGeometry { stride: 1, .. })
    ));
    assert_eq!(
        FrameGeometry::try_from((50, 100)).unwrap(),
        FrameGeometry::DEFAULT
    );
    assert!(FrameGeometry::try_from((0, 100)).is_err());
}

#[test]
fn frame_contents() {
    let geometry = FrameGeometry::new(2, 4).unwrap();
    let frames = geometry.wrap(numbered(9, 1).view());
    assert_eq!(frames.dim(), (3, 4, 1));
    assert_eq!(frames.slice(s![1, .., 0]).to_vec(), vec![2., 3., 4., 5.]);
    assert_eq!(frames.slice(s![2, .., 0]).to_vec(), vec![4., 5., 6., 7.]);
}

#[test]
fn unwrap_restores_covered_prefix() {
    for (rows, stride, width) in [(250, 50, 100), (99, 50, 100), (100, 50, 100), (17, 3, 5), (10, 5, 5)] {
        let geometry = FrameGeometry::new(stride, width).unwrap();
        let matrix = numbered(rows, 3);
        let frames = geometry.wrap(matrix.view());
        let restored = geometry.unwrap(frames.view()).unwrap();

        let covered = geometry.frame_count(rows) * stride;
        assert_eq!(restored, matrix.slice(s![..covered, ..]), "{rows} rows, {stride}/{width}");
    }
}

#[test]
fn too_few_rows_for_a_frame() {
    let geometry = FrameGeometry::DEFAULT;
    let frames = geometry.wrap(numbered(99, 2).view());
    assert_eq!(frames.dim(), (0, 100, 2));
    assert_eq!(geometry.unwrap(frames.view()).unwrap().dim(), (0, 2));
}

#[test]
fn unwrap_needs_stride_rows() {
    let geometry = FrameGeometry::new(4, 8).unwrap();
    let frames = Array3::<f64>::zeros((2, 3, 5));
    assert!(geometry.unwrap(frames.view()).is_err());
}
