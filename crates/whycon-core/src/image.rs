use serde::{Deserialize, Serialize};

/// Number of interleaved samples per pixel accepted by the session layer.
pub const COLOR_CHANNELS: usize = 3;

/// Interpretation of the first and third sample of every pixel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Order the caller hands frames in.
    pub const CALLER: ChannelOrder = ChannelOrder::Rgb;
    /// Order the marker engine expects.
    pub const ENGINE: ChannelOrder = ChannelOrder::Bgr;

    pub fn swapped(self) -> Self {
        match self {
            ChannelOrder::Rgb => ChannelOrder::Bgr,
            ChannelOrder::Bgr => ChannelOrder::Rgb,
        }
    }
}

/// Rejected pixel buffer geometry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("input should be a 3-D array (height, width, channels), got {ndim} dimensions")]
    Dimensionality { ndim: usize },

    #[error("input should have shape (height, width, 3), got {channels} channels")]
    ChannelCount { channels: usize },

    #[error("image dimensions must be non-zero (width={width}, height={height})")]
    EmptyImage { width: usize, height: usize },

    #[error("image dimensions overflow (width={width}, height={height})")]
    Overflow { width: usize, height: usize },

    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },
}

/// Width and height of a frame in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: usize,
    pub height: usize,
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Array-style shape of a caller frame, `(height, width, channels)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl FrameShape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Shape of a packed 3-channel frame.
    pub fn rgb(width: usize, height: usize) -> Self {
        Self::new(height, width, COLOR_CHANNELS)
    }

    /// Build a shape from array dimensions, e.g. a numpy `shape` tuple.
    pub fn from_dims(dims: &[usize]) -> Result<Self, ShapeError> {
        match *dims {
            [height, width, channels] => Ok(Self::new(height, width, channels)),
            _ => Err(ShapeError::Dimensionality { ndim: dims.len() }),
        }
    }

    /// Check the shape against a buffer of `len` bytes.
    pub fn validate(&self, len: usize) -> Result<FrameSize, ShapeError> {
        if self.channels != COLOR_CHANNELS {
            return Err(ShapeError::ChannelCount {
                channels: self.channels,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(ShapeError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(COLOR_CHANNELS))
            .ok_or(ShapeError::Overflow {
                width: self.width,
                height: self.height,
            })?;
        if len != expected {
            return Err(ShapeError::BufferLength { expected, got: len });
        }
        Ok(FrameSize {
            width: self.width,
            height: self.height,
        })
    }
}

/// Caller-owned, row-major interleaved frame in the caller's channel order.
///
/// Construction does not validate; the session checks the shape before it
/// touches the buffer or the engine.
#[derive(Debug)]
pub struct FrameMut<'a> {
    shape: FrameShape,
    data: &'a mut [u8],
}

impl<'a> FrameMut<'a> {
    pub fn new(data: &'a mut [u8], shape: FrameShape) -> Self {
        Self { shape, data }
    }

    /// Packed 3-channel frame of `width` x `height` pixels.
    pub fn rgb(data: &'a mut [u8], width: usize, height: usize) -> Self {
        Self::new(data, FrameShape::rgb(width, height))
    }

    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    pub fn size(&self) -> Result<FrameSize, ShapeError> {
        self.shape.validate(self.data.len())
    }

    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}

/// Mutable view over a 3-channel frame in the engine's memory layout.
///
/// The engine may draw overlays into `data`; `order` tracks how the first and
/// third samples of each pixel are currently interpreted.
#[derive(Debug)]
pub struct RawImageMut<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    order: ChannelOrder,
    data: &'a mut [u8], // row-major, len = w*h*channels
}

impl<'a> RawImageMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        size: FrameSize,
        order: ChannelOrder,
    ) -> Result<Self, ShapeError> {
        FrameShape::rgb(size.width, size.height).validate(data.len())?;
        Ok(Self {
            width: size.width,
            height: size.height,
            channels: COLOR_CHANNELS,
            order,
            data,
        })
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    /// Swap the first and third sample of every pixel in place.
    pub fn swap_channel_order(&mut self) {
        for px in self.data.chunks_exact_mut(self.channels) {
            px.swap(0, 2);
        }
        self.order = self.order.swapped();
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) * self.channels)
    }

    /// Samples of one pixel in the view's current channel order.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        let o = self.offset(x, y)?;
        Some([self.data[o], self.data[o + 1], self.data[o + 2]])
    }

    /// Overwrite one pixel; `px` is interpreted in the view's current order.
    pub fn put_pixel(&mut self, x: usize, y: usize, px: [u8; 3]) -> bool {
        let Some(o) = self.offset(x, y) else {
            return false;
        };
        self.data[o..o + 3].copy_from_slice(&px);
        true
    }
}
