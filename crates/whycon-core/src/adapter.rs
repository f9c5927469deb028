//! Scoped adaptation of caller frames into the engine's channel order.
//!
//! [`adapt`] aliases the caller buffer (no copy), swaps it into
//! [`ChannelOrder::ENGINE`] and hands back an [`AdaptedFrame`] guard. Dropping
//! the guard swaps the buffer back to the caller's order, whichever way the
//! scope is left, so an engine error cannot leak a swapped buffer to the
//! caller. Overlays the engine draws while the guard is alive end up in the
//! caller's order too.

use std::ops::{Deref, DerefMut};

use crate::image::{ChannelOrder, FrameMut, RawImageMut, ShapeError};

/// Engine-order view over a caller frame; restores the caller order on drop.
#[derive(Debug)]
pub struct AdaptedFrame<'a> {
    image: RawImageMut<'a>,
    restore_to: ChannelOrder,
}

/// Validate `frame` and swap it in place into the engine's channel order.
pub fn adapt<'a>(frame: &'a mut FrameMut<'_>) -> Result<AdaptedFrame<'a>, ShapeError> {
    let size = frame.size()?;
    let mut image = RawImageMut::new(frame.data_mut(), size, ChannelOrder::CALLER)?;
    image.swap_channel_order();
    Ok(AdaptedFrame {
        image,
        restore_to: ChannelOrder::CALLER,
    })
}

impl<'a> AdaptedFrame<'a> {
    /// End the adaptation scope now instead of at the end of the borrow.
    pub fn restore(self) {}
}

impl<'a> Deref for AdaptedFrame<'a> {
    type Target = RawImageMut<'a>;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl<'a> DerefMut for AdaptedFrame<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.image
    }
}

impl Drop for AdaptedFrame<'_> {
    fn drop(&mut self) {
        // The engine may have flipped the order itself; restore relative to
        // whatever the view says now.
        if self.image.order() != self.restore_to {
            self.image.swap_channel_order();
        }
    }
}
