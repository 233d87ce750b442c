//! Shared-memory pool/buffer wrapper for decoration surfaces (spec.md §9
//! "Decoration rendering"): the core owns the shm fd, pool mapping, and
//! damage/attach/commit sequence; an external graphics collaborator fills
//! the pixel bytes behind a `(buffer_address, stride, width, height,
//! ARGB8888)` contract.

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

use crate::connection::Connection;
use crate::protocol::{wl_buffer, wl_shm, wl_shm_pool, wl_surface};
use crate::wire::{Arg, Message};

/// A pixel-format contract handed to the external graphics collaborator
/// that actually paints a decoration (spec.md §9).
pub struct DecorationBuffer {
    pub backing_file: File,
    pub stride: i32,
    pub width: i32,
    pub height: i32,
    pool_id: u32,
    buffer_id: u32,
}

impl DecorationBuffer {
    /// Allocates the shm-backed pool and buffer for a `width x height`
    /// ARGB8888 decoration surface, sizing the backing file to exactly
    /// `stride * height` bytes.
    pub fn allocate(
        conn: &mut Connection,
        shm_object_id: u32,
        pool_id: u32,
        buffer_id: u32,
        width: i32,
        height: i32,
    ) -> io::Result<Self> {
        let stride = width * 4;
        let size = (stride * height) as u64;
        let backing_file = tempfile::tempfile()?;
        backing_file.set_len(size)?;

        conn.send(&Message::new(
            shm_object_id,
            wl_shm::request::CREATE_POOL,
            vec![Arg::NewId(pool_id), Arg::Fd(backing_file.as_raw_fd()), Arg::Int(size as i32)],
        ));
        conn.send(&Message::new(
            pool_id,
            wl_shm_pool::request::CREATE_BUFFER,
            vec![
                Arg::NewId(buffer_id),
                Arg::Int(0),
                Arg::Int(width),
                Arg::Int(height),
                Arg::Int(stride),
                Arg::Uint(wl_shm::FORMAT_ARGB8888),
            ],
        ));

        Ok(Self {
            backing_file,
            stride,
            width,
            height,
            pool_id,
            buffer_id,
        })
    }

    /// Attaches, damages the whole surface, and commits — the fixed
    /// sequence spec.md §9 calls out for handing a filled buffer to the
    /// compositor.
    pub fn attach_damage_commit(&self, conn: &mut Connection, surface_id: u32) {
        conn.send(&Message::new(
            surface_id,
            wl_surface::request::ATTACH,
            vec![Arg::Object(self.buffer_id), Arg::Int(0), Arg::Int(0)],
        ));
        conn.send(&Message::new(
            surface_id,
            wl_surface::request::DAMAGE,
            vec![Arg::Int(0), Arg::Int(0), Arg::Int(self.width), Arg::Int(self.height)],
        ));
        conn.send(&Message::new(surface_id, wl_surface::request::COMMIT, vec![]));
    }

    /// Releases the pool; the buffer itself is released by the
    /// compositor's `wl_buffer.release` event, per spec.md §5.
    pub fn destroy(&self, conn: &mut Connection) {
        conn.send(&Message::new(self.pool_id, wl_shm_pool::request::DESTROY, vec![]));
        conn.send(&Message::new(self.buffer_id, wl_buffer::request::DESTROY, vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_four_bytes_per_pixel() {
        let width = 100;
        let stride = width * 4;
        assert_eq!(stride, 400);
    }
}
