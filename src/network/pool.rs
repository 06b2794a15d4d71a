//! Read buffer pool
//!
//! Line buffers are checked out for one read and returned on drop, so idle
//! connections do not pin a buffer and no buffer is ever shared between two
//! active reads.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crossbeam::queue::ArrayQueue;

/// Initial capacity of a fresh buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 2048;

/// Buffers grown past this are dropped instead of pooled
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Bounded pool of reusable byte buffers
#[derive(Debug)]
pub struct BufferPool {
    buffers: ArrayQueue<Vec<u8>>,
    buffer_capacity: usize,
}

impl BufferPool {
    /// Pool retaining at most `max_pooled` idle buffers
    pub fn new(max_pooled: usize, buffer_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            buffers: ArrayQueue::new(max_pooled.max(1)),
            buffer_capacity,
        })
    }

    /// Take a cleared buffer, allocating if the pool is empty
    pub fn checkout(self: &Arc<Self>) -> PooledBuffer {
        let buf = self
            .buffers
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity));

        PooledBuffer {
            buf,
            pool: Arc::clone(self),
        }
    }

    /// Number of idle buffers
    pub fn idle(&self) -> usize {
        self.buffers.len()
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        // A full pool just drops the buffer
        let _ = self.buffers.push(buf);
    }
}

/// A buffer on loan from a `BufferPool`
#[derive(Debug)]
pub struct PooledBuffer {
    buf: Vec<u8>,
    pool: Arc<BufferPool>,
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.give_back(buf);
    }
}
