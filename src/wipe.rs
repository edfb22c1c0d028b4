//! Secure erasure of scratch buffers holding secret material.
//!
//! Polynomial coefficients and reconstructed-secret scratch space are wiped
//! with three passes (random, `0xFF`, `0x00`) rather than a single zeroing
//! pass. Each pass is written through a volatile store so the
//! optimizer cannot observe the buffer going unread afterward and elide the
//! writes.

use rand::RngCore;
use std::sync::atomic::{compiler_fence, Ordering};
use zeroize::Zeroize;

/// Overwrite `buf` in place: random bytes, then `0xFF`, then `0x00`.
///
/// `#[inline(never)]` keeps this call visible to the optimizer as an opaque
/// boundary; the `compiler_fence` between passes prevents reordering or
/// merging the stores into a single final write. The final pass goes
/// through `zeroize::Zeroize` rather than a hand-rolled volatile loop, so
/// the optimizer-fence guarantee for that pass comes from the audited
/// crate rather than this module's own unsafe code.
#[inline(never)]
pub fn secure_wipe(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
    compiler_fence(Ordering::SeqCst);
    volatile_fill(buf, 0xFF);
    compiler_fence(Ordering::SeqCst);
    buf.zeroize();
}

fn volatile_fill(buf: &mut [u8], value: u8) {
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid `&mut u8` derived from `buf`; a volatile
        // write through it cannot be elided or reordered past the fence
        // calls in `secure_wipe`.
        unsafe {
            std::ptr::write_volatile(byte as *mut u8, value);
        }
    }
    compiler_fence(Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_wipe_leaves_buffer_zeroed() {
        let mut buf = vec![0xAAu8; 64];
        secure_wipe(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
