//! Searches over the sorted partial-key arrays of node-4 and node-16.
//!
//! Only the first `num_children` entries of `keys` are meaningful; anything past that is a
//! vacated slot and must never match.

#[cfg(all(feature = "simd_keys", target_arch = "x86_64", target_feature = "sse2"))]
#[inline]
fn x86_64_sse_find_key_16_up_to(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::x86_64::{
        __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
    };

    let bitfield = unsafe {
        let key_vec = _mm_set1_epi8(key as i8);
        let results = _mm_cmpeq_epi8(key_vec, _mm_loadu_si128(keys.as_ptr() as *const __m128i));
        // AVX512 has _mm_cmpeq_epi8_mask which can allow us to skip this step and go direct to a
        // bitmask from comparison results.
        // ... but that's stdsimd nightly only for now, and also not available on all processors.
        let mask = (1i32 << num_children) - 1;
        _mm_movemask_epi8(results) & mask
    };
    if bitfield != 0 {
        let idx = bitfield.trailing_zeros() as usize;
        return Some(idx);
    }
    None
}

#[cfg(all(feature = "simd_keys", target_arch = "aarch64", target_feature = "neon"))]
#[inline]
fn aarch64_neon_find_key_16_up_to(key: u8, keys: &[u8; 16], num_children: usize) -> Option<usize> {
    use std::arch::aarch64::*;
    unsafe {
        if num_children == 0 {
            return None;
        }

        // Fill a vector with the key.
        let key_vec = vdupq_n_u8(key);
        // Load the keys from the node.
        let node_keys_vec = vld1q_u8(keys.as_ptr());
        // 0xFF in every lane equal to the key, 0x00 elsewhere.
        let cmp_vec = vceqq_u8(key_vec, node_keys_vec);

        // NEON does not have mm_movemask_epi8, so to get a bitfield out, we have to do
        // some extra work.

        // We use shrn to shift the 8-bit elements down to 4-bit elements, then we
        // reinterpret the vector as a 64-bit vector, and finally we extract the first
        // 64-bit lane.
        let eq_mask = vreinterpretq_u16_u8(cmp_vec);
        let res = vshrn_n_u16::<4>(eq_mask);

        // We now have a 64-bit wide # (instead of 8 as in x86) bitfield, where each
        // vector element is 4-bits wide instead of 1.
        let matches = vget_lane_u64::<0>(vreinterpret_u64_u8(res));

        if matches != 0 {
            // Div by 4 (r-shift 2) gives us the index of the matching key.
            let shifted = (matches.trailing_zeros() >> 2) as usize;
            if shifted < num_children {
                return Some(shifted);
            }
        }
        None
    }
}

fn binary_find_key(key: u8, keys: &[u8], num_children: usize) -> Option<usize> {
    let mut left = 0;
    let mut right = num_children;
    while left < right {
        let mid = (left + right) / 2;
        match keys[mid].cmp(&key) {
            std::cmp::Ordering::Less => left = mid + 1,
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Greater => right = mid,
        }
    }
    None
}

/// Position of `key` among the first `num_children` entries of a sorted key array.
pub fn u8_keys_find_key_position_sorted<const WIDTH: usize>(
    key: u8,
    keys: &[u8],
    num_children: usize,
) -> Option<usize> {
    // Width 4 and under, just use linear search.
    if WIDTH <= 4 {
        return (0..num_children).find(|&i| keys[i] == key);
    }

    // SIMD optimized forms of 16
    if WIDTH == 16 {
        #[cfg(all(feature = "simd_keys", target_arch = "x86_64", target_feature = "sse2"))]
        {
            if let Ok(keys) = <&[u8; 16]>::try_from(keys) {
                return x86_64_sse_find_key_16_up_to(key, keys, num_children);
            }
        }

        #[cfg(all(feature = "simd_keys", target_arch = "aarch64", target_feature = "neon"))]
        {
            if let Ok(keys) = <&[u8; 16]>::try_from(keys) {
                return aarch64_neon_find_key_16_up_to(key, keys, num_children);
            }
        }
    }

    // Fallback to binary search.
    binary_find_key(key, keys, num_children)
}

/// Slot at which `key` belongs in a sorted key array, found with a single right-to-left pass
/// over the first `num_children` entries. Returns `Err` with the position of an equal key.
pub fn u8_keys_find_insert_position_sorted(
    key: u8,
    keys: &[u8],
    num_children: usize,
) -> Result<usize, usize> {
    let mut idx = num_children;
    while idx > 0 && key < keys[idx - 1] {
        idx -= 1;
    }
    if idx > 0 && keys[idx - 1] == key {
        return Err(idx - 1);
    }
    Ok(idx)
}

/// Smallest key among the first `num_children` sorted entries that is `>= key`.
pub fn u8_keys_next_sorted(key: u8, keys: &[u8], num_children: usize) -> Option<u8> {
    keys[..num_children].iter().copied().find(|k| *k >= key)
}

/// Largest key among the first `num_children` sorted entries that is `<= key`.
pub fn u8_keys_prev_sorted(key: u8, keys: &[u8], num_children: usize) -> Option<u8> {
    keys[..num_children].iter().rev().copied().find(|k| *k <= key)
}
