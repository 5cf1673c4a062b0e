/// An address split into the fields a cache level cares about
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodedAddress {
    pub tag: u32,
    pub set_index: u32,
    /// Not used by any hit/miss logic, kept so the split can be inspected
    pub block_offset: u32,
}

/// Splits 32-bit addresses for one cache geometry
///
/// The shifts and masks are computed once from the block size and set count, which must both be
/// powers of two, so decoding an address is three mask/shift operations
#[derive(Debug, Copy, Clone)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    offset_mask: u32,
    index_mask: u32,
}

impl AddressDecoder {
    pub fn new(block_size: u32, set_count: u32) -> Self {
        debug_assert!(block_size.is_power_of_two());
        debug_assert!(set_count.is_power_of_two());
        Self {
            offset_bits: block_size.trailing_zeros(),
            index_bits: set_count.trailing_zeros(),
            offset_mask: block_size - 1,
            index_mask: set_count - 1,
        }
    }

    #[inline]
    pub fn decode(&self, address: u32) -> DecodedAddress {
        // A geometry covering the whole address space shifts by 32, which `>>` rejects
        let tag_shift = self.offset_bits + self.index_bits;
        DecodedAddress {
            tag: address.checked_shr(tag_shift).unwrap_or(0),
            set_index: address.checked_shr(self.offset_bits).unwrap_or(0) & self.index_mask,
            block_offset: address & self.offset_mask,
        }
    }
}

/// Decodes a single address without keeping the decoder around
///
/// # Examples
///
/// ```
/// use hiercache::address::decode;
/// let decoded = decode(16, 4, 4);
/// assert_eq!((decoded.tag, decoded.set_index, decoded.block_offset), (1, 0, 0));
/// ```
pub fn decode(address: u32, block_size: u32, set_count: u32) -> DecodedAddress {
    AddressDecoder::new(block_size, set_count).decode(address)
}
