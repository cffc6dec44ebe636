//! Bit-slip synchronizer
//!
//! Deserializers recover words at an arbitrary bit offset within the
//! frame. Each slip pulse rotates the output word by exactly one bit
//! position; rotation is cyclic with period S, so at most S pulses are
//! needed to reach any framing. Alignment detection lives with the
//! control-domain collaborator, not here.

/// Rotate the low `width` bits of `word` left by `count` positions
#[must_use]
pub fn rotate_left(word: u16, count: u8, width: u8) -> u16 {
    let mask = word_mask(width);
    let count = count % width;
    if count == 0 {
        return word & mask;
    }
    let value = u32::from(word & mask);
    let rotated = (value << count) | (value >> (width - count));
    (rotated as u16) & mask
}

/// Mask covering the low `width` bits
#[must_use]
pub const fn word_mask(width: u8) -> u16 {
    if width >= 16 {
        u16::MAX
    } else {
        (1u16 << width) - 1
    }
}

/// Per-lane framing rotation state
#[derive(Clone, Copy, Debug)]
pub struct BitSlip {
    rotation: u8,
    width: u8,
}

impl BitSlip {
    /// Create with zero rotation for an S-bit word
    #[must_use]
    pub const fn new(width: u8) -> Self {
        Self { rotation: 0, width }
    }

    /// Current rotation count, 0..S-1
    ///
    /// Only meaningful while framing is still being searched; once the
    /// training pattern is visible the count is simply whatever offset
    /// the search ended at.
    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Apply one slip pulse: advance the rotation by one bit position
    pub fn slip(&mut self) {
        self.rotation = (self.rotation + 1) % self.width;
    }

    /// Rotate a raw word into the current framing
    #[must_use]
    pub fn apply(&self, word: u16) -> u16 {
        rotate_left(word, self.rotation, self.width)
    }

    /// Return to zero rotation
    pub fn reset(&mut self) {
        self.rotation = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_of_slips_restores_word() {
        let mut slip = BitSlip::new(8);
        let word = 0b1011_0001;
        for _ in 0..8 {
            slip.slip();
        }
        assert_eq!(slip.rotation(), 0);
        assert_eq!(slip.apply(word), word);
    }

    #[test]
    fn one_slip_rotates_one_position() {
        let mut slip = BitSlip::new(8);
        slip.slip();
        assert_eq!(slip.apply(0b1000_0000), 0b0000_0001);
        assert_eq!(slip.apply(0b0100_1101), 0b1001_1010);
    }

    #[test]
    fn rotation_respects_narrow_widths() {
        let mut slip = BitSlip::new(4);
        slip.slip();
        slip.slip();
        assert_eq!(slip.apply(0b0011), 0b1100);
    }

    #[test]
    fn full_width_words_rotate() {
        assert_eq!(rotate_left(0x8001, 1, 16), 0x0003);
    }
}
