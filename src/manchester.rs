use crate::burst::Frame;

/// Half-bit order of a logical one; a zero is always the opposite. RC5
/// transmits a one as space-then-mark, RC6 as mark-then-space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneHalves {
    SpaceMark,
    MarkSpace,
}

#[derive(Debug, Clone, Copy)]
struct Half {
    mark: bool,
    /// Width in basic time units. Header toggle half-bits of RC6 are double
    /// width; everything else is single.
    width: u32,
}

/// Accumulates bi-phase half-bits, then collapses runs into burst words.
#[derive(Default)]
pub struct Manchester {
    halves: Vec<Half>,
    fields: Vec<String>,
}

impl Manchester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bits` bi-phase bits of `value`, most significant bit first,
    /// each half-bit `width` units wide.
    pub fn push_bits(&mut self, value: u32, bits: u32, one: OneHalves, width: u32) {
        let mut field = String::with_capacity(bits as usize);

        for i in (0..bits).rev() {
            let bit = (value >> i) & 1 == 1;
            let first_mark = bit == (one == OneHalves::MarkSpace);

            self.halves.push(Half {
                mark: first_mark,
                width,
            });
            self.halves.push(Half {
                mark: !first_mark,
                width,
            });
            field.push(if bit { '1' } else { '0' });
        }

        self.fields.push(field);
    }

    /// Drop a leading space half-bit. A Pronto sequence must start with a
    /// mark, and RC5's first start bit begins with its space half.
    pub fn skip_leading_space(&mut self) {
        if self.halves.first().is_some_and(|h| !h.mark) {
            self.halves.remove(0);
        }
    }

    /// Collapse the half-bit stream into alternating mark/space words.
    ///
    /// Two equal consecutive half-bits merge into one word of their combined
    /// width; a lone half-bit becomes a word of its own width. The stream ends
    /// on a mark: if the last half is a space, one extra single-unit mark is
    /// appended so the extent pad can follow as a space.
    pub fn collapse(self, frame: &mut Frame) {
        let unit = frame.clock().unit;
        let mut i = 0;
        let mut ends_on_mark = false;

        while i < self.halves.len() {
            let half = self.halves[i];
            let mut width = half.width;

            if let Some(next) = self.halves.get(i + 1) {
                if next.mark == half.mark {
                    width += next.width;
                    i += 1;
                }
            }

            frame.word(width * unit);
            ends_on_mark = half.mark;
            i += 1;
        }

        if !ends_on_mark {
            frame.word(unit);
        }

        for field in self.fields {
            frame.field(field);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::clock::ClockState;

    fn words(man: Manchester, unit: u32) -> Vec<u16> {
        let mut frame = Frame::new(ClockState {
            prescaler: 0x73,
            carrier: 36_000.0,
            unit,
        });
        man.collapse(&mut frame);
        frame.finish(0).words
    }

    #[test]
    fn rc5_start_bits() {
        let mut man = Manchester::new();

        // two start ones and toggle zero: 01 01 10
        man.push_bits(0b110, 3, OneHalves::SpaceMark, 1);
        man.skip_leading_space();

        // 10110 -> mark, space, double mark, space + closing mark
        assert_eq!(words(man, 32), vec![32, 32, 64, 32, 32]);
    }

    #[test]
    fn equal_halves_merge() {
        let mut man = Manchester::new();

        // 10 01 10 -> mark, double space, double mark, space + closing mark
        man.push_bits(0b101, 3, OneHalves::MarkSpace, 1);

        assert_eq!(words(man, 16), vec![16, 32, 32, 16, 16]);
    }

    #[test]
    fn double_width_toggle() {
        let mut man = Manchester::new();

        // mode tail 1, double-width toggle 0, then a one: 10 01 01 10
        man.push_bits(1, 1, OneHalves::MarkSpace, 1);
        man.push_bits(0, 1, OneHalves::MarkSpace, 2);
        man.push_bits(1, 1, OneHalves::MarkSpace, 1);

        // the merges across the toggle are triple width: 1, 1+2, 2+1, 1
        assert_eq!(words(man, 16), vec![16, 48, 48, 16, 16]);
    }

    #[test]
    fn ends_on_space_gets_closing_mark() {
        let mut man = Manchester::new();

        man.push_bits(1, 1, OneHalves::MarkSpace, 1);

        // 10 -> mark, space, closing mark
        assert_eq!(words(man, 16), vec![16, 16, 16]);
    }
}
