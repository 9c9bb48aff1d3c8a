use crate::clock::ClockState;
use itertools::Itertools;

/// Pulse-distance timing in basic time units: `(mark, space)` for a zero bit
/// and for a one bit.
#[derive(Debug, Clone, Copy)]
pub struct PdmTiming {
    pub zero: (u32, u32),
    pub one: (u32, u32),
}

/// One encoded burst sequence, ready for the Pronto assembler.
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    pub prescaler: u16,
    pub words: Vec<u16>,
    /// Words that repeat copies drop from the front (the JVC lead-in).
    pub repeat_skip: usize,
}

/// Builds the burst-pair words of a single frame.
///
/// Words alternate mark and space starting with a mark; every method keeps a
/// running cycle total so extents can be padded at the end of the frame.
pub struct Frame {
    clock: ClockState,
    words: Vec<u16>,
    cycles: u32,
    fields: Vec<String>,
}

impl Frame {
    pub fn new(clock: ClockState) -> Self {
        Frame {
            clock,
            words: Vec::new(),
            cycles: 0,
            fields: Vec::new(),
        }
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    /// Append one word of `cycles` carrier cycles.
    pub fn word(&mut self, cycles: u32) {
        self.cycles += cycles;
        self.words.push(cycles.min(0xffff) as u16);
    }

    /// Append a single mark of `units` basic time units.
    pub fn mark(&mut self, units: u32) {
        self.word(units * self.clock.unit);
    }

    /// Append a mark/space pair, both in basic time units.
    pub fn burst(&mut self, mark_units: u32, space_units: u32) {
        self.mark(mark_units);
        self.mark(space_units);
    }

    /// Emit `bits` pulse-distance pairs, walking `value` from its most
    /// significant bit down. Callers store values transmit-ready, so the walk
    /// order here is fixed.
    pub fn pdm(&mut self, value: u32, bits: u32, timing: PdmTiming) {
        let mut field = String::with_capacity(bits as usize);

        for i in (0..bits).rev() {
            let one = (value >> i) & 1 == 1;
            let (mark, space) = if one { timing.one } else { timing.zero };

            self.burst(mark, space);
            field.push(if one { '1' } else { '0' });
        }

        self.fields.push(field);
    }

    pub(crate) fn field(&mut self, field: String) {
        self.fields.push(field);
    }

    /// Pad the frame to `frame_ms` milliseconds with a final space.
    pub fn extent(&mut self, frame_ms: f64) {
        let total = self.clock.cycles_for_ms(frame_ms);
        let pad = total.saturating_sub(self.cycles).max(1);

        self.word(pad);
    }

    /// Pad to `frame_ms` by folding the pad into the last emitted space,
    /// overwriting it rather than appending.
    pub fn extent_absorbing(&mut self, frame_ms: f64) {
        let total = self.clock.cycles_for_ms(frame_ms);
        let last = self.words.pop().map_or(0, u32::from);

        self.cycles -= last;
        let pad = total.saturating_sub(self.cycles).max(1);

        self.word(pad);
    }

    pub fn finish(self, repeat_skip: usize) -> EncodedFrame {
        if !self.fields.is_empty() {
            log::trace!("fields: {}", self.fields.iter().join(" "));
        }

        EncodedFrame {
            prescaler: self.clock.prescaler,
            words: self.words,
            repeat_skip,
        }
    }
}
