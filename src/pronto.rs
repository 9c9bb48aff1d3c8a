use crate::burst::EncodedFrame;
use itertools::Itertools;
use num_integer::Integer;

/// Wrap an encoded frame in the four-word learned-code preamble and splice in
/// the repeat copies. The pair count in word 3 describes a single frame.
pub fn assemble(frame: &EncodedFrame, repeats: i64) -> String {
    if frame.words.len().is_odd() {
        // unreachable from the encoders; emit anyway so it can be diagnosed
        log::error!(
            "burst sequence has an odd word count {}, emitting anyway",
            frame.words.len()
        );
    }

    let pairs = (frame.words.len() / 2) as u16;
    let mut words: Vec<u16> = vec![0x0000, frame.prescaler, 0x0000, pairs];

    words.extend_from_slice(&frame.words);

    for _ in 0..repeats {
        words.extend_from_slice(&frame.words[frame.repeat_skip..]);
    }

    words.iter().map(|word| format!("{word:04X}")).join(" ")
}
