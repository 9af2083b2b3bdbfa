//! Minimal-movement voicing between consecutive chords.

/// Lowest pitch a voice-led chord may drift down to.
const FLOOR: i32 = 40;
/// Highest pitch a voice-led chord may drift up to.
const CEILING: i32 = 88;
/// How far the bass may wander from the previous bass before re-centering.
const RECENTER_THRESHOLD: i32 = 7;

/// Places `new` (any octave, any order) close to `prev`.
///
/// The lowest new note is anchored within a tritone of the previous bass;
/// every other voice picks the octave (-1, 0, +1) nearest the previous
/// voice at the same index, or the previous top voice when `prev` is
/// shorter. Output is strictly ascending. With no previous chord the new
/// chord is returned sorted.
pub fn voice_lead_chord(new: &[u8], prev: &[u8]) -> Vec<u8> {
    let mut target: Vec<i32> = new.iter().map(|p| *p as i32).collect();
    target.sort_unstable();
    target.dedup();

    let (Some(&prev_low), Some(&prev_high)) = (prev.first(), prev.last()) else {
        return target.into_iter().map(|p| p as u8).collect();
    };
    if target.is_empty() {
        return Vec::new();
    }
    let prev_low = prev_low as i32;

    let anchor = (((prev_low - target[0]) as f64) / 12.0).round() as i32 * 12;
    let mut out = Vec::with_capacity(target.len());
    out.push(target[0] + anchor);

    for (i, pitch) in target.iter().enumerate().skip(1) {
        let shifted = pitch + anchor;
        let reference = prev.get(i).copied().unwrap_or(prev_high) as i32;
        let best = [shifted, shifted - 12, shifted + 12]
            .into_iter()
            .min_by_key(|c| (c - reference).abs())
            .unwrap_or(shifted);
        out.push(best);
    }

    out.sort_unstable();
    for i in 1..out.len() {
        while out[i] <= out[i - 1] {
            out[i] += 12;
        }
    }

    if out[0] < prev_low - RECENTER_THRESHOLD {
        shift_all(&mut out, 12);
    } else if out[0] > prev_low + RECENTER_THRESHOLD {
        shift_all(&mut out, -12);
    }

    while out[0] < FLOOR {
        shift_all(&mut out, 12);
    }
    while out.last().is_some_and(|top| *top > CEILING) && out[0] - 12 >= FLOOR {
        shift_all(&mut out, -12);
    }

    out.into_iter().map(|p| p.clamp(0, 127) as u8).collect()
}

/// Total absolute semitone motion from `prev` to `next`, pairing voices by
/// index (extra voices pair with the previous top voice).
pub fn movement(next: &[u8], prev: &[u8]) -> u32 {
    let Some(&prev_high) = prev.last() else {
        return 0;
    };
    next.iter()
        .enumerate()
        .map(|(i, p)| {
            let reference = prev.get(i).copied().unwrap_or(prev_high);
            (*p as i32 - reference as i32).unsigned_abs()
        })
        .sum()
}

fn shift_all(pitches: &mut [i32], by: i32) {
    for p in pitches.iter_mut() {
        *p += by;
    }
}
