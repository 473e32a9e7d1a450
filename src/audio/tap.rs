//! Shared mono sample window between audio callbacks and the analyser.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Fixed-capacity ring of the most recent mono samples (thread-safe)
#[derive(Clone, Debug)]
pub struct SampleTap {
    ring: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.lock().is_empty()
    }

    /// Push interleaved frames, down-mixing every frame to its channel mean
    pub fn push_interleaved<T: Copy>(&self, data: &[T], channels: usize, to_f32: impl Fn(T) -> f32) {
        let channels = channels.max(1);
        let mut ring = self.ring.lock();
        for frame in data.chunks(channels) {
            let sum: f32 = frame.iter().map(|&s| to_f32(s)).sum();
            push_bounded(&mut ring, self.capacity, sum / frame.len() as f32);
        }
    }

    /// Push already down-mixed samples
    pub fn push_mono(&self, samples: &[f32]) {
        let mut ring = self.ring.lock();
        for &s in samples {
            push_bounded(&mut ring, self.capacity, s);
        }
    }

    /// Copy the latest `out.len()` samples into `out`, oldest first.
    /// Missing history is zero-filled at the front.
    pub fn snapshot(&self, out: &mut [f32]) {
        let ring = self.ring.lock();
        let take = out.len().min(ring.len());
        let pad = out.len() - take;
        out[..pad].fill(0.0);
        for (dst, src) in out[pad..].iter_mut().zip(ring.iter().skip(ring.len() - take)) {
            *dst = *src;
        }
    }

    pub fn clear(&self) {
        self.ring.lock().clear();
    }
}

fn push_bounded(ring: &mut VecDeque<f32>, capacity: usize, sample: f32) {
    if ring.len() == capacity {
        ring.pop_front();
    }
    ring.push_back(sample);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_and_capacity() {
        let tap = SampleTap::new(4);
        tap.push_interleaved(&[1.0f32, 0.0, 0.5, 0.5, -1.0, -1.0], 2, |s| s);
        let mut out = [9.0; 3];
        tap.snapshot(&mut out);
        assert_eq!(out, [0.5, 0.5, -1.0]);

        tap.push_mono(&[0.1, 0.2, 0.3]);
        assert_eq!(tap.len(), 4);
        let mut out = [0.0; 4];
        tap.snapshot(&mut out);
        assert_eq!(out, [-1.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_snapshot_zero_pads_front() {
        let tap = SampleTap::new(8);
        tap.push_mono(&[0.25]);
        let mut out = [1.0; 3];
        tap.snapshot(&mut out);
        assert_eq!(out, [0.0, 0.0, 0.25]);
    }

    #[test]
    fn test_integer_samples_converted() {
        let tap = SampleTap::new(2);
        tap.push_interleaved(&[i16::MAX, i16::MAX], 1, |s| s as f32 / i16::MAX as f32);
        let mut out = [0.0; 2];
        tap.snapshot(&mut out);
        assert_eq!(out, [1.0, 1.0]);
    }
}
