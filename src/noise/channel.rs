//! Synchronous broadcast channel for the noise scalar
//!
//! Single writer (the emitter), many readers. Delivery is synchronous and
//! in publish order: by the time `publish` returns, every live tap holds
//! the new value and every observer closure has run. Listeners must be
//! fast and non-blocking; there is no queue and no backpressure.

use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Read handle onto the channel. Holds the most recently published value;
/// cheap to poll every tick.
#[derive(Debug, Clone)]
pub struct NoiseTap(Rc<Cell<f32>>);

impl NoiseTap {
    pub fn level(&self) -> f32 {
        self.0.get()
    }
}

/// The broadcast side. Taps are tracked weakly so a dropped subscriber
/// never keeps the channel alive or stalls publishing; dead taps are pruned
/// on the next publish.
#[derive(Default)]
pub struct NoiseChannel {
    taps: Vec<Weak<Cell<f32>>>,
    observers: Vec<Box<dyn FnMut(f32)>>,
}

impl NoiseChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe with a pollable tap.
    pub fn tap(&mut self) -> NoiseTap {
        let cell = Rc::new(Cell::new(0.0));
        self.taps.push(Rc::downgrade(&cell));
        NoiseTap(cell)
    }

    /// Subscribe with a callback invoked on every publish.
    pub fn observe(&mut self, observer: impl FnMut(f32) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn publish(&mut self, value: f32) {
        self.taps.retain(|weak| match weak.upgrade() {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        });
        for observer in &mut self.observers {
            observer(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_tap_sees_latest_value() {
        let mut channel = NoiseChannel::new();
        let tap = channel.tap();
        assert_eq!(tap.level(), 0.0);
        channel.publish(0.4);
        assert_eq!(tap.level(), 0.4);
        channel.publish(0.1);
        assert_eq!(tap.level(), 0.1);
    }

    #[test]
    fn test_observer_called_in_order() {
        let mut channel = NoiseChannel::new();
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        channel.observe(move |v| sink.borrow_mut().push(v));
        channel.publish(0.2);
        channel.publish(0.5);
        assert_eq!(*seen.borrow(), vec![0.2, 0.5]);
    }

    #[test]
    fn test_dropped_tap_is_pruned() {
        let mut channel = NoiseChannel::new();
        let tap = channel.tap();
        drop(tap);
        channel.publish(0.9);
        let survivor = channel.tap();
        channel.publish(0.3);
        assert_eq!(survivor.level(), 0.3);
    }
}
