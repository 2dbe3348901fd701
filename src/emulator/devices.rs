use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Pixel display as seen by the virtual machine.
///
/// `draw` receives a sprite as bit-coded rows of 8 pixels each and returns
/// whether any pixel flipped from set to unset.
pub trait Graphics {
    fn draw(&mut self, x: u8, y: u8, rows: &[u8]) -> bool;
    fn clear(&mut self);
}

/// Key matrix as seen by the virtual machine. Keys are 0x0 to 0xF.
///
/// `await_key_press` suspends the caller until the next key event arrives;
/// implementations block on their event source rather than spinning.
pub trait Keyboard {
    fn is_pressed(&self, key: u8) -> bool;
    fn await_key_press(&mut self) -> u8;
}

/// Keyboard fed by a [`KeyHandle`] from another thread. The currently held
/// key lives in a shared cell for `is_pressed`, while `await_key_press`
/// blocks on the event channel.
pub struct ChannelKeyboard {
    held: Arc<Mutex<Option<u8>>>,
    events: Receiver<u8>,
}

/// Sending side of a [`ChannelKeyboard`], owned by the input source.
#[derive(Clone)]
pub struct KeyHandle {
    held: Arc<Mutex<Option<u8>>>,
    events: Sender<u8>,
}

pub fn channel_keyboard() -> (ChannelKeyboard, KeyHandle) {
    let held = Arc::new(Mutex::new(None));
    let (sender, receiver) = channel();
    (
        ChannelKeyboard {
            held: held.clone(),
            events: receiver,
        },
        KeyHandle {
            held,
            events: sender,
        },
    )
}

impl KeyHandle {
    pub fn press(&self, key: u8) {
        let key = key & 0xf;
        *self.held.lock().unwrap() = Some(key);
        // The machine may not be waiting; a dropped receiver is fine.
        let _ = self.events.send(key);
    }

    pub fn release(&self) {
        *self.held.lock().unwrap() = None;
    }
}

impl Keyboard for ChannelKeyboard {
    fn is_pressed(&self, key: u8) -> bool {
        *self.held.lock().unwrap() == Some(key & 0xf)
    }

    fn await_key_press(&mut self) -> u8 {
        // All handles gone means no key can ever arrive; report key 0
        // instead of blocking forever.
        self.events.recv().unwrap_or(0)
    }
}
