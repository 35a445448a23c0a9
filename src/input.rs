/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Input handling for the CHIP-8 interpreter.

use std::default::Default;

use num::traits::FromPrimitive;

/// The number of keys on the CHIP-8 keypad.
pub const N_KEYS: usize = 16;

enum_from_primitive!{
/// The keys on the CHIP-8 keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    K0 = 0,
    K1,
    K2,
    K3,
    K4,
    K5,
    K6,
    K7,
    K8,
    K9,
    KA,
    KB,
    KC,
    KD,
    KE,
    KF
}
}

impl Key {
    /// Returns the key corresponding to the lowest four bits of the given
    /// byte.
    pub fn from_byte(b: u8) -> Key {
        Key::from_u8(b % N_KEYS as u8).unwrap()
    }

    /// Returns the key with the given index, if there is one.
    pub fn from_index(i: usize) -> Option<Key> {
        Key::from_usize(i)
    }
}

/// Represents the state of the keypad.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// The key states (`true` means "pressed").
    keys: [bool; N_KEYS],
}

impl State {
    /// Returns a new input state with all keys unpressed.
    pub fn new() -> Self {
        State::default()
    }

    /// Marks the given key as pressed.
    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    /// Marks the given key as released.
    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    /// Sets the pressed state of the given key.
    pub fn set(&mut self, key: Key, pressed: bool) {
        self.keys[key as usize] = pressed;
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.keys = [false; N_KEYS];
    }

    /// Returns whether the given key is pressed.
    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys[key as usize]
    }

    /// Returns the lowest key that is pressed, if any.
    pub fn lowest_pressed(&self) -> Option<Key> {
        self.keys
            .iter()
            .position(|&down| down)
            .and_then(Key::from_index)
    }
}
