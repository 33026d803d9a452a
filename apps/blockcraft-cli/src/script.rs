use blockcraft_input::{InputState, Key, MouseButton};

/// Pseudo-random player driving an `InputState` with raw events, the way a
/// host window would.
pub struct ScriptedPlayer {
    rng: u64,
    input: InputState,
}

const MOVE_KEYS: [Key; 5] = [Key::W, Key::A, Key::S, Key::D, Key::Space];

impl ScriptedPlayer {
    pub fn new(seed: u64) -> Self {
        let mut input = InputState::new();
        input.set_pointer_locked(true);
        Self { rng: seed, input }
    }

    fn next(&mut self) -> u64 {
        self.rng = self.rng.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.rng;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Feed one frame's worth of events and return the input state.
    pub fn frame(&mut self) -> &mut InputState {
        let bits = self.next();

        // Toggle one movement key now and then so keys stay held for a while.
        if bits & 0x7 == 0 {
            let key = MOVE_KEYS[((bits >> 3) % MOVE_KEYS.len() as u64) as usize];
            if self.input.is_held(key) {
                self.input.key_up(key);
            } else {
                self.input.key_down(key);
            }
        }
        if self.input.is_held(Key::Space) && bits & 0x30 == 0 {
            self.input.key_up(Key::Space);
        }

        let dx = ((bits >> 8) & 0xff) as f32 - 127.5;
        let dy = ((bits >> 16) & 0xff) as f32 - 127.5;
        self.input.mouse_motion(dx * 0.1, dy * 0.1);

        match (bits >> 24) & 0x3f {
            0 => self.input.mouse_button(MouseButton::Left),
            1 => self.input.mouse_button(MouseButton::Right),
            2 => {
                let digit = 1 + ((bits >> 32) % 5) as u8;
                self.input.key_down(Key::Digit(digit));
                self.input.key_up(Key::Digit(digit));
            }
            _ => {}
        }
        &mut self.input
    }
}
