/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   X / L1 , D-pad Left    →  Left peg
///   Y / A  , D-pad Up      →  Middle peg
///   B / R1 , D-pad Right   →  Right peg
///   Start                  →  Confirm / Restart
///   Select                 →  Back
///
/// On the difficulty list, D-pad / stick up and down move the cursor.
/// Without the `gamepad` feature every query returns false.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Clone, Debug, PartialEq)]
struct ActionMap {
    pegs: [Vec<Btn>; 3],
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            pegs: [
                vec![Btn::X, Btn::L1],
                vec![Btn::Y, Btn::A],
                vec![Btn::B, Btn::R1],
            ],
            confirm: vec![Btn::Start],
            cancel:  vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Unknown names are skipped; a list with no known names keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_into(names: &[String], slot: &mut Vec<Btn>) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
        let mut map = ActionMap::default();
        parse_into(&cfg.left, &mut map.pegs[0]);
        parse_into(&cfg.middle, &mut map.pegs[1]);
        parse_into(&cfg.right, &mut map.pegs[2]);
        parse_into(&cfg.confirm, &mut map.confirm);
        parse_into(&cfg.cancel, &mut map.cancel);
        map
    }
}

/// Direction pad plus the left stick folded onto it.
#[derive(Clone, Copy, Debug, Default)]
struct Dpad {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons that went down since the last `update()`.
    just_pressed: [bool; BTN_COUNT],
    dpad_pressed: Dpad,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_held: Dpad,

    action_map: ActionMap,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = match Gilrs::new() {
            Ok(g) => {
                if let Some((_, pad)) = g.gamepads().next() {
                    tracing::info!(name = pad.name(), "gamepad found");
                }
                Some(g)
            }
            Err(e) => {
                tracing::warn!(error = %e, "gamepad support unavailable");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            dpad_pressed: Dpad::default(),
            stick_held: Dpad::default(),
            action_map: ActionMap::default(),
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map = ActionMap::from_config(cfg);
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad_pressed = Dpad::default();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.press_button(btn),
                EventType::AxisChanged(axis, value, _) => self.update_axis(axis, value),
                EventType::Connected => tracing::info!("gamepad connected"),
                EventType::Disconnected => {
                    self.stick_held = Dpad::default();
                    tracing::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press_button(&mut self, gilrs_btn: Button) {
        match gilrs_btn {
            Button::DPadUp    => self.dpad_pressed.up = true,
            Button::DPadDown  => self.dpad_pressed.down = true,
            Button::DPadLeft  => self.dpad_pressed.left = true,
            Button::DPadRight => self.dpad_pressed.right = true,
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    self.just_pressed[btn_index(btn)] = true;
                }
            }
        }
    }

    /// Stick crossings of the deadzone count as one D-pad press.
    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        let (neg, pos) = match axis {
            Axis::LeftStickX => (value < -STICK_DEADZONE, value > STICK_DEADZONE),
            Axis::LeftStickY => (value > STICK_DEADZONE, value < -STICK_DEADZONE),
            _ => return,
        };
        let (held_neg, held_pos, pressed_neg, pressed_pos) = match axis {
            Axis::LeftStickX => (
                &mut self.stick_held.left,
                &mut self.stick_held.right,
                &mut self.dpad_pressed.left,
                &mut self.dpad_pressed.right,
            ),
            _ => (
                &mut self.stick_held.up,
                &mut self.stick_held.down,
                &mut self.dpad_pressed.up,
                &mut self.dpad_pressed.down,
            ),
        };
        if neg && !*held_neg {
            *pressed_neg = true;
        }
        if pos && !*held_pos {
            *pressed_pos = true;
        }
        *held_neg = neg;
        *held_pos = pos;
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[btn_index(b)])
    }

    /// Peg selected this frame by a face button or the D-pad.
    /// D-pad up doubles as the middle peg.
    pub fn peg_pressed(&self) -> Option<usize> {
        if self.dpad_pressed.left || self.any_just_pressed(&self.action_map.pegs[0]) {
            return Some(0);
        }
        if self.dpad_pressed.up || self.any_just_pressed(&self.action_map.pegs[1]) {
            return Some(1);
        }
        if self.dpad_pressed.right || self.any_just_pressed(&self.action_map.pegs[2]) {
            return Some(2);
        }
        None
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }

    pub fn up_pressed(&self) -> bool {
        self.dpad_pressed.up
    }

    pub fn down_pressed(&self) -> bool {
        self.dpad_pressed.down
    }
}
