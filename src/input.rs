use crate::monitors::Region;
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parse a button name. `primary`/`secondary` are accepted as aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "primary" => Some(MouseButton::Left),
            "right" | "secondary" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete device action decided by the trigger engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    KeyDown(String),
    KeyUp(String),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    Click(MouseButton),
    MoveTo { x: i32, y: i32 },
}

/// OS-level input injection.
///
/// Implementations own their failure handling: the engine treats every call
/// as infallible and never retries.
pub trait InputBackend: Send + Sync {
    fn key_down(&self, key: &str);
    fn key_up(&self, key: &str);
    fn mouse_down(&self, button: MouseButton);
    fn mouse_up(&self, button: MouseButton);
    fn click(&self, button: MouseButton);
    fn move_to(&self, x: i32, y: i32);
    fn cursor_position(&self) -> (i32, i32);
    fn screen_size(&self) -> (i32, i32);

    fn perform(&self, action: &InputAction) {
        match action {
            InputAction::KeyDown(key) => self.key_down(key),
            InputAction::KeyUp(key) => self.key_up(key),
            InputAction::MouseDown(button) => self.mouse_down(*button),
            InputAction::MouseUp(button) => self.mouse_up(*button),
            InputAction::Click(button) => self.click(*button),
            InputAction::MoveTo { x, y } => self.move_to(*x, *y),
        }
    }
}

/// Display region enumeration.
pub trait DisplayBackend: Send + Sync {
    fn enumerate_regions(&self) -> Vec<Region>;
}

/// Input backend for the running platform.
///
/// On Windows actions are injected with `SendInput`; elsewhere they are only
/// logged, which keeps sample replays usable on any machine.
#[derive(Debug, Default)]
pub struct SystemInput;

impl InputBackend for SystemInput {
    fn key_down(&self, key: &str) {
        report("key down", platform::send_key(key, true));
    }

    fn key_up(&self, key: &str) {
        report("key up", platform::send_key(key, false));
    }

    fn mouse_down(&self, button: MouseButton) {
        report("mouse down", platform::send_button(button, ButtonPhase::Down));
    }

    fn mouse_up(&self, button: MouseButton) {
        report("mouse up", platform::send_button(button, ButtonPhase::Up));
    }

    fn click(&self, button: MouseButton) {
        report("click", platform::send_button(button, ButtonPhase::Click));
    }

    fn move_to(&self, x: i32, y: i32) {
        report("move cursor", platform::move_cursor(x, y));
    }

    fn cursor_position(&self) -> (i32, i32) {
        platform::cursor_position()
    }

    fn screen_size(&self) -> (i32, i32) {
        platform::screen_size()
    }
}

#[derive(Debug, Default)]
pub struct SystemDisplay;

impl DisplayBackend for SystemDisplay {
    fn enumerate_regions(&self) -> Vec<Region> {
        platform::enumerate_monitors()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonPhase {
    Down,
    Up,
    Click,
}

fn report(op: &str, result: anyhow::Result<()>) {
    if let Err(err) = result {
        tracing::error!(?err, op, "input injection failed");
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::{ButtonPhase, MouseButton};
    use crate::keys::virtual_key_from_string;
    use crate::monitors::Region;
    use anyhow::Context;
    use std::mem;
    use windows::Win32::Foundation::{BOOL, LPARAM, POINT, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
    };
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
        KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN,
        MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEINPUT,
        MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        GetCursorPos, GetSystemMetrics, SetCursorPos, SM_CXSCREEN, SM_CYSCREEN,
    };

    pub(super) fn send_key(key: &str, down: bool) -> anyhow::Result<()> {
        let vk = virtual_key_from_string(key)
            .with_context(|| format!("unknown key token '{key}'"))?;
        let flags = if down {
            KEYBD_EVENT_FLAGS(0)
        } else {
            KEYEVENTF_KEYUP
        };
        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(vk),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        send(&[input])
    }

    pub(super) fn send_button(button: MouseButton, phase: ButtonPhase) -> anyhow::Result<()> {
        let (down, up) = match button {
            MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
            MouseButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
        };
        match phase {
            ButtonPhase::Down => send(&[mouse_input(down)]),
            ButtonPhase::Up => send(&[mouse_input(up)]),
            ButtonPhase::Click => send(&[mouse_input(down), mouse_input(up)]),
        }
    }

    fn mouse_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        }
    }

    fn send(inputs: &[INPUT]) -> anyhow::Result<()> {
        let sent = unsafe { SendInput(inputs, mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            anyhow::bail!("SendInput accepted {sent} of {} events", inputs.len());
        }
        Ok(())
    }

    pub(super) fn move_cursor(x: i32, y: i32) -> anyhow::Result<()> {
        unsafe { SetCursorPos(x, y) }.context("SetCursorPos")?;
        Ok(())
    }

    pub(super) fn cursor_position() -> (i32, i32) {
        let mut point = POINT::default();
        if unsafe { GetCursorPos(&mut point) }.is_ok() {
            (point.x, point.y)
        } else {
            (0, 0)
        }
    }

    pub(super) fn screen_size() -> (i32, i32) {
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }

    pub(super) fn enumerate_monitors() -> Vec<Region> {
        unsafe extern "system" fn enum_proc(
            monitor: HMONITOR,
            _hdc: HDC,
            _rect: *mut RECT,
            data: LPARAM,
        ) -> BOOL {
            let regions = unsafe { &mut *(data.0 as *mut Vec<Region>) };
            let mut info = MONITORINFO {
                cbSize: mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
                let rc = info.rcMonitor;
                regions.push(Region {
                    left: rc.left,
                    top: rc.top,
                    right: rc.right,
                    bottom: rc.bottom,
                });
            }
            BOOL(1)
        }

        let mut regions = Vec::new();
        unsafe {
            let _ = EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(enum_proc),
                LPARAM(&mut regions as *mut Vec<Region> as isize),
            );
        }
        regions
    }
}

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::{ButtonPhase, MouseButton};
    use crate::monitors::Region;

    pub(super) fn send_key(key: &str, down: bool) -> anyhow::Result<()> {
        tracing::debug!(key, down, "key event (dry run)");
        Ok(())
    }

    pub(super) fn send_button(button: MouseButton, phase: ButtonPhase) -> anyhow::Result<()> {
        tracing::debug!(%button, ?phase, "mouse event (dry run)");
        Ok(())
    }

    pub(super) fn move_cursor(x: i32, y: i32) -> anyhow::Result<()> {
        tracing::debug!(x, y, "cursor move (dry run)");
        Ok(())
    }

    pub(super) fn cursor_position() -> (i32, i32) {
        (0, 0)
    }

    pub(super) fn screen_size() -> (i32, i32) {
        (0, 0)
    }

    pub(super) fn enumerate_monitors() -> Vec<Region> {
        Vec::new()
    }
}

/// Input backend that records every action instead of injecting it.
///
/// The cursor follows `move_to` so reset/cycle sequences can be chained.
#[derive(Debug)]
pub struct MockInputBackend {
    actions: Mutex<Vec<InputAction>>,
    cursor: Mutex<(i32, i32)>,
    screen: (i32, i32),
}

impl Default for MockInputBackend {
    fn default() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            cursor: Mutex::new((0, 0)),
            screen: (1920, 1080),
        }
    }
}

impl MockInputBackend {
    pub fn with_cursor(x: i32, y: i32) -> Self {
        let backend = Self::default();
        backend.set_cursor(x, y);
        backend
    }

    pub fn set_cursor(&self, x: i32, y: i32) {
        if let Ok(mut cursor) = self.cursor.lock() {
            *cursor = (x, y);
        }
    }

    pub fn actions(&self) -> Vec<InputAction> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Return and clear the recorded actions.
    pub fn take_actions(&self) -> Vec<InputAction> {
        self.actions
            .lock()
            .map(|mut a| std::mem::take(&mut *a))
            .unwrap_or_default()
    }

    fn record(&self, action: InputAction) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
    }
}

impl InputBackend for MockInputBackend {
    fn key_down(&self, key: &str) {
        self.record(InputAction::KeyDown(key.to_string()));
    }

    fn key_up(&self, key: &str) {
        self.record(InputAction::KeyUp(key.to_string()));
    }

    fn mouse_down(&self, button: MouseButton) {
        self.record(InputAction::MouseDown(button));
    }

    fn mouse_up(&self, button: MouseButton) {
        self.record(InputAction::MouseUp(button));
    }

    fn click(&self, button: MouseButton) {
        self.record(InputAction::Click(button));
    }

    fn move_to(&self, x: i32, y: i32) {
        self.set_cursor(x, y);
        self.record(InputAction::MoveTo { x, y });
    }

    fn cursor_position(&self) -> (i32, i32) {
        self.cursor.lock().map(|c| *c).unwrap_or((0, 0))
    }

    fn screen_size(&self) -> (i32, i32) {
        self.screen
    }
}

/// Display backend with a fixed set of regions.
#[derive(Debug, Clone, Default)]
pub struct MockDisplayBackend {
    pub regions: Vec<Region>,
}

impl MockDisplayBackend {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }
}

impl DisplayBackend for MockDisplayBackend {
    fn enumerate_regions(&self) -> Vec<Region> {
        self.regions.clone()
    }
}
