//! Scene capability and event dispatch
//!
//! Scenes are the screens of the pendant. The navigation stack itself
//! lives outside this crate; a scene only receives lifecycle and input
//! events through the `Scene` trait (one method per hook, default no-op)
//! and talks to its collaborators through the narrow traits on `SceneCtx`.
//!
//! The machine state is handed to each dispatch as a read-only snapshot,
//! refreshed by the surrounding scheduler before the event is delivered.
//! It is eventually consistent: a handler may observe a state the machine
//! has already left, which is why cancellation is idempotent rather than
//! guarded by a "we are definitely jogging" precondition.

use knurl_proto::{Axis, MachineState, RealtimeSignal, UnitMode, E4};

/// Logical id of a touch button on the current screen layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(pub u8);

/// The two dedicated directional jog buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogButton {
    /// Red button, jogs in the negative direction
    Minus,
    /// Green button, jogs in the positive direction
    Plus,
}

impl JogButton {
    /// True if this button commands negative travel
    pub const fn negative(self) -> bool {
        matches!(self, JogButton::Minus)
    }
}

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlickDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Scenes the pendant can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneId {
    Jog,
    Homing,
    FileSelect,
    Status,
}

/// Everything that can happen to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneEvent {
    /// Scene became the active screen
    Entry,
    /// Scene is about to be deactivated
    Exit,
    /// Finger down anywhere on the screen
    TouchPress,
    /// Finger up
    TouchRelease,
    /// Completed tap resolved to a layout button
    TouchClick(ButtonId),
    /// Sustained touch resolved to a layout button
    TouchHold(ButtonId),
    /// Horizontal swipe
    Flick(FlickDirection),
    /// Rotary encoder moved by this many detents
    Encoder(i16),
    /// Directional jog button pressed
    ButtonPress(JogButton),
    /// Directional jog button released
    ButtonRelease(JogButton),
    /// Dial (encoder) button pressed briefly
    DialPress,
    /// Screen lock toggled
    Lock(bool),
    /// The machine state observable changed
    StateChange { old: MachineState },
}

/// Read-only snapshot of the externally owned machine state
///
/// Taken by the scheduler immediately before each dispatch. Treated as
/// last-write-wins with no ordering guarantee relative to commands the
/// pendant just sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineSnapshot {
    pub state: MachineState,
    /// Code of the most recent alarm, if any
    pub last_alarm: Option<u8>,
    /// Work position per axis
    pub wpos: [E4; Axis::COUNT],
}

impl Default for MachineSnapshot {
    fn default() -> Self {
        Self {
            state: MachineState::Disconnected,
            last_alarm: None,
            wpos: [E4::ZERO; Axis::COUNT],
        }
    }
}

impl MachineSnapshot {
    pub fn idle() -> Self {
        Self {
            state: MachineState::Idle,
            ..Self::default()
        }
    }
}

/// Transmission failed before leaving the pendant
///
/// Sends are fire-and-forget: callers discard this by convention
/// (`let _ = ...`). A dropped send has no observable effect beyond the
/// machine not moving, which the operator sees via the state readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendError;

/// Outbound channel to the motion controller
pub trait CommandSink {
    /// Queue one newline-terminated command line
    fn send_line(&mut self, line: &str) -> Result<(), SendError>;

    /// Emit an out-of-band realtime byte, bypassing the line channel
    fn send_realtime(&mut self, signal: RealtimeSignal) -> Result<(), SendError>;
}

/// Keyed integer preference persistence
pub trait PrefStore {
    fn get(&mut self, name: &str, index: usize) -> Option<i32>;
    fn set(&mut self, name: &str, index: usize, value: i32);
}

/// Requests into the navigation stack this scene participates in
pub trait Navigator {
    /// Make the named scene the active screen
    fn activate(&mut self, scene: SceneId);
    /// Return to the previous scene
    fn pop(&mut self);
}

/// Per-dispatch context handed to every hook
pub struct SceneCtx<'a> {
    pub snapshot: MachineSnapshot,
    pub units: UnitMode,
    pub sink: &'a mut dyn CommandSink,
    pub prefs: &'a mut dyn PrefStore,
    pub nav: &'a mut dyn Navigator,
    redraw: bool,
}

impl<'a> SceneCtx<'a> {
    pub fn new(
        snapshot: MachineSnapshot,
        units: UnitMode,
        sink: &'a mut dyn CommandSink,
        prefs: &'a mut dyn PrefStore,
        nav: &'a mut dyn Navigator,
    ) -> Self {
        Self {
            snapshot,
            units,
            sink,
            prefs,
            nav,
            redraw: false,
        }
    }

    /// Ask the scheduler to redraw after this handler returns
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Whether any handler in this dispatch requested a redraw
    pub fn redraw_requested(&self) -> bool {
        self.redraw
    }
}

/// A pendant screen
///
/// One method per lifecycle or input hook, all defaulting to no-ops, so a
/// scene implements only what it reacts to.
pub trait Scene {
    /// Reconcile internal state against the freshly taken snapshot
    ///
    /// Runs before every event is delivered, including events that carry
    /// no state change of their own. A bounded jog can start and finish
    /// between two status polls without the state observable ever
    /// changing, so a scene that latches "motion in flight" must resolve
    /// that latch here rather than waiting for a `StateChange`.
    fn on_refresh(&mut self, cx: &mut SceneCtx) {
        let _ = cx;
    }
    fn on_entry(&mut self, cx: &mut SceneCtx) {
        let _ = cx;
    }
    fn on_exit(&mut self, cx: &mut SceneCtx) {
        let _ = cx;
    }
    fn on_touch_press(&mut self, cx: &mut SceneCtx) {
        let _ = cx;
    }
    fn on_touch_release(&mut self, cx: &mut SceneCtx) {
        let _ = cx;
    }
    fn on_touch_click(&mut self, cx: &mut SceneCtx, button: ButtonId) {
        let _ = (cx, button);
    }
    fn on_touch_hold(&mut self, cx: &mut SceneCtx, button: ButtonId) {
        let _ = (cx, button);
    }
    fn on_flick(&mut self, cx: &mut SceneCtx, direction: FlickDirection) {
        let _ = (cx, direction);
    }
    fn on_encoder(&mut self, cx: &mut SceneCtx, delta: i16) {
        let _ = (cx, delta);
    }
    fn on_button_press(&mut self, cx: &mut SceneCtx, button: JogButton) {
        let _ = (cx, button);
    }
    fn on_button_release(&mut self, cx: &mut SceneCtx, button: JogButton) {
        let _ = (cx, button);
    }
    fn on_dial_press(&mut self, cx: &mut SceneCtx) {
        let _ = cx;
    }
    fn on_lock(&mut self, cx: &mut SceneCtx, locked: bool) {
        let _ = (cx, locked);
    }
    fn on_state_change(&mut self, cx: &mut SceneCtx, old: MachineState) {
        let _ = (cx, old);
    }
}

/// Deliver one event to a scene
///
/// Runs the matching hook to completion; the caller checks
/// `cx.redraw_requested()` afterwards and reconciles the display.
pub fn dispatch(scene: &mut dyn Scene, event: SceneEvent, cx: &mut SceneCtx) {
    scene.on_refresh(cx);
    match event {
        SceneEvent::Entry => scene.on_entry(cx),
        SceneEvent::Exit => scene.on_exit(cx),
        SceneEvent::TouchPress => scene.on_touch_press(cx),
        SceneEvent::TouchRelease => scene.on_touch_release(cx),
        SceneEvent::TouchClick(button) => scene.on_touch_click(cx, button),
        SceneEvent::TouchHold(button) => scene.on_touch_hold(cx, button),
        SceneEvent::Flick(direction) => scene.on_flick(cx, direction),
        SceneEvent::Encoder(delta) => scene.on_encoder(cx, delta),
        SceneEvent::ButtonPress(button) => scene.on_button_press(cx, button),
        SceneEvent::ButtonRelease(button) => scene.on_button_release(cx, button),
        SceneEvent::DialPress => scene.on_dial_press(cx),
        SceneEvent::Lock(locked) => scene.on_lock(cx, locked),
        SceneEvent::StateChange { old } => scene.on_state_change(cx, old),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use testing::{MemPrefs, RecordingNav, RecordingSink};

    #[derive(Default)]
    struct CountingScene {
        refreshes: usize,
        entries: usize,
        encoder_total: i32,
    }

    impl Scene for CountingScene {
        fn on_refresh(&mut self, _cx: &mut SceneCtx) {
            self.refreshes += 1;
        }

        fn on_entry(&mut self, cx: &mut SceneCtx) {
            // Refresh has already run when the event hook fires
            assert_eq!(self.refreshes, self.entries + 1);
            self.entries += 1;
            cx.request_redraw();
        }

        fn on_encoder(&mut self, _cx: &mut SceneCtx, delta: i16) {
            self.encoder_total += i32::from(delta);
        }
    }

    #[test]
    fn test_dispatch_routes_to_hooks() {
        let mut scene = CountingScene::default();
        let mut sink = RecordingSink::default();
        let mut prefs = MemPrefs::default();
        let mut nav = RecordingNav::default();
        let mut cx = SceneCtx::new(
            MachineSnapshot::idle(),
            UnitMode::Mm,
            &mut sink,
            &mut prefs,
            &mut nav,
        );

        dispatch(&mut scene, SceneEvent::Entry, &mut cx);
        dispatch(&mut scene, SceneEvent::Encoder(3), &mut cx);
        dispatch(&mut scene, SceneEvent::Encoder(-1), &mut cx);
        // Hooks the scene does not implement fall through to no-ops
        dispatch(&mut scene, SceneEvent::DialPress, &mut cx);

        assert_eq!(scene.entries, 1);
        assert_eq!(scene.encoder_total, 2);
        // Every dispatch refreshes, even for unimplemented hooks
        assert_eq!(scene.refreshes, 4);
        assert!(cx.redraw_requested());
    }
}
