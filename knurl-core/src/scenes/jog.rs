//! The jog scene
//!
//! Lets the operator select axes, pick a step multiplier, and drive pulse
//! or continuous motion, with deterministic cancellation. This scene is
//! the event dispatcher of the pendant: every input event becomes a state
//! mutation, zero or more outbound commands, and a redraw request.

use knurl_proto::command::run_routine;
use knurl_proto::{Axis, MachineState, RealtimeSignal, RelativeJog, UnitMode, ZeroOffset, E4, HOME_ALL};

use crate::axis::AxisSet;
use crate::jog::{JogPhase, JogSession};
use crate::scene::{ButtonId, FlickDirection, JogButton, Scene, SceneCtx, SceneId};
use crate::step::StepTable;
use crate::tuning::{
    self, DialPressAction, FlickAction, HoldAction, JogTuning, CONTINUOUS_FEED_SCALE,
    MULTI_AXIS_TRAVEL_SCALE, UNHOMED_ALARM_CODE,
};
use crate::view::{AxisReadout, JogView};

/// Fractional digits for the continuous-jog feed word
const CONTINUOUS_FEED_DECIMALS: u8 = 3;

/// Stored routines reachable from the button grid, in grid order
pub const ROUTINES: [&str; 5] = [
    "macros/probe_right.g",
    "macros/probe_left.g",
    "macros/probe_z.g",
    "macros/probe_front.g",
    "macros/probe_rear.g",
];

/// What a grid button means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogAction {
    /// Make this the only selected axis
    SelectAxis(Axis),
    /// Set every axis's step index to this value
    SetStepIndex(u8),
    /// Start a homing cycle
    Home,
    /// Run a stored routine by grid position
    Routine(u8),
}

impl JogAction {
    /// Action for a grid button id (4 rows x 3 columns, top-left first)
    pub fn for_button(button: ButtonId) -> Option<JogAction> {
        match button.0 {
            0..=2 => Axis::from_index(button.0 as usize).map(JogAction::SelectAxis),
            // The step row runs coarse-to-fine: X100, X10, X1
            3 => Some(JogAction::SetStepIndex(2)),
            4 => Some(JogAction::SetStepIndex(1)),
            5 => Some(JogAction::SetStepIndex(0)),
            6 => Some(JogAction::Home),
            7..=11 => Some(JogAction::Routine(button.0 - 7)),
            _ => None,
        }
    }

    /// Axis whose offset a touch-hold on this button zeroes
    pub fn held_axis(button: ButtonId) -> Option<Axis> {
        match button.0 {
            0..=2 => Axis::from_index(button.0 as usize),
            _ => None,
        }
    }
}

/// The jog-control scene
pub struct JogScene {
    axes: AxisSet,
    steps: StepTable,
    session: JogSession,
    tuning: JogTuning,
    locked: bool,
    /// Auto-navigation on the first observed state change fires once per
    /// scene lifetime
    first_state_seen: bool,
}

impl Default for JogScene {
    fn default() -> Self {
        Self::new(JogTuning::default())
    }
}

impl JogScene {
    pub fn new(tuning: JogTuning) -> Self {
        Self {
            axes: AxisSet::single(Axis::X),
            steps: StepTable::new(),
            session: JogSession::new(),
            tuning,
            locked: false,
            first_state_seen: false,
        }
    }

    pub fn session_phase(&self) -> JogPhase {
        self.session.phase()
    }

    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    pub fn steps(&self) -> &StepTable {
        &self.steps
    }

    /// True while clicks must be swallowed: jog in flight or cancel
    /// pending. A deliberate safety gate, evaluated against both the
    /// session and the snapshot so a stale snapshot cannot open it early.
    fn clicks_gated(&self, cx: &SceneCtx) -> bool {
        cx.snapshot.state.is_jogging() || self.session.phase().is_active()
    }

    /// Emit one bounded relative jog scaled by the encoder delta
    fn pulse_jog(&mut self, cx: &mut SceneCtx, delta: i16) {
        if self.axes.is_empty() {
            return;
        }
        // Fastest band among the selected axes drives the shared feed word
        let mut feed = 0;
        for axis in self.axes.iter() {
            feed = feed.max(tuning::pulse_feed(self.steps.multiplier(axis, cx.units)));
        }
        let mut jog = RelativeJog::new(
            E4::from_int(feed),
            0,
            None,
            cx.units.jog_decimals(),
        );
        for axis in self.axes.iter() {
            let travel = self.steps.multiplier(axis, cx.units).scale(i32::from(delta));
            jog.push(axis, travel);
        }
        let _ = cx.sink.send_line(jog.render().as_str());
        self.session.begin_pulse();
    }

    /// Emit one open-ended jog in the given direction across the selection
    fn continuous_jog(&mut self, cx: &mut SceneCtx, negative: bool) {
        let n_axes = self.axes.len();
        if n_axes == 0 {
            return;
        }
        // Feed from the vector magnitude of the selected multipliers
        let mut total = E4::ZERO;
        for axis in self.axes.iter() {
            total = E4::magnitude(total, self.steps.multiplier(axis, cx.units));
        }
        let feed = total.scale(CONTINUOUS_FEED_SCALE);

        let mut jog = RelativeJog::new(feed, CONTINUOUS_FEED_DECIMALS, Some(cx.units), 0);
        for axis in self.axes.iter() {
            let mut travel = if n_axes == 1 {
                tuning::single_axis_travel(cx.units)
            } else {
                self.steps
                    .multiplier(axis, cx.units)
                    .scale(MULTI_AXIS_TRAVEL_SCALE)
            };
            if negative {
                travel = -travel;
            }
            jog.push(axis, travel);
        }
        let _ = cx.sink.send_line(jog.render().as_str());
        self.session.begin_continuous();
    }

    /// Request cancellation of any jog in flight
    fn cancel_jog(&mut self, cx: &mut SceneCtx) {
        if self.session.request_cancel(cx.snapshot.state.is_jogging()) {
            let _ = cx.sink.send_realtime(RealtimeSignal::JogCancel);
        }
    }

    /// Zero the work offset of the given axes
    fn zero_axes(&self, cx: &mut SceneCtx, cmd: &ZeroOffset) {
        if !cmd.is_empty() {
            let _ = cx.sink.send_line(cmd.render().as_str());
        }
    }

    fn zero_selected(&self, cx: &mut SceneCtx) {
        let mut cmd = ZeroOffset::new();
        for axis in self.axes.iter() {
            cmd.push(axis);
        }
        self.zero_axes(cx, &cmd);
    }

    /// Build the view-model for the reconciler
    pub fn view(&self, cx: &SceneCtx) -> JogView {
        let axes = Axis::ALL.map(|axis| AxisReadout {
            axis,
            position: cx.snapshot.wpos[axis.index()],
            selected: self.axes.selected(axis),
            step_index: self.steps.get(axis),
        });

        let jogging = cx.snapshot.state.is_jogging();
        let cancel_banner = self.session.phase().cancel_pending();
        let touch_hint = jogging
            && !cancel_banner
            && matches!(self.session.phase(), JogPhase::Jogging { continuous: false });

        let mut dial_legend = heapless::String::new();
        if self.tuning.dial_press == DialPressAction::ZeroSelectedAxes {
            let _ = dial_legend.push_str("Zero");
            for axis in self.axes.iter() {
                let _ = dial_legend.push(axis.letter());
            }
        } else {
            let _ = dial_legend.push_str("Back");
        }

        JogView {
            state: cx.snapshot.state,
            last_alarm: cx.snapshot.last_alarm,
            axes,
            cancel_banner,
            touch_hint,
            show_legends: !jogging && !cancel_banner,
            dial_legend,
            locked: self.locked,
        }
    }
}

impl Scene for JogScene {
    fn on_refresh(&mut self, cx: &mut SceneCtx) {
        // A 1mm pulse at F2000 lasts about 30ms and routinely finishes
        // between two status polls, so no state change ever arrives for
        // it. Resolving against every snapshot keeps the session from
        // latching "jogging" forever after such a pulse.
        self.session.observe(cx.snapshot.state);
    }

    fn on_entry(&mut self, cx: &mut SceneCtx) {
        self.axes = AxisSet::single(Axis::X);
        self.steps.load(cx.prefs);
        self.session.reset();
        self.locked = false;
        self.first_state_seen = false;
        cx.request_redraw();
    }

    fn on_exit(&mut self, cx: &mut SceneCtx) {
        // The machine must never keep moving after the operator leaves
        // this control surface
        self.cancel_jog(cx);
    }

    fn on_touch_press(&mut self, cx: &mut SceneCtx) {
        if self.session.hold_cancel(cx.snapshot.state.is_jogging()) {
            let _ = cx.sink.send_realtime(RealtimeSignal::JogCancel);
        }
        cx.request_redraw();
    }

    fn on_touch_release(&mut self, cx: &mut SceneCtx) {
        self.session.release_hold(cx.snapshot.state.is_jogging());
        cx.request_redraw();
    }

    fn on_touch_click(&mut self, cx: &mut SceneCtx, button: ButtonId) {
        if self.locked || self.clicks_gated(cx) {
            return;
        }
        let Some(action) = JogAction::for_button(button) else {
            return;
        };
        match action {
            JogAction::SelectAxis(axis) => {
                self.axes.clear();
                self.axes.select(axis);
                cx.request_redraw();
            }
            JogAction::SetStepIndex(index) => {
                for axis in Axis::ALL {
                    self.steps.set(axis, index, cx.prefs);
                }
                cx.request_redraw();
            }
            JogAction::Home => {
                if cx.snapshot.state.allows_homing() {
                    let _ = cx.sink.send_line(HOME_ALL);
                    cx.request_redraw();
                }
            }
            JogAction::Routine(slot) => {
                if cx.snapshot.state.allows_routine() {
                    if let Some(path) = ROUTINES.get(slot as usize) {
                        let _ = cx.sink.send_line(run_routine(path).as_str());
                    }
                }
            }
        }
    }

    fn on_touch_hold(&mut self, cx: &mut SceneCtx, button: ButtonId) {
        if self.locked || self.clicks_gated(cx) {
            return;
        }
        match self.tuning.hold_action {
            HoldAction::ZeroMappedAxis => {
                if let Some(axis) = JogAction::held_axis(button) {
                    self.zero_axes(cx, &ZeroOffset::single(axis));
                    cx.request_redraw();
                }
            }
            HoldAction::ZeroSelectedAxes => {
                self.zero_selected(cx);
                cx.request_redraw();
            }
            HoldAction::ToggleAxis => {
                if let Some(axis) = JogAction::held_axis(button) {
                    if self.axes.selected(axis) && !self.axes.only(axis) {
                        self.axes.unselect(axis);
                    } else {
                        self.axes.select(axis);
                    }
                    cx.request_redraw();
                }
            }
        }
    }

    fn on_flick(&mut self, cx: &mut SceneCtx, direction: FlickDirection) {
        match direction {
            FlickDirection::Up | FlickDirection::Down => {
                if self.locked || self.clicks_gated(cx) {
                    return;
                }
                if direction == FlickDirection::Up {
                    self.axes.cycle_prev();
                } else {
                    self.axes.cycle_next();
                }
                cx.request_redraw();
            }
            FlickDirection::Left | FlickDirection::Right => match self.tuning.flick {
                FlickAction::Navigate => {
                    if direction == FlickDirection::Right {
                        cx.nav.activate(SceneId::FileSelect);
                    } else {
                        cx.nav.pop();
                    }
                }
                FlickAction::StepAdjust => {
                    if self.locked || self.clicks_gated(cx) {
                        return;
                    }
                    if direction == FlickDirection::Left {
                        self.steps.increment_all(&self.axes, cx.prefs);
                    } else {
                        self.steps.decrement_all(&self.axes, cx.prefs);
                    }
                    cx.request_redraw();
                }
            },
        }
    }

    fn on_encoder(&mut self, cx: &mut SceneCtx, delta: i16) {
        if self.locked || delta == 0 {
            return;
        }
        self.pulse_jog(cx, delta);
        cx.request_redraw();
    }

    fn on_button_press(&mut self, cx: &mut SceneCtx, button: JogButton) {
        if self.locked {
            return;
        }
        if cx.snapshot.state == MachineState::Idle {
            self.continuous_jog(cx, button.negative());
            cx.request_redraw();
        }
    }

    fn on_button_release(&mut self, cx: &mut SceneCtx, _button: JogButton) {
        // Always a cancel request, whatever the current state; idempotent
        self.cancel_jog(cx);
        cx.request_redraw();
    }

    fn on_dial_press(&mut self, cx: &mut SceneCtx) {
        if self.locked || self.clicks_gated(cx) {
            return;
        }
        match self.tuning.dial_press {
            DialPressAction::ZeroSelectedAxes => {
                self.zero_selected(cx);
                cx.request_redraw();
            }
            DialPressAction::PopScene => cx.nav.pop(),
        }
    }

    fn on_lock(&mut self, cx: &mut SceneCtx, locked: bool) {
        self.locked = locked;
        if locked {
            self.cancel_jog(cx);
        }
        cx.request_redraw();
    }

    fn on_state_change(&mut self, cx: &mut SceneCtx, _old: MachineState) {
        if !self.first_state_seen {
            self.first_state_seen = true;
            // A controller that has never been homed comes up in Alarm 14;
            // steer the operator to the homing screen once
            if cx.snapshot.state == MachineState::Alarm
                && cx.snapshot.last_alarm == Some(UNHOMED_ALARM_CODE)
            {
                cx.nav.activate(SceneId::Homing);
            }
        }
        cx.request_redraw();
    }
}
