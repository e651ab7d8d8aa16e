//! Operator input tasks
//!
//! Touch panel, rotary encoder, and the three hardware buttons each run
//! as their own task and forward `SceneEvent`s to the dispatch task.

use defmt::{info, warn};
use embassy_rp::gpio::Input;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::i2c::I2c as _;

use knurl_core::{JogButton, SceneEvent};
use knurl_ui::gesture::{GestureEvent, GestureRecognizer, TouchPoint};
use knurl_ui::layout::button_at;

use crate::channels::EVENT_CHANNEL;

/// FT6236 touch controller i2c address
const TOUCH_ADDR: u8 = 0x38;

/// FT6236 register: number of active touches
const REG_TD_STATUS: u8 = 0x02;

/// FT6236 registers: first touch point, X high byte onward
const REG_P1_XH: u8 = 0x03;

/// Touch sample period
const TOUCH_PERIOD: Duration = Duration::from_millis(20);

/// Encoder sample period
const ENCODER_PERIOD: Duration = Duration::from_millis(1);

/// Button sample period
const BUTTON_PERIOD: Duration = Duration::from_millis(10);

/// Consecutive equal samples to accept a button level
const DEBOUNCE_SAMPLES: u8 = 3;

/// Dial press held this long toggles the screen lock instead of
/// registering as a press
const LOCK_HOLD: Duration = Duration::from_millis(1500);

fn queue(event: SceneEvent) {
    if EVENT_CHANNEL.try_send(event).is_err() {
        warn!("event channel full, dropping {:?}", event);
    }
}

/// Sample the FT6236 and run the gesture recognizer
#[embassy_executor::task]
pub async fn touch_task(mut i2c: I2c<'static, I2C1, Async>) {
    info!("touch task started");

    let mut recognizer = GestureRecognizer::new();
    loop {
        Timer::after(TOUCH_PERIOD).await;
        let sample = read_touch(&mut i2c).await;
        let now_ms = Instant::now().as_millis() as u32;
        for event in recognizer.touch(sample, now_ms) {
            match event {
                GestureEvent::Press => queue(SceneEvent::TouchPress),
                GestureEvent::Release => queue(SceneEvent::TouchRelease),
                GestureEvent::Click(point) => {
                    if let Some(button) = button_at(point.x, point.y) {
                        queue(SceneEvent::TouchClick(button));
                    }
                }
                GestureEvent::Hold(point) => {
                    if let Some(button) = button_at(point.x, point.y) {
                        queue(SceneEvent::TouchHold(button));
                    }
                }
                GestureEvent::Flick(direction) => queue(SceneEvent::Flick(direction)),
            }
        }
    }
}

/// Read the first touch point, if any
async fn read_touch(i2c: &mut I2c<'static, I2C1, Async>) -> Option<TouchPoint> {
    let mut status = [0u8; 1];
    if i2c
        .write_read(TOUCH_ADDR, &[REG_TD_STATUS], &mut status)
        .await
        .is_err()
    {
        return None;
    }
    if status[0] & 0x0f == 0 {
        return None;
    }
    let mut point = [0u8; 4];
    if i2c
        .write_read(TOUCH_ADDR, &[REG_P1_XH], &mut point)
        .await
        .is_err()
    {
        return None;
    }
    let x = i32::from(point[0] & 0x0f) << 8 | i32::from(point[1]);
    let y = i32::from(point[2] & 0x0f) << 8 | i32::from(point[3]);
    Some(TouchPoint { x, y })
}

/// Decode the quadrature encoder by polling both phases
///
/// Standard Gray-code transition table; one detent is four quarter
/// steps, and each completed detent becomes one `Encoder` event.
#[embassy_executor::task]
pub async fn encoder_task(phase_a: Input<'static>, phase_b: Input<'static>) {
    info!("encoder task started");

    // Quarter-step delta indexed by (previous << 2) | current
    const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

    let mut previous = encoder_state(&phase_a, &phase_b);
    let mut quarters: i8 = 0;
    loop {
        Timer::after(ENCODER_PERIOD).await;
        let current = encoder_state(&phase_a, &phase_b);
        if current == previous {
            continue;
        }
        quarters += TRANSITIONS[usize::from(previous << 2 | current)];
        previous = current;
        if quarters.abs() >= 4 {
            let delta = i16::from(quarters / 4);
            quarters = 0;
            queue(SceneEvent::Encoder(delta));
        }
    }
}

fn encoder_state(phase_a: &Input<'static>, phase_b: &Input<'static>) -> u8 {
    (u8::from(phase_a.is_high()) << 1) | u8::from(phase_b.is_high())
}

/// Debounce and forward the directional and dial buttons
///
/// Buttons are active low. The dial button is dual-purpose: a short
/// press registers on release as `DialPress`, holding it for `LOCK_HOLD`
/// toggles the screen lock instead.
#[embassy_executor::task]
pub async fn button_task(minus: Input<'static>, plus: Input<'static>, dial: Input<'static>) {
    info!("button task started");

    let mut debounce = [Debounce::new(); 3];
    let mut locked = false;
    let mut dial_down_at: Option<Instant> = None;
    let mut dial_lock_fired = false;
    loop {
        Timer::after(BUTTON_PERIOD).await;
        let levels = [minus.is_low(), plus.is_low(), dial.is_low()];
        for (slot, pressed) in levels.into_iter().enumerate() {
            match debounce[slot].update(pressed) {
                Some(true) => match slot {
                    0 => queue(SceneEvent::ButtonPress(JogButton::Minus)),
                    1 => queue(SceneEvent::ButtonPress(JogButton::Plus)),
                    _ => {
                        dial_down_at = Some(Instant::now());
                        dial_lock_fired = false;
                    }
                },
                Some(false) => match slot {
                    0 => queue(SceneEvent::ButtonRelease(JogButton::Minus)),
                    1 => queue(SceneEvent::ButtonRelease(JogButton::Plus)),
                    _ => {
                        if dial_down_at.take().is_some() && !dial_lock_fired {
                            queue(SceneEvent::DialPress);
                        }
                    }
                },
                None => {}
            }
        }
        if let Some(down_at) = dial_down_at {
            if !dial_lock_fired && down_at.elapsed() >= LOCK_HOLD {
                dial_lock_fired = true;
                locked = !locked;
                info!("screen lock {}", locked);
                queue(SceneEvent::Lock(locked));
            }
        }
    }
}

/// Level debouncer: a change is accepted after it holds steady for
/// `DEBOUNCE_SAMPLES` consecutive samples
#[derive(Clone, Copy)]
struct Debounce {
    stable: bool,
    candidate: bool,
    run: u8,
}

impl Debounce {
    const fn new() -> Self {
        Self {
            stable: false,
            candidate: false,
            run: 0,
        }
    }

    /// Feed one sample; returns the new level when it changes
    fn update(&mut self, level: bool) -> Option<bool> {
        if level == self.stable {
            self.run = 0;
            return None;
        }
        if level == self.candidate {
            self.run += 1;
        } else {
            self.candidate = level;
            self.run = 1;
        }
        if self.run >= DEBOUNCE_SAMPLES {
            self.stable = level;
            self.run = 0;
            return Some(level);
        }
        None
    }
}
