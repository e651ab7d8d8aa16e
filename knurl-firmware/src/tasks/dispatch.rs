//! Scene dispatch and rendering
//!
//! Owns the jog scene, the preference cache, and the panel. Each event is
//! dispatched against a fresh snapshot; the screen is reconciled only
//! when a handler asked for it.

use defmt::{info, warn};
use display_interface_spi::SPIInterface;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::ST7789;

use knurl_core::scenes::JogScene;
use knurl_core::{dispatch, CommandSink, Navigator, SceneCtx, SceneEvent, SceneId, SendError};
use knurl_proto::{RealtimeSignal, UnitMode};
use knurl_ui::{render, EgSurface};

use crate::channels::{snapshot, EVENT_CHANNEL, LINE_CHANNEL, REALTIME_CHANNEL};
use crate::prefs::CachedPrefs;

/// Unit system of the controller's reports and this pendant's display
///
/// FluidNC reports millimeters regardless of modal state; an inch-mode
/// pendant variant flips this constant.
const UNITS: UnitMode = UnitMode::Mm;

type PanelBus = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;
pub type Panel =
    mipidsi::Display<SPIInterface<PanelBus, Output<'static>>, ST7789, Output<'static>>;

/// `CommandSink` backed by the link channels
struct LinkSink;

impl CommandSink for LinkSink {
    fn send_line(&mut self, line: &str) -> Result<(), SendError> {
        let mut owned = knurl_proto::Line::new();
        owned.push_str(line).map_err(|_| SendError)?;
        LINE_CHANNEL.try_send(owned).map_err(|_| SendError)
    }

    fn send_realtime(&mut self, signal: RealtimeSignal) -> Result<(), SendError> {
        REALTIME_CHANNEL.try_send(signal).map_err(|_| SendError)
    }
}

/// Navigation requests from the scene
///
/// This firmware build ships the jog screen only, so there is no scene
/// stack to act on; requests are logged so a bench trace shows the scene
/// asked for them.
struct SceneNav;

impl Navigator for SceneNav {
    fn activate(&mut self, scene: SceneId) {
        warn!("no scene stack in this build, ignoring activation: {:?}", scene);
    }

    fn pop(&mut self) {
        warn!("no scene stack in this build, ignoring pop");
    }
}

/// Receive events, dispatch them, and reconcile the panel
#[embassy_executor::task]
pub async fn dispatch_task(mut prefs: CachedPrefs, display: Panel) {
    info!("dispatch task started");

    let mut scene = JogScene::default();
    let mut sink = LinkSink;
    let mut nav = SceneNav;
    let mut surface = EgSurface::new(display);

    // The jog screen is active from boot
    run_event(
        &mut scene,
        SceneEvent::Entry,
        &mut sink,
        &mut prefs,
        &mut nav,
        &mut surface,
    );

    loop {
        let event = EVENT_CHANNEL.receive().await;
        run_event(&mut scene, event, &mut sink, &mut prefs, &mut nav, &mut surface);
    }
}

fn run_event(
    scene: &mut JogScene,
    event: SceneEvent,
    sink: &mut LinkSink,
    prefs: &mut CachedPrefs,
    nav: &mut SceneNav,
    surface: &mut EgSurface<Panel>,
) {
    let mut cx = SceneCtx::new(snapshot(), UNITS, sink, prefs, nav);
    dispatch(scene, event, &mut cx);
    if cx.redraw_requested() {
        let view = scene.view(&cx);
        if render(&view, UNITS, surface).is_err() {
            warn!("panel render failed");
        }
    }
}
