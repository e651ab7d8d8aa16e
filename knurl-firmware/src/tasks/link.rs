//! Controller UART link
//!
//! Three tasks share the link to the FluidNC controller:
//!
//! - `link_rx_task` assembles lines, runs the report parser, refreshes
//!   the shared snapshot, and queues `StateChange` events
//! - `link_tx_task` multiplexes the line and realtime channels onto the
//!   wire, always draining realtime bytes first
//! - `status_poll_task` requests a status report every 200 ms

use defmt::{debug, info, trace, warn};
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};

use knurl_core::{MachineSnapshot, SceneEvent};
use knurl_proto::{Axis, MachineState, RealtimeSignal, Report, ReportParser};

use crate::channels::{set_snapshot, snapshot, EVENT_CHANNEL, LINE_CHANNEL, REALTIME_CHANNEL};

/// UART read chunk size
const RX_CHUNK: usize = 64;

/// Longest controller line worth keeping
const MAX_REPORT_LINE: usize = 128;

/// Status poll interval
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Receive controller output and maintain the machine snapshot
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("link rx task started");

    let mut parser = ReportParser::new();
    let mut chunk = [0u8; RX_CHUNK];
    let mut line: heapless::Vec<u8, MAX_REPORT_LINE> = heapless::Vec::new();

    loop {
        match rx.read(&mut chunk).await {
            Ok(n) if n > 0 => {
                for &byte in &chunk[..n] {
                    match byte {
                        b'\n' | b'\r' => {
                            if !line.is_empty() {
                                if let Ok(text) = core::str::from_utf8(&line) {
                                    handle_line(&mut parser, text);
                                }
                                line.clear();
                            }
                        }
                        _ => {
                            // Oversized lines are dropped wholesale
                            if line.push(byte).is_err() {
                                warn!("controller line too long, dropping");
                                line.clear();
                            }
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => warn!("uart read error: {:?}", e),
        }
    }
}

fn handle_line(parser: &mut ReportParser, text: &str) {
    let previous = snapshot();
    match parser.parse_line(text) {
        Some(Report::Status(status)) => {
            let mut wpos = previous.wpos;
            for axis in Axis::ALL {
                wpos[axis.index()] = parser.wpos(axis);
            }
            set_snapshot(MachineSnapshot {
                state: status.state,
                last_alarm: previous.last_alarm,
                wpos,
            });
            if status.state != previous.state {
                debug!("state {:?} -> {:?}", previous.state, status.state);
                queue_event(SceneEvent::StateChange {
                    old: previous.state,
                });
            }
        }
        Some(Report::Alarm(code)) => {
            set_snapshot(MachineSnapshot {
                state: MachineState::Alarm,
                last_alarm: Some(code),
                wpos: previous.wpos,
            });
            if previous.state != MachineState::Alarm {
                queue_event(SceneEvent::StateChange {
                    old: previous.state,
                });
            }
        }
        None => trace!("ignored controller line"),
    }
}

fn queue_event(event: SceneEvent) {
    if EVENT_CHANNEL.try_send(event).is_err() {
        warn!("event channel full, dropping {:?}", event);
    }
}

/// Transmit queued lines and realtime bytes
///
/// Realtime bytes preempt queued lines: each loop iteration drains the
/// realtime channel before touching the line channel, and a realtime
/// byte arriving while a line waits is sent first.
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("link tx task started");

    loop {
        while let Ok(signal) = REALTIME_CHANNEL.try_receive() {
            send_realtime(&mut tx, signal).await;
        }
        match select(REALTIME_CHANNEL.receive(), LINE_CHANNEL.receive()).await {
            Either::First(signal) => send_realtime(&mut tx, signal).await,
            Either::Second(line) => {
                trace!("tx line: {}", line.as_str());
                if tx.write_all(line.as_bytes()).await.is_err()
                    || tx.write_all(b"\n").await.is_err()
                {
                    warn!("uart write error");
                }
            }
        }
    }
}

async fn send_realtime(tx: &mut BufferedUartTx, signal: RealtimeSignal) {
    if tx.write_all(&[signal.to_byte()]).await.is_err() {
        warn!("uart write error");
    }
}

/// Ask the controller for a status report at a fixed cadence
#[embassy_executor::task]
pub async fn status_poll_task() {
    info!("status poll task started");
    loop {
        Timer::after(POLL_INTERVAL).await;
        // Dropped polls are harmless; the next tick asks again
        let _ = REALTIME_CHANNEL.try_send(RealtimeSignal::StatusReport);
    }
}
