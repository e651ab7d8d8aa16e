//! Status report parsing
//!
//! The controller pushes lines like
//! `<Idle|MPos:10.000,2.500,0.000|FS:0,0|WCO:0.000,0.000,0.000>` and
//! `ALARM:14`. The parser extracts what the pendant actually branches on:
//! the state word, the work position, and the last alarm code. `WCO` is
//! only present intermittently, so the parser retains the last value seen.

use crate::command::Axis;
use crate::decimal::E4;
use crate::state::MachineState;

/// One parsed status report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub state: MachineState,
    /// Machine position, one entry per axis
    pub mpos: [E4; Axis::COUNT],
}

/// Something the parser recognized on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    Status(StatusReport),
    Alarm(u8),
}

/// Stateful line parser for controller output
///
/// Lines that are not status reports or alarms (`ok`, `error:n`,
/// `[MSG:...]`, G-code echo) are ignored.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportParser {
    wco: [E4; Axis::COUNT],
    last_status: Option<StatusReport>,
}

impl ReportParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line of controller output
    pub fn parse_line(&mut self, line: &str) -> Option<Report> {
        let line = line.trim();
        if let Some(code) = line.strip_prefix("ALARM:") {
            return code.parse::<u8>().ok().map(Report::Alarm);
        }
        let body = line.strip_prefix('<')?.strip_suffix('>')?;
        let mut fields = body.split('|');
        let state = MachineState::from_name(fields.next()?)?;

        let mut mpos: Option<[E4; Axis::COUNT]> = None;
        let mut wpos: Option<[E4; Axis::COUNT]> = None;
        for field in fields {
            if let Some(coords) = field.strip_prefix("MPos:") {
                mpos = parse_coords(coords);
            } else if let Some(coords) = field.strip_prefix("WPos:") {
                wpos = parse_coords(coords);
            } else if let Some(coords) = field.strip_prefix("WCO:") {
                if let Some(wco) = parse_coords(coords) {
                    self.wco = wco;
                }
            }
        }

        // Reports carry either MPos or WPos depending on controller
        // configuration; normalize to machine position via the last WCO.
        let mpos = match (mpos, wpos) {
            (Some(m), _) => m,
            (None, Some(w)) => {
                let mut m = [E4::ZERO; Axis::COUNT];
                for i in 0..Axis::COUNT {
                    m[i] = E4::from_raw(w[i].raw().saturating_add(self.wco[i].raw()));
                }
                m
            }
            (None, None) => match self.last_status {
                Some(prev) => prev.mpos,
                None => [E4::ZERO; Axis::COUNT],
            },
        };

        let status = StatusReport { state, mpos };
        self.last_status = Some(status);
        Some(Report::Status(status))
    }

    /// Work position of one axis from the most recent report
    pub fn wpos(&self, axis: Axis) -> E4 {
        let mpos = match self.last_status {
            Some(status) => status.mpos[axis.index()],
            None => E4::ZERO,
        };
        E4::from_raw(mpos.raw().saturating_sub(self.wco[axis.index()].raw()))
    }
}

fn parse_coords(text: &str) -> Option<[E4; Axis::COUNT]> {
    let mut out = [E4::ZERO; Axis::COUNT];
    let mut parts = text.split(',');
    for slot in &mut out {
        *slot = E4::parse(parts.next()?)?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_with_mpos() {
        let mut parser = ReportParser::new();
        let report = parser
            .parse_line("<Idle|MPos:10.000,2.500,-1.000|FS:0,0>")
            .unwrap();
        match report {
            Report::Status(status) => {
                assert_eq!(status.state, MachineState::Idle);
                assert_eq!(status.mpos[0], E4::from_int(10));
                assert_eq!(status.mpos[1], E4::from_raw(25_000));
                assert_eq!(status.mpos[2], E4::from_int(-1));
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_wco_retained_across_reports() {
        let mut parser = ReportParser::new();
        parser
            .parse_line("<Idle|MPos:10.000,0.000,0.000|WCO:2.000,0.000,0.000>")
            .unwrap();
        assert_eq!(parser.wpos(Axis::X), E4::from_int(8));

        // Next report omits WCO; the offset must persist
        parser.parse_line("<Jog|MPos:11.000,0.000,0.000>").unwrap();
        assert_eq!(parser.wpos(Axis::X), E4::from_int(9));
    }

    #[test]
    fn test_wpos_report_normalized() {
        let mut parser = ReportParser::new();
        parser
            .parse_line("<Idle|MPos:0.000,0.000,0.000|WCO:5.000,0.000,0.000>")
            .unwrap();
        let report = parser.parse_line("<Run|WPos:1.000,2.000,3.000>").unwrap();
        match report {
            Report::Status(status) => assert_eq!(status.mpos[0], E4::from_int(6)),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn test_alarm_line() {
        let mut parser = ReportParser::new();
        assert_eq!(parser.parse_line("ALARM:14"), Some(Report::Alarm(14)));
        assert_eq!(parser.parse_line("ALARM:xyz"), None);
    }

    #[test]
    fn test_noise_ignored() {
        let mut parser = ReportParser::new();
        assert_eq!(parser.parse_line("ok"), None);
        assert_eq!(parser.parse_line("error:20"), None);
        assert_eq!(parser.parse_line("[MSG:INFO: Connected]"), None);
        assert_eq!(parser.parse_line("<Garbage|MPos:0,0,0>"), None);
        assert_eq!(parser.parse_line(""), None);
    }

    #[test]
    fn test_hold_and_door_states() {
        let mut parser = ReportParser::new();
        match parser.parse_line("<Hold:0|MPos:0,0,0>").unwrap() {
            Report::Status(s) => assert_eq!(s.state, MachineState::Hold),
            other => panic!("unexpected report {:?}", other),
        }
        match parser.parse_line("<Door:1|MPos:0,0,0>").unwrap() {
            Report::Status(s) => assert_eq!(s.state, MachineState::DoorOpen),
            other => panic!("unexpected report {:?}", other),
        }
    }
}
