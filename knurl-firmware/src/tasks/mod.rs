//! Embassy async tasks
//!
//! Each task runs independently and communicates via the channels module.

pub mod dispatch;
pub mod input;
pub mod link;

pub use dispatch::{dispatch_task, Panel};
pub use input::{button_task, encoder_task, touch_task};
pub use link::{link_rx_task, link_tx_task, status_poll_task};
