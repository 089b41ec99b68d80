//! The CMPP 3.0 frame header and typed message records that cross the [`crate::Transport`]
//! boundary.

pub mod command;
mod header;
mod message;

pub use header::FrameHeader;
pub use message::{
    ActiveTest, ActiveTestResp, Connect, ConnectResp, Deliver, DeliverContent, DeliverResp,
    Message, Submit, SubmitResp, Terminate,
};

/// Recognized `SUBMIT_RESP.Result` codes.
pub mod result {
    pub const OK: u32 = 0;
    pub const MESSAGE_TOO_LONG: u32 = 4;
    pub const CONGESTED: u32 = 8;
    pub const CONFIG_ERROR_LOW: u32 = 10;
    pub const CONFIG_ERROR_HIGH: u32 = 13;
}
