//! The boundary between the session core and the wire.
//!
//! [`Transport`] is an external collaborator: the core only ever calls `connect`, `disconnect`,
//! and `send`, and only ever receives frames through the callbacks it hands to `connect`. The
//! byte-level codec and the TCP I/O live entirely on the other side of this trait.

use crate::protocol::{
    command, ActiveTest, ActiveTestResp, Connect, ConnectResp, Deliver, DeliverContent,
    DeliverResp, FrameHeader, Message, Submit, SubmitResp, Terminate,
};
use std::io::{self, BufReader, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

/// An inbound-frame callback, invoked once per frame from the transport's own execution
/// context. The `u32` is the frame header's `Sequence_Id`: the dispatcher needs it to match
/// `SUBMIT_RESP` against the window registry and to echo it back on `DELIVER_RESP` /
/// `ACTIVE_TEST_RESP`.
pub type ReceiveCallback = Box<dyn Fn(u32, Message) + Send + Sync>;

/// A disconnection callback, invoked at most once per `connect` when the link drops for any
/// reason other than an explicit [`Transport::disconnect`] call.
pub type DisconnectCallback = Box<dyn Fn() + Send + Sync>;

/// The transport's contract with the session core.
///
/// Two execution contexts call into a `Transport` concurrently: the session thread, which is
/// the only caller of `send` for `SUBMIT` frames, and the transport's own inbound context, which
/// calls `send` for immediate replies while dispatching a received frame. Implementations must
/// serialize concurrent `send` calls internally; the core does not.
pub trait Transport: Send + Sync {
    /// Opens the underlying connection and arms the given callbacks for its lifetime.
    ///
    /// `on_receive` is invoked once per inbound frame, in the order frames arrive. `on_disconnect`
    /// is invoked at most once, when the connection is lost other than through a matching
    /// [`Transport::disconnect`] call.
    fn connect(&self, on_receive: ReceiveCallback, on_disconnect: DisconnectCallback) -> io::Result<()>;

    /// Closes the connection. Idempotent; does not itself invoke `on_disconnect`.
    fn disconnect(&self);

    /// Writes one frame using `sequence_id` as its header's `Sequence_Id`.
    fn send(&self, sequence_id: u32, message: &Message) -> io::Result<()>;
}

/// A minimal CMPP-over-TCP [`Transport`], provided for convenience.
///
/// This is a reference implementation, not a hardened production codec: field widths follow
/// the commonly documented CMPP 3.0 layout, but the session core never depends on any detail of
/// it beyond the [`Transport`] trait.
pub struct TcpTransport {
    addr: String,
    writer: Mutex<Option<TcpStream>>,
    reader_thread: Mutex<Option<JoinHandle<()>>>,
}

impl TcpTransport {
    pub fn new<A: Into<String>>(addr: A) -> Self {
        Self {
            addr: addr.into(),
            writer: Mutex::new(None),
            reader_thread: Mutex::new(None),
        }
    }
}

impl Transport for TcpTransport {
    fn connect(&self, on_receive: ReceiveCallback, on_disconnect: DisconnectCallback) -> io::Result<()> {
        let stream = TcpStream::connect(&self.addr)?;
        let read_half = stream.try_clone()?;
        *self.writer.lock().unwrap_or_else(|e| e.into_inner()) = Some(stream);

        let handle = thread::spawn(move || {
            let mut reader = BufReader::new(read_half);
            loop {
                match codec::read_frame(&mut reader) {
                    Ok(Some((sequence_id, message))) => on_receive(sequence_id, message),
                    Ok(None) => break,
                    Err(err) => {
                        warn!("transport read failed: {err}");
                        break;
                    }
                }
            }
            on_disconnect();
        });
        *self.reader_thread.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        Ok(())
    }

    fn disconnect(&self) {
        if let Some(stream) = self
            .writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn send(&self, sequence_id: u32, message: &Message) -> io::Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let stream = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "transport not connected"))?;
        codec::write_frame(stream, sequence_id, message)
    }
}

/// The byte-level frame codec backing [`TcpTransport`]. Private: the core never sees these
/// functions, only the [`Message`] values they produce and consume.
mod codec {
    use super::*;
    use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

    fn write_fixed(w: &mut impl Write, value: &str, width: usize) -> io::Result<()> {
        let bytes = value.as_bytes();
        let mut buf = vec![0u8; width];
        let n = bytes.len().min(width);
        buf[..n].copy_from_slice(&bytes[..n]);
        w.write_all(&buf)
    }

    fn read_fixed(r: &mut impl Read, width: usize) -> io::Result<String> {
        let mut buf = vec![0u8; width];
        r.read_exact(&mut buf)?;
        let end = buf.iter().position(|&b| b == 0).unwrap_or(width);
        Ok(String::from_utf8_lossy(&buf[..end]).into_owned())
    }

    pub fn write_frame(w: &mut impl Write, sequence_id: u32, message: &Message) -> io::Result<()> {
        let mut body = Vec::new();
        write_body(&mut body, message)?;
        let header = FrameHeader {
            total_length: FrameHeader::LEN + body.len() as u32,
            command_id: message.command_id(),
            sequence_id,
        };
        header.write_to(w)?;
        w.write_all(&body)
    }

    fn write_body(w: &mut Vec<u8>, message: &Message) -> io::Result<()> {
        match message {
            Message::Connect(m) => {
                write_fixed(w, &m.source_addr, 6)?;
                w.write_all(&m.authenticator_source)?;
                w.write_u8(m.version)?;
                w.write_u32::<BigEndian>(m.timestamp)?;
            }
            Message::ConnectResp(m) => {
                w.write_u8(m.status)?;
                w.write_all(&m.authenticator_isp)?;
                w.write_u8(m.version)?;
            }
            Message::Submit(m) => {
                w.write_all(&[0u8; 8])?; // MsgId: unset on submission.
                w.write_u8(m.pk_total)?;
                w.write_u8(m.pk_number)?;
                w.write_u8(m.registered_delivery)?;
                w.write_u8(0)?; // MsgLevel.
                write_fixed(w, &m.service_id, 10)?;
                w.write_u8(3)?; // FeeUserType: SP.
                write_fixed(w, &m.fee_terminal_id, 21)?;
                w.write_u8(0)?; // FeeTerminalType.
                w.write_u8(m.tp_pid)?;
                w.write_u8(m.tp_udhi)?;
                w.write_u8(m.msg_fmt)?;
                write_fixed(w, &m.msg_src, 6)?;
                write_fixed(w, &m.fee_type, 2)?;
                write_fixed(w, &m.fee_code, 6)?;
                write_fixed(w, "", 17)?; // ValidTime.
                write_fixed(w, "", 17)?; // AtTime.
                write_fixed(w, &m.src_id, 21)?;
                w.write_u8(m.dest_terminal_id.len() as u8)?;
                for dest in &m.dest_terminal_id {
                    write_fixed(w, dest, 21)?;
                }
                w.write_u8(0)?; // DestTerminalType.
                w.write_u8(m.msg_content.len() as u8)?;
                w.write_all(&m.msg_content)?;
                write_fixed(w, "", 20)?; // LinkID.
            }
            Message::SubmitResp(m) => {
                w.write_all(&m.msg_id)?;
                w.write_u32::<BigEndian>(m.result)?;
            }
            Message::Deliver(_) => unreachable!("the core never originates a DELIVER"),
            Message::DeliverResp(m) => {
                w.write_all(&m.msg_id)?;
                w.write_u32::<BigEndian>(m.result)?;
            }
            Message::ActiveTest(_) | Message::ActiveTestResp(_) | Message::Terminate(_) => {}
        }
        Ok(())
    }

    pub fn read_frame(r: &mut impl Read) -> io::Result<Option<(u32, Message)>> {
        let header = match FrameHeader::read_from(r) {
            Ok(h) => h,
            Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let body_len = header.total_length.saturating_sub(FrameHeader::LEN) as usize;
        let mut body = vec![0u8; body_len];
        r.read_exact(&mut body)?;
        let mut cursor = &body[..];
        let message = match header.command_id {
            command::CONNECT_RESP => Message::ConnectResp(ConnectResp {
                status: cursor.read_u8()?,
                authenticator_isp: {
                    let mut buf = [0u8; 16];
                    cursor.read_exact(&mut buf)?;
                    buf
                },
                version: cursor.read_u8()?,
            }),
            command::SUBMIT_RESP => Message::SubmitResp(SubmitResp {
                msg_id: {
                    let mut buf = [0u8; 8];
                    cursor.read_exact(&mut buf)?;
                    buf
                },
                result: cursor.read_u32::<BigEndian>()?,
            }),
            command::DELIVER => {
                let mut msg_id = [0u8; 8];
                cursor.read_exact(&mut msg_id)?;
                let dest_id = read_fixed(&mut cursor, 21)?;
                let _service_id = read_fixed(&mut cursor, 10)?;
                let _tp_pid = cursor.read_u8()?;
                let tp_udhi = cursor.read_u8()?;
                let _msg_fmt = cursor.read_u8()?;
                let src_terminal_id = read_fixed(&mut cursor, 21)?;
                let registered_delivery = cursor.read_u8()?;
                let msg_length = cursor.read_u8()? as usize;
                let mut payload = vec![0u8; msg_length];
                cursor.read_exact(&mut payload)?;

                let content = if registered_delivery == 0 {
                    DeliverContent::Message {
                        content: decode_ucs2(&payload, tp_udhi != 0),
                    }
                } else {
                    DeliverContent::Report {
                        message_id: SubmitResp {
                            msg_id,
                            result: 0,
                        }
                        .message_id(),
                        status_text: String::from_utf8_lossy(&payload).into_owned(),
                    }
                };

                Message::Deliver(Deliver {
                    msg_id,
                    dest_id,
                    src_terminal_id,
                    content,
                })
            }
            command::ACTIVE_TEST => Message::ActiveTest(ActiveTest),
            command::ACTIVE_TEST_RESP => Message::ActiveTestResp(ActiveTestResp),
            command::TERMINATE => Message::Terminate(Terminate),
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unrecognized command id {other:#010x}"),
                ))
            }
        };
        Ok(Some((header.sequence_id, message)))
    }

    fn decode_ucs2(bytes: &[u8], has_udh: bool) -> String {
        let payload = if has_udh && bytes.len() > 6 {
            &bytes[6..]
        } else {
            bytes
        };
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    }
}
