use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// The 12-byte header that prefixes every CMPP frame: `{totalLength, commandId, sequenceId}`,
/// all big-endian `u32`s.
///
/// Unlike the HANA wire protocol this crate's dependency stack was originally written against,
/// CMPP is big-endian on the wire throughout.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FrameHeader {
    pub total_length: u32,
    pub command_id: u32,
    pub sequence_id: u32,
}

impl FrameHeader {
    pub const LEN: u32 = 12;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<BigEndian>(self.total_length)?;
        w.write_u32::<BigEndian>(self.command_id)?;
        w.write_u32::<BigEndian>(self.sequence_id)?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            total_length: r.read_u32::<BigEndian>()?,
            command_id: r.read_u32::<BigEndian>()?,
            sequence_id: r.read_u32::<BigEndian>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_buffer() {
        let header = FrameHeader {
            total_length: 139,
            command_id: super::super::command::SUBMIT,
            sequence_id: 42,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), FrameHeader::LEN as usize);
        let read_back = FrameHeader::read_from(&mut &buf[..]).unwrap();
        assert_eq!(header, read_back);
    }
}
