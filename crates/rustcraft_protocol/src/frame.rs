//! Packet frame codec (C10): the outer `[length][id][payload]` envelope,
//! with an optional zlib compression layer gated by a threshold.
//!
//! Wire-level framing only depends on the compression threshold; packet-ID
//! dispatch by connection state is a caller concern (`rustcraft_bin`).

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Error, Result};
use crate::io::{Reader, Writer, varint_len};

/// Total frame length (`VarInt totalLen`) is capped at 2^21 - 1 so its own
/// length prefix never exceeds 3 bytes.
pub const MAX_TOTAL_LEN: i32 = 2_097_151;

/// Server-direction vanilla cap on an uncompressed `packetID ∥ body` payload.
pub const MAX_UNCOMPRESSED_PAYLOAD: usize = 1 << 23;

/// A decoded packet: its numeric ID and raw body bytes (`id` already
/// stripped out of `payload`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePacket {
    pub id:      i32,
    pub payload: Vec<u8>,
}

/// Frames and deframes packets, optionally compressing bodies at or above
/// `threshold` bytes. `None` means compression has not yet been enabled for
/// the session (the vanilla pre-`Set Compression` state).
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec {
    threshold: Option<usize>,
}

impl FrameCodec {
    pub fn new(threshold: Option<usize>) -> Self {
        Self { threshold }
    }

    pub fn uncompressed() -> Self {
        Self { threshold: None }
    }

    pub fn threshold(&self) -> Option<usize> {
        self.threshold
    }

    /// Reads one full frame from `r`, which must be positioned at the start
    /// of `totalLen`. Allocates only after validating `totalLen` against
    /// [`MAX_TOTAL_LEN`], never before.
    pub fn read(&self, r: &mut Reader) -> Result<WirePacket> {
        let total_len = r.read_varint()?;
        if !(0..=MAX_TOTAL_LEN).contains(&total_len) {
            return Err(Error::LengthTooLarge(total_len));
        }
        let frame = r.read_bytes(total_len as usize)?;
        self.decode_body(&frame)
    }

    /// Writes one full frame (including its `totalLen` prefix) to `w`.
    pub fn write(&self, w: &mut Writer, packet: &WirePacket) -> Result<()> {
        w.write_bytes(&self.encode_frame(packet)?);
        Ok(())
    }

    /// Reads one full frame directly off a blocking byte stream (e.g. a
    /// `std::net::TcpStream`), where `totalLen` isn't known until its own
    /// VarInt bytes have been read one at a time off the wire.
    pub fn read_from<R: Read>(&self, stream: &mut R) -> Result<WirePacket> {
        let total_len = read_varint_from(stream)?;
        if !(0..=MAX_TOTAL_LEN).contains(&total_len) {
            return Err(Error::LengthTooLarge(total_len));
        }
        let mut frame = vec![0u8; total_len as usize];
        stream.read_exact(&mut frame).map_err(Error::from)?;
        self.decode_body(&frame)
    }

    /// Writes one full frame directly to a blocking byte stream.
    pub fn write_to<W: Write>(&self, stream: &mut W, packet: &WirePacket) -> Result<()> {
        let frame = self.encode_frame(packet)?;
        stream.write_all(&frame).map_err(Error::from)
    }

    /// Decodes `frame`, the `totalLen`-bounded slice that follows the length
    /// prefix, shared by both the in-buffer and stream-oriented readers.
    fn decode_body(&self, frame: &[u8]) -> Result<WirePacket> {
        let mut body = Reader::new(frame);

        match self.threshold {
            None => {
                let id = body.read_varint()?;
                let payload = body.read_to_end();
                Ok(WirePacket { id, payload })
            }
            Some(threshold) => {
                let uncompressed_len = body.read_varint()?;
                if uncompressed_len < 0 {
                    return Err(Error::NegativeLength(uncompressed_len as i64));
                }
                let rest = body.read_to_end();
                let inner = if uncompressed_len == 0 {
                    rest
                } else {
                    let uncompressed_len = uncompressed_len as usize;
                    if uncompressed_len < threshold {
                        return Err(Error::CompressedBelowThreshold {
                            inner:     uncompressed_len,
                            threshold,
                        });
                    }
                    if uncompressed_len > MAX_UNCOMPRESSED_PAYLOAD {
                        return Err(Error::MaxLenExceeded {
                            what: "uncompressed frame payload",
                            max:  MAX_UNCOMPRESSED_PAYLOAD,
                        });
                    }
                    // The declared length is just a claim; bound the actual
                    // inflate independent of it so a lying peer can't
                    // decompression-bomb us past the cap.
                    let mut decoder = ZlibDecoder::new(rest.as_slice()).take(MAX_UNCOMPRESSED_PAYLOAD as u64 + 1);
                    let mut out = Vec::with_capacity(uncompressed_len);
                    decoder.read_to_end(&mut out).map_err(|e| Error::InflateFailed(e.to_string()))?;
                    if out.len() > MAX_UNCOMPRESSED_PAYLOAD {
                        return Err(Error::MaxLenExceeded {
                            what: "uncompressed frame payload",
                            max:  MAX_UNCOMPRESSED_PAYLOAD,
                        });
                    }
                    out
                };
                let mut inner_reader = Reader::new(&inner);
                let id = inner_reader.read_varint()?;
                let payload = inner_reader.read_to_end();
                Ok(WirePacket { id, payload })
            }
        }
    }

    /// Encodes `packet` into the full on-wire frame, `totalLen` prefix
    /// included, shared by both the in-buffer and stream-oriented writers.
    fn encode_frame(&self, packet: &WirePacket) -> Result<Vec<u8>> {
        let mut id_and_body = Writer::new();
        id_and_body.write_varint(packet.id);
        id_and_body.write_bytes(&packet.payload);
        let id_and_body = id_and_body.finish();

        let mut out = Writer::new();
        match self.threshold {
            None => {
                let total_len = id_and_body.len() as i32;
                check_total_len(total_len)?;
                out.write_varint(total_len);
                out.write_bytes(&id_and_body);
            }
            Some(threshold) if id_and_body.len() >= threshold => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&id_and_body).map_err(|e| Error::DeflateFailed(e.to_string()))?;
                let compressed = encoder.finish().map_err(|e| Error::DeflateFailed(e.to_string()))?;

                let uncompressed_len = id_and_body.len() as i32;
                let total_len = varint_len(uncompressed_len) as i32 + compressed.len() as i32;
                check_total_len(total_len)?;
                out.write_varint(total_len);
                out.write_varint(uncompressed_len);
                out.write_bytes(&compressed);
            }
            Some(_) => {
                let total_len = varint_len(0) as i32 + id_and_body.len() as i32;
                check_total_len(total_len)?;
                out.write_varint(total_len);
                out.write_varint(0);
                out.write_bytes(&id_and_body);
            }
        }
        Ok(out.finish())
    }
}

fn check_total_len(total_len: i32) -> Result<()> {
    if total_len > MAX_TOTAL_LEN {
        return Err(Error::LengthTooLarge(total_len));
    }
    Ok(())
}

/// Reads a VarInt one byte at a time off a blocking stream, per the same
/// 7-bit continuation scheme as [`Reader::read_varint`].
fn read_varint_from<R: Read>(stream: &mut R) -> Result<i32> {
    let mut result: i32 = 0;
    for i in 0..5 {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte).map_err(Error::from)?;
        let byte = byte[0];
        result |= ((byte & 0x7F) as i32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(Error::VarIntTooLong(5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_round_trips() {
        let codec = FrameCodec::uncompressed();
        let packet = WirePacket {
            id:      0x00,
            payload: vec![1, 2, 3],
        };
        let mut w = Writer::new();
        codec.write(&mut w, &packet).unwrap();
        let bytes = w.finish();

        let mut r = Reader::new(&bytes);
        assert_eq!(codec.read(&mut r).unwrap(), packet);
    }

    #[test]
    fn below_threshold_uses_zero_sentinel() {
        let codec = FrameCodec::new(Some(256));
        let packet = WirePacket {
            id:      1,
            payload: vec![0xAB; 10],
        };
        let mut w = Writer::new();
        codec.write(&mut w, &packet).unwrap();
        let bytes = w.finish();

        let mut r = Reader::new(&bytes);
        let total_len = r.read_varint().unwrap();
        assert_eq!(total_len as usize, bytes.len() - varint_len(total_len));
        let uncompressed_len = r.read_varint().unwrap();
        assert_eq!(uncompressed_len, 0);

        let mut r = Reader::new(&bytes);
        assert_eq!(codec.read(&mut r).unwrap(), packet);
    }

    #[test]
    fn at_or_above_threshold_compresses() {
        let codec = FrameCodec::new(Some(4));
        let packet = WirePacket {
            id:      2,
            payload: vec![0x11; 512],
        };
        let mut w = Writer::new();
        codec.write(&mut w, &packet).unwrap();
        let bytes = w.finish();

        let mut r = Reader::new(&bytes);
        let _total_len = r.read_varint().unwrap();
        let uncompressed_len = r.read_varint().unwrap();
        assert!(uncompressed_len > 0);

        let mut r = Reader::new(&bytes);
        assert_eq!(codec.read(&mut r).unwrap(), packet);
    }

    #[test]
    fn total_len_above_cap_is_rejected() {
        let codec = FrameCodec::uncompressed();
        let mut w = Writer::new();
        w.write_varint(MAX_TOTAL_LEN + 1);
        let mut r = Reader::new(w.as_slice());
        assert!(matches!(codec.read(&mut r), Err(Error::LengthTooLarge(_))));
    }

    #[test]
    fn compressed_frame_below_threshold_on_wire_is_rejected_on_read() {
        let codec = FrameCodec::new(Some(100));
        let mut body = Writer::new();
        body.write_varint(0);
        body.write_bytes(b"hi");
        let body = body.finish();

        let mut inner = Writer::new();
        inner.write_varint(10); // claims 10 uncompressed bytes, below threshold 100
        inner.write_bytes(&body);
        let inner = inner.finish();

        let mut w = Writer::new();
        w.write_varint(inner.len() as i32);
        w.write_bytes(&inner);

        let mut r = Reader::new(w.as_slice());
        assert!(matches!(
            codec.read(&mut r),
            Err(Error::CompressedBelowThreshold { inner: 10, threshold: 100 })
        ));
    }

    #[test]
    fn compressed_frame_declaring_oversized_uncompressed_len_is_rejected() {
        let codec = FrameCodec::new(Some(100));
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hi").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut inner = Writer::new();
        inner.write_varint(MAX_UNCOMPRESSED_PAYLOAD as i32 + 1); // rejected on the declared length alone, never actually inflated
        inner.write_bytes(&compressed);
        let inner = inner.finish();

        let mut w = Writer::new();
        w.write_varint(inner.len() as i32);
        w.write_bytes(&inner);

        let mut r = Reader::new(w.as_slice());
        assert!(matches!(
            codec.read(&mut r),
            Err(Error::MaxLenExceeded { what: "uncompressed frame payload", max: MAX_UNCOMPRESSED_PAYLOAD })
        ));
    }

    #[test]
    fn compressed_frame_inflating_past_the_cap_is_rejected_even_if_underclaimed() {
        let codec = FrameCodec::new(Some(100));
        // Highly compressible, so the wire bytes stay tiny while the actual
        // inflated size exceeds MAX_UNCOMPRESSED_PAYLOAD regardless of what
        // the frame claims.
        let bomb = vec![0u8; MAX_UNCOMPRESSED_PAYLOAD + 1024];
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bomb).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut inner = Writer::new();
        inner.write_varint(MAX_UNCOMPRESSED_PAYLOAD as i32); // at the cap, passes the declared-length check
        inner.write_bytes(&compressed);
        let inner = inner.finish();

        let mut w = Writer::new();
        w.write_varint(inner.len() as i32);
        w.write_bytes(&inner);

        let mut r = Reader::new(w.as_slice());
        assert!(matches!(
            codec.read(&mut r),
            Err(Error::MaxLenExceeded { what: "uncompressed frame payload", max: MAX_UNCOMPRESSED_PAYLOAD })
        ));
    }

    #[test]
    fn stream_round_trip_matches_buffer_round_trip() {
        let codec = FrameCodec::new(Some(64));
        let packet = WirePacket {
            id:      5,
            payload: vec![0x42; 200],
        };

        let mut wire = Vec::new();
        codec.write_to(&mut wire, &packet).unwrap();

        let mut cursor = std::io::Cursor::new(wire);
        assert_eq!(codec.read_from(&mut cursor).unwrap(), packet);
        assert_eq!(cursor.position() as usize, cursor.get_ref().len());
    }

    #[test]
    fn read_from_stops_short_mid_frame_is_an_error() {
        let codec = FrameCodec::uncompressed();
        let packet = WirePacket {
            id:      1,
            payload: vec![9, 9, 9],
        };
        let mut wire = Vec::new();
        codec.write_to(&mut wire, &packet).unwrap();
        wire.truncate(wire.len() - 1);

        let mut cursor = std::io::Cursor::new(wire);
        assert!(codec.read_from(&mut cursor).is_err());
    }

    #[test]
    fn read_from_consecutive_frames_share_one_stream() {
        let codec = FrameCodec::uncompressed();
        let a = WirePacket { id: 0, payload: vec![1] };
        let b = WirePacket { id: 1, payload: vec![2, 3] };

        let mut wire = Vec::new();
        codec.write_to(&mut wire, &a).unwrap();
        codec.write_to(&mut wire, &b).unwrap();

        let mut cursor = std::io::Cursor::new(wire);
        assert_eq!(codec.read_from(&mut cursor).unwrap(), a);
        assert_eq!(codec.read_from(&mut cursor).unwrap(), b);
    }
}
