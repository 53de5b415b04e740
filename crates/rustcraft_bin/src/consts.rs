use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const SERVER_ADDR_LIT: [u8; 4] = [127, 0, 0, 1];
const SERVER_PORT: u16 = 25565;

pub const SERVER_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(SERVER_ADDR_LIT[0], SERVER_ADDR_LIT[1], SERVER_ADDR_LIT[2], SERVER_ADDR_LIT[3])), SERVER_PORT);

pub const NETWORK_VALID_PROTOCOL_VERSION: i32 = 772; // Minecraft 1.21.7

/// Below this many bytes of `packetID ∥ body`, the demo sends frames
/// uncompressed rather than paying the zlib overhead.
pub const COMPRESSION_THRESHOLD: usize = 256;
