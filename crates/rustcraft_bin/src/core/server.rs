use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

use anyhow::{Result, bail};
use rustcraft_protocol::frame::{FrameCodec, WirePacket};
use rustcraft_protocol::io::Reader;
use rustcraft_protocol::profile::GameProfile;
use rustcraft_protocol::text::TextComponent;
use rustcraft_protocol::text::nbt_codec;
use tracing::{error, info, warn};

use crate::consts::{COMPRESSION_THRESHOLD, NETWORK_VALID_PROTOCOL_VERSION};
use crate::player::{ConnectionStage, ConnectionStateTracker};
use crate::network::{
    Handshake,
    LoginStart,
    NextState,
    PACKET_ID_LOGIN_ACKNOWLEDGED,
    PACKET_ID_LOGIN_START,
    PACKET_ID_LOGIN_SUCCESS,
    PACKET_ID_SET_COMPRESSION,
    demo_server_hash,
    login_success_packet,
    set_compression_packet,
};

/// A thin blocking TCP server: one thread per connection, no game-loop or
/// world state. It exists to drive `rustcraft_protocol` end to end, not to
/// play the game.
pub struct MinecraftServer {
    listener: TcpListener,
}

impl MinecraftServer {
    pub fn new(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        info!("[STARTUP] Server listening on {}", addr);
        Ok(Self { listener })
    }

    pub fn run(self) -> Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer = stream.peer_addr().ok();
                    info!("[CONNECTION] New connection from {:?}", peer);
                    thread::spawn(move || {
                        if let Err(e) = handle_client(stream) {
                            error!("[CLIENT] Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("[NETWORK] Accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

fn handle_client(mut stream: TcpStream) -> Result<()> {
    let state = ConnectionStateTracker::new();
    let mut codec = FrameCodec::uncompressed();

    let handshake_frame = codec.read_from(&mut stream)?;
    let mut r = Reader::new(&handshake_frame.payload);
    let handshake = Handshake::decode(&mut r)?;
    state.transition(ConnectionStage::Handshaking);

    if handshake.protocol_version != NETWORK_VALID_PROTOCOL_VERSION {
        warn!(
            "[HANDSHAKE] client offered protocol {} (server speaks {})",
            handshake.protocol_version, NETWORK_VALID_PROTOCOL_VERSION
        );
    }

    if handshake.next_state != NextState::Login {
        info!("[HANDSHAKE] next_state {:?} is out of scope for this demo, closing", handshake.next_state);
        state.transition(ConnectionStage::Disconnected);
        return Ok(());
    }
    state.transition(ConnectionStage::Authenticating);

    let login_frame = codec.read_from(&mut stream)?;
    if login_frame.id != PACKET_ID_LOGIN_START {
        bail!("expected Login Start (0x{:02x}), got 0x{:02x}", PACKET_ID_LOGIN_START, login_frame.id);
    }
    let mut r = Reader::new(&login_frame.payload);
    let login_start = LoginStart::decode(&mut r)?;

    let _session_hash = demo_server_hash(&handshake.server_address, &login_start);

    codec.write_to(
        &mut stream,
        &WirePacket {
            id:      PACKET_ID_SET_COMPRESSION,
            payload: set_compression_packet(COMPRESSION_THRESHOLD as i32),
        },
    )?;
    codec = FrameCodec::new(Some(COMPRESSION_THRESHOLD));

    let profile = GameProfile::offline(&login_start.name);
    codec.write_to(
        &mut stream,
        &WirePacket {
            id:      PACKET_ID_LOGIN_SUCCESS,
            payload: login_success_packet(&profile),
        },
    )?;

    let ack_frame = codec.read_from(&mut stream)?;
    if ack_frame.id != PACKET_ID_LOGIN_ACKNOWLEDGED {
        bail!(
            "expected Login Acknowledged (0x{:02x}), got 0x{:02x}",
            PACKET_ID_LOGIN_ACKNOWLEDGED,
            ack_frame.id
        );
    }
    state.transition(ConnectionStage::InGame);
    info!("[LOGIN] {} ({}) logged in after {}ms", profile.username, profile.uuid.0, state.connection_duration_ms());

    // Illustrative only: no Play-state packet catalog backs this ID, it just
    // carries the NBT-encoded text component off the wire.
    let greeting = TextComponent::text(format!("Welcome, {}!", profile.username)).with_color("gold");
    codec.write_to(
        &mut stream,
        &WirePacket {
            id:      0x6C,
            payload: nbt_codec::encode(&greeting)?,
        },
    )?;
    info!("[DEMO] sent illustrative NBT text-component packet to {}", profile.username);

    state.transition(ConnectionStage::Disconnecting);
    Ok(())
}
