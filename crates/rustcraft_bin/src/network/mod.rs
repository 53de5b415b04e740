mod handshake;
mod login;

pub use handshake::{Handshake, NextState};
pub use login::{
    LoginStart,
    PACKET_ID_LOGIN_ACKNOWLEDGED,
    PACKET_ID_LOGIN_START,
    PACKET_ID_LOGIN_SUCCESS,
    PACKET_ID_SET_COMPRESSION,
    demo_server_hash,
    login_success_packet,
    set_compression_packet,
};
