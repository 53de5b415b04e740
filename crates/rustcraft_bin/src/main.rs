mod consts;
mod core;
mod network;
mod player;

use anyhow::Result;

use crate::consts::SERVER_ADDR;
use crate::core::MinecraftServer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(true)
        .with_max_level(tracing::Level::DEBUG)
        .compact()
        .init();

    let server = MinecraftServer::new(SERVER_ADDR)?;
    server.run()
}
