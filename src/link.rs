//! Fire-and-forget command transport to the actuator.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use thiserror::Error;
use tracing::debug;

use crate::protocol::Command;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to open command socket: {0}")]
    Bind(#[source] io::Error),
    #[error("cannot resolve actuator address {host}:{port}")]
    Resolve { host: String, port: u16 },
    #[error("send of {command:?} failed: {source}")]
    Send {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Sink for outgoing commands.
///
/// Delivery is best effort: no acknowledgement, no retry. Ordering is
/// whatever order the caller sends in.
pub trait CommandLink {
    fn send(&mut self, command: &Command) -> Result<(), LinkError>;
}

impl<L: CommandLink + ?Sized> CommandLink for Box<L> {
    fn send(&mut self, command: &Command) -> Result<(), LinkError> {
        (**self).send(command)
    }
}

/// One datagram per command over UDP.
#[derive(Debug)]
pub struct UdpCommandLink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpCommandLink {
    /// Bind an ephemeral local socket aimed at `host:port`.
    ///
    /// The socket is non-blocking, so a full send buffer surfaces as an
    /// error instead of stalling the frame loop.
    pub fn connect(host: &str, port: u16) -> Result<Self, LinkError> {
        let target = (host, port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| LinkError::Resolve {
                host: host.to_string(),
                port,
            })?;

        let local = if target.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(local).map_err(LinkError::Bind)?;
        socket.set_nonblocking(true).map_err(LinkError::Bind)?;

        debug!(%target, "command link ready");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl CommandLink for UdpCommandLink {
    fn send(&mut self, command: &Command) -> Result<(), LinkError> {
        self.socket
            .send_to(&command.to_bytes(), self.target)
            .map_err(|source| LinkError::Send {
                command: command.to_string(),
                source,
            })?;
        debug!(%command, "sent");
        Ok(())
    }
}

/// Records commands in memory instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct MemoryLink {
    sent: Vec<Command>,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.sent)
    }
}

impl CommandLink for MemoryLink {
    fn send(&mut self, command: &Command) -> Result<(), LinkError> {
        self.sent.push(*command);
        Ok(())
    }
}
