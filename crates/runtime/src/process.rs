//! Port helpers for the locally spawned driver.

use std::net::{Ipv4Addr, TcpListener, TcpStream};

/// Asks the OS for a currently unused localhost port.
pub fn free_port() -> std::io::Result<u16> {
	let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
	Ok(listener.local_addr()?.port())
}

/// Returns `true` once something accepts TCP connections on `port`.
pub fn port_accepting(port: u16) -> bool {
	TcpStream::connect((Ipv4Addr::LOCALHOST, port)).is_ok()
}
