//! Lifecycle of a locally spawned `chromedriver`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::error::{Result, RuntimeError};
use crate::process::{free_port, port_accepting};

const STARTUP_POLL: Duration = Duration::from_millis(50);

/// A driver child process listening on a localhost port.
///
/// The child is killed when this value is dropped, so a panic or early
/// return never leaves a stray driver (and its browser) behind.
#[derive(Debug)]
pub struct DriverProcess {
	child: Child,
	port: u16,
	binary: PathBuf,
}

impl DriverProcess {
	/// Spawns `binary` (a path or a name looked up on `PATH`) on a free port
	/// and waits up to `startup_timeout` for it to accept connections.
	pub async fn spawn(binary: &Path, startup_timeout: Duration) -> Result<Self> {
		let binary = which::which(binary).map_err(|e| RuntimeError::Launch(format!("{}: {e}", binary.display())))?;
		let port = free_port()?;

		debug!(target = "slotbook.driver", binary = %binary.display(), port, "spawning driver");
		let mut child = Command::new(&binary)
			.arg(format!("--port={port}"))
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| RuntimeError::Launch(format!("{}: {e}", binary.display())))?;

		let started = Instant::now();
		loop {
			if port_accepting(port) {
				break;
			}
			if let Some(status) = child.try_wait()? {
				return Err(RuntimeError::Launch(format!("{} exited during startup ({status})", binary.display())));
			}
			if started.elapsed() >= startup_timeout {
				return Err(RuntimeError::Launch(format!(
					"{} did not listen on port {port} within {startup_timeout:?}",
					binary.display()
				)));
			}
			tokio::time::sleep(STARTUP_POLL).await;
		}

		info!(target = "slotbook.driver", port, "driver ready");
		Ok(Self { child, port, binary })
	}

	/// Endpoint URL to hand to [`crate::WebDriverClient::new`].
	pub fn endpoint(&self) -> String {
		format!("http://127.0.0.1:{}", self.port)
	}

	/// Stops the driver and reaps the child.
	pub async fn shutdown(mut self) -> Result<()> {
		if self.child.try_wait()?.is_none() {
			self.child.kill().await?;
		}
		debug!(target = "slotbook.driver", binary = %self.binary.display(), port = self.port, "driver stopped");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn missing_binary_is_a_launch_error() {
		let err = DriverProcess::spawn(Path::new("slotbook-no-such-driver"), Duration::from_millis(10))
			.await
			.unwrap_err();
		assert!(matches!(err, RuntimeError::Launch(_)));
	}
}
