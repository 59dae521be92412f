use tracing_subscriber::EnvFilter;

/// Installs the stdout subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.try_init();
}

fn default_directives(verbose: u8) -> String {
	let level = match verbose {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	format!("warn,slotbook={level},slotbook_cli={level},slotbook_runtime={level}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_raises_workspace_crates_only() {
		assert_eq!(default_directives(0), "warn,slotbook=info,slotbook_cli=info,slotbook_runtime=info");
		assert!(default_directives(1).contains("slotbook_runtime=debug"));
		assert!(default_directives(5).starts_with("warn,slotbook=trace"));
	}
}
