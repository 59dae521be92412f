use slotbook::{BookingOrchestrator, PageReservation};
use tracing::info;

use super::prepare;
use crate::cli::BookArgs;
use crate::config::BookingConfig;
use crate::error::{Result, outcome_exit_code};
use crate::session::{open_page, run_guarded};

pub async fn run(args: BookArgs) -> Result<u8> {
	let config = BookingConfig::from_args(&args)?;
	let target = &config.target;
	info!(
		target = "slotbook",
		hour = target.hour(),
		minute = target.minute(),
		second_buffer = target.second_buffer(),
		date_offset = target.date_offset(),
		category = target.category(),
		slot = target.slot(),
		"booking"
	);

	let page = open_page(&config.session.launch).await?;
	let outcome = run_guarded(&page, async {
		prepare(&page, &config.session).await?;
		let attempt = PageReservation::new(&page, &config.target, &config.session.markup.reservation);
		let orchestrator = BookingOrchestrator::new(config.clock, config.target.clone()).with_policy(config.policy);
		Ok(orchestrator.run(&attempt).await)
	})
	.await?;

	info!(target = "slotbook", attempts = outcome.attempts(), succeeded = outcome.succeeded(), "booking finished");
	println!("{outcome}");
	Ok(outcome_exit_code(&outcome))
}
