use slotbook::{BookingOutcome, StepError, TargetError};
use slotbook_runtime::RuntimeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("environment misconfigured: {0}")]
	EnvironmentMisconfigured(String),

	#[error("browser driver initialization failed: {0}")]
	DriverInitializationFailed(#[source] RuntimeError),

	#[error("{step} failed: {source}")]
	Step {
		step: &'static str,
		#[source]
		source: StepError,
	},

	#[error("interrupted")]
	Interrupted,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	pub fn exit_code(&self) -> u8 {
		match self {
			Self::EnvironmentMisconfigured(_) => 2,
			Self::DriverInitializationFailed(_) => 3,
			Self::Step { .. } => 4,
			Self::Interrupted => 130,
			Self::Io(_) | Self::Json(_) => 1,
		}
	}
}

impl From<TargetError> for CliError {
	fn from(err: TargetError) -> Self {
		Self::EnvironmentMisconfigured(err.to_string())
	}
}

/// Exit status for a finished booking run.
pub fn outcome_exit_code(outcome: &BookingOutcome) -> u8 {
	match outcome {
		BookingOutcome::Booked { .. } => 0,
		BookingOutcome::WindowPassed => 5,
		BookingOutcome::Exhausted { .. } | BookingOutcome::WindowClosed { .. } => 6,
		BookingOutcome::Aborted { .. } => 7,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use slotbook::FailureReason;

	#[test]
	fn exit_codes_are_distinct_per_failure_kind() {
		assert_eq!(CliError::EnvironmentMisconfigured("x".into()).exit_code(), 2);
		assert_eq!(CliError::DriverInitializationFailed(RuntimeError::Launch("x".into())).exit_code(), 3);
		let step = CliError::Step {
			step: "login",
			source: StepError::UnexpectedPageState("captcha".into()),
		};
		assert_eq!(step.exit_code(), 4);
		assert_eq!(CliError::Interrupted.exit_code(), 130);
	}

	#[test]
	fn outcome_codes() {
		assert_eq!(outcome_exit_code(&BookingOutcome::Booked { attempts: 2 }), 0);
		assert_eq!(outcome_exit_code(&BookingOutcome::WindowPassed), 5);
		assert_eq!(outcome_exit_code(&BookingOutcome::Exhausted { attempts: 10 }), 6);
		assert_eq!(outcome_exit_code(&BookingOutcome::WindowClosed { attempts: 3 }), 6);
		let aborted = BookingOutcome::Aborted {
			attempts: 1,
			reason: FailureReason::UnexpectedPageState("gone".into()),
		};
		assert_eq!(outcome_exit_code(&aborted), 7);
	}

	#[test]
	fn target_errors_are_misconfiguration() {
		let err: CliError = TargetError::Hour(25).into();
		assert_eq!(err.exit_code(), 2);
		assert_eq!(err.to_string(), "environment misconfigured: hour must be below 24, got 25");
	}
}
