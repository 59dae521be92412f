//! Validated run configuration built from parsed arguments.

use std::path::Path;
use std::time::Duration;

use slotbook::page::LaunchOptions;
use slotbook::{BookingTarget, Credentials, RetryPolicy, SiteMarkup, SystemClock, WaitBounds};

use crate::cli::{BookArgs, SessionArgs};
use crate::error::{CliError, Result};

pub const USER_ID_ENV: &str = "SLOTBOOK_USER_ID";
pub const PASSWORD_ENV: &str = "SLOTBOOK_PASSWORD";

#[derive(Debug, Clone)]
pub struct SessionConfig {
	pub credentials: Credentials,
	pub login_url: String,
	pub category: String,
	pub launch: LaunchOptions,
	pub markup: SiteMarkup,
}

impl SessionConfig {
	pub fn from_args(args: &SessionArgs) -> Result<Self> {
		let user_id = required(args.user_id.as_deref(), USER_ID_ENV)?;
		let password = required(args.password.as_deref(), PASSWORD_ENV)?;
		if args.login_url.trim().is_empty() {
			return Err(CliError::EnvironmentMisconfigured("login url is empty".into()));
		}
		if args.category.trim().is_empty() {
			return Err(CliError::EnvironmentMisconfigured("category is empty".into()));
		}

		let bounds = WaitBounds {
			implicit: Duration::from_secs(args.implicit_wait),
			explicit: Duration::from_secs(args.explicit_wait),
			..WaitBounds::default()
		};
		let launch = LaunchOptions {
			endpoint: args.webdriver_url.clone(),
			chromedriver: args.chromedriver.clone(),
			headless: !args.headed,
			bounds,
			..LaunchOptions::default()
		};

		Ok(Self {
			credentials: Credentials::new(user_id, password),
			login_url: args.login_url.clone(),
			category: args.category.trim().to_string(),
			launch,
			markup: load_markup(args.markup.as_deref())?,
		})
	}
}

#[derive(Debug, Clone)]
pub struct BookingConfig {
	pub session: SessionConfig,
	pub target: BookingTarget,
	pub policy: RetryPolicy,
	pub clock: SystemClock,
}

impl BookingConfig {
	pub fn from_args(args: &BookArgs) -> Result<Self> {
		let session = SessionConfig::from_args(&args.session)?;
		let target = BookingTarget::new(
			args.hour,
			args.minute,
			args.second_buffer,
			args.date_offset,
			session.category.clone(),
			args.slot.clone(),
		)?;
		if args.max_attempts == 0 {
			return Err(CliError::EnvironmentMisconfigured("max attempts must be at least 1".into()));
		}
		let policy = RetryPolicy {
			max_attempts: args.max_attempts,
			..RetryPolicy::default()
		};
		let clock = match args.utc_offset {
			Some(offset) => SystemClock::with_offset(offset),
			None => SystemClock::local(),
		};

		Ok(Self {
			session,
			target,
			policy,
			clock,
		})
	}
}

fn required(value: Option<&str>, env: &str) -> Result<String> {
	match value.map(str::trim) {
		Some(value) if !value.is_empty() => Ok(value.to_string()),
		_ => Err(CliError::EnvironmentMisconfigured(format!("{env} is not set"))),
	}
}

/// Built-in markup, optionally overridden by a JSON file.
pub fn load_markup(path: Option<&Path>) -> Result<SiteMarkup> {
	let Some(path) = path else {
		return Ok(SiteMarkup::default());
	};
	let json = std::fs::read_to_string(path)
		.map_err(|err| CliError::EnvironmentMisconfigured(format!("cannot read markup file {}: {err}", path.display())))?;
	SiteMarkup::from_json(&json)
		.map_err(|err| CliError::EnvironmentMisconfigured(format!("invalid markup file {}: {err}", path.display())))
}
