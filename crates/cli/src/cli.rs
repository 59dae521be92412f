use std::path::PathBuf;

use chrono::FixedOffset;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slotbook")]
#[command(about = "Reserve a contended portal slot the moment booking opens")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Log in, open the booking form and reserve the slot when the window opens
	Book(BookArgs),

	/// Log in and open the booking form without reserving anything
	Rehearse(SessionArgs),

	/// Print the effective site markup as JSON
	Markup {
		/// JSON file overriding part of the built-in markup
		#[arg(long, value_name = "FILE")]
		markup: Option<PathBuf>,
	},
}

/// Everything needed to get a logged-in browser onto the booking form.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
	/// Portal user id
	#[arg(long, env = "SLOTBOOK_USER_ID", hide_env_values = true)]
	pub user_id: Option<String>,

	/// Portal password
	#[arg(long, env = "SLOTBOOK_PASSWORD", hide_env_values = true)]
	pub password: Option<String>,

	#[arg(long, value_name = "URL", default_value = "https://login.gitam.edu/")]
	pub login_url: String,

	/// Resource category to book
	#[arg(long, default_value = "UniSex Fitness Centre")]
	pub category: String,

	/// Driver-side wait applied to every element lookup (seconds)
	#[arg(long, value_name = "SECS", default_value_t = 0)]
	pub implicit_wait: u64,

	/// Upper bound for page transitions such as login and confirmation (seconds)
	#[arg(long, value_name = "SECS", default_value_t = 20)]
	pub explicit_wait: u64,

	/// Use an already running WebDriver server instead of spawning chromedriver
	#[arg(long, value_name = "URL")]
	pub webdriver_url: Option<String>,

	/// chromedriver binary to spawn
	#[arg(long, value_name = "PATH", default_value = "chromedriver")]
	pub chromedriver: PathBuf,

	/// Show the browser window
	#[arg(long)]
	pub headed: bool,

	/// JSON file overriding part of the built-in markup
	#[arg(long, value_name = "FILE")]
	pub markup: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
	#[command(flatten)]
	pub session: SessionArgs,

	/// Hour the portal opens bookings (24h, portal time)
	#[arg(long, default_value_t = 15)]
	pub hour: u32,

	#[arg(long, default_value_t = 0)]
	pub minute: u32,

	/// Seconds into the target minute before the first attempt
	#[arg(long, default_value_t = 5)]
	pub second_buffer: u32,

	/// Days from today to the reserved date
	#[arg(long, default_value_t = 1)]
	pub date_offset: u32,

	/// Slot label as shown on the booking form
	#[arg(long, default_value = "06:00 AM to 07:00 AM")]
	pub slot: String,

	/// Reservation attempts before giving up
	#[arg(long, default_value_t = 10)]
	pub max_attempts: u32,

	/// Portal time zone as an offset such as +05:30 (default: local time)
	#[arg(long, value_name = "OFFSET", value_parser = parse_utc_offset, allow_hyphen_values = true)]
	pub utc_offset: Option<FixedOffset>,
}

/// Parses `+HH`, `+HH:MM`, `-HH` or `-HH:MM`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, String> {
	let invalid = || format!("invalid UTC offset {value:?}, expected e.g. +05:30");
	let (sign, rest) = match value.as_bytes().first() {
		Some(b'+') => (1, &value[1..]),
		Some(b'-') => (-1, &value[1..]),
		_ => return Err(invalid()),
	};
	let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
	let hours: i32 = hours.parse().map_err(|_| invalid())?;
	let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
	if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
		return Err(invalid());
	}
	FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
