//! Bounded polling waits over a page controller.
//!
//! [`wait_until`] is the single polling loop; everything else is a probe
//! handed to it. A probe that hits a stale element is treated as "not yet"
//! because the page is mid re-render.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::{ElementHandle, PageController, Result, SelectorSet};
use crate::error::PageError;

/// What a located element must satisfy to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
	Present,
	Clickable,
}

/// Polls `probe` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once, so a zero timeout is a single check.
/// Returns `Ok(None)` on timeout; driver errors other than staleness abort
/// the wait.
pub async fn wait_until<P, T, F, Fut>(page: &P, timeout: Duration, mut probe: F) -> Result<Option<T>>
where
	P: PageController + ?Sized,
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<T>>>,
{
	let started = Instant::now();
	loop {
		match probe().await {
			Ok(Some(value)) => return Ok(Some(value)),
			Ok(None) | Err(PageError::Stale) => {}
			Err(err) => return Err(err),
		}

		let elapsed = started.elapsed();
		if elapsed >= timeout {
			return Ok(None);
		}
		tokio::time::sleep(page.bounds().poll_interval.min(timeout - elapsed)).await;
	}
}

/// One pass over the alternatives: the first locator whose first element is
/// ready wins.
pub async fn first_match<P>(page: &P, set: &SelectorSet, readiness: Readiness) -> Result<Option<ElementHandle>>
where
	P: PageController + ?Sized,
{
	for locator in set.iter() {
		let Some(element) = page.find_element(locator).await? else {
			continue;
		};
		let ready = match readiness {
			Readiness::Present => true,
			Readiness::Clickable => page.is_clickable(&element).await?,
		};
		if ready {
			return Ok(Some(element));
		}
	}
	Ok(None)
}

/// All elements of the first alternative that matches anything.
pub async fn first_non_empty<P>(page: &P, set: &SelectorSet) -> Result<Option<Vec<ElementHandle>>>
where
	P: PageController + ?Sized,
{
	for locator in set.iter() {
		let elements = page.find_all_elements(locator).await?;
		if !elements.is_empty() {
			return Ok(Some(elements));
		}
	}
	Ok(None)
}

/// Waits for the first ready element among `set`.
pub async fn resolve_first<P>(page: &P, set: &SelectorSet, readiness: Readiness, timeout: Duration) -> Result<Option<ElementHandle>>
where
	P: PageController + ?Sized,
{
	wait_until(page, timeout, || first_match(page, set, readiness)).await
}

/// Waits until no alternative of `set` has a displayed element.
///
/// Returns `false` if something was still visible when `timeout` elapsed.
pub async fn wait_for_absence<P>(page: &P, set: &SelectorSet, timeout: Duration) -> Result<bool>
where
	P: PageController + ?Sized,
{
	let gone = wait_until(page, timeout, || nothing_displayed(page, set)).await?;
	Ok(gone.is_some())
}

async fn nothing_displayed<P>(page: &P, set: &SelectorSet) -> Result<Option<()>>
where
	P: PageController + ?Sized,
{
	for locator in set.iter() {
		for element in page.find_all_elements(locator).await? {
			if page.is_displayed(&element).await? {
				return Ok(None);
			}
		}
	}
	Ok(Some(()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::{FakeElement, FakePage, Locator, WaitBounds};

	#[tokio::test]
	async fn first_match_respects_alternative_order() {
		let page = FakePage::new();
		let primary = Locator::css("button.app-launcher");
		let fallback = Locator::xpath("//i[contains(@class, 'fa-th')]");
		page.add(fallback.clone(), FakeElement::new("icon"));
		page.add(primary.clone(), FakeElement::new("button"));

		let set = SelectorSet::new(vec![primary, fallback]);
		let found = first_match(&page, &set, Readiness::Present).await.unwrap().unwrap();
		assert_eq!(page.name_of(&found), "button");
	}

	#[tokio::test]
	async fn clickable_skips_disabled_alternative() {
		let page = FakePage::new();
		let primary = Locator::css("button.app-launcher");
		let fallback = Locator::css("button.fallback");
		page.add(primary.clone(), FakeElement::new("disabled").disabled());
		page.add(fallback.clone(), FakeElement::new("fallback"));

		let set = SelectorSet::new(vec![primary, fallback]);
		let found = resolve_first(&page, &set, Readiness::Clickable, Duration::ZERO).await.unwrap().unwrap();
		assert_eq!(page.name_of(&found), "fallback");
	}

	#[tokio::test]
	async fn zero_timeout_checks_once() {
		let page = FakePage::new();
		let set = SelectorSet::single(Locator::css("#nothing"));

		let found = resolve_first(&page, &set, Readiness::Present, Duration::ZERO).await.unwrap();
		assert!(found.is_none());
		assert_eq!(page.calls().len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn waits_poll_until_timeout() {
		let bounds = WaitBounds {
			poll_interval: Duration::from_millis(100),
			..WaitBounds::immediate()
		};
		let page = FakePage::with_bounds(bounds);
		let set = SelectorSet::single(Locator::css("#late"));

		let started = Instant::now();
		let found = resolve_first(&page, &set, Readiness::Present, Duration::from_millis(250)).await.unwrap();
		assert!(found.is_none());
		assert_eq!(started.elapsed(), Duration::from_millis(250));
		// polls at 0, 100, 200 and a final check at 250
		assert_eq!(page.calls().len(), 4);
	}

	#[tokio::test]
	async fn lost_session_aborts_wait() {
		let page = FakePage::new();
		page.disconnect();
		let set = SelectorSet::single(Locator::css("#any"));

		let err = resolve_first(&page, &set, Readiness::Present, Duration::from_secs(60)).await.unwrap_err();
		assert!(matches!(err, PageError::SessionLost(_)));
	}

	#[tokio::test]
	async fn absence_ignores_hidden_elements() {
		let page = FakePage::new();
		let backdrop = Locator::css(".modal-backdrop");
		page.add(backdrop.clone(), FakeElement::new("backdrop").hidden());

		assert!(wait_for_absence(&page, &backdrop.into(), Duration::ZERO).await.unwrap());
	}
}
