//! Scripted in-memory page for exercising workflow steps without a browser.
//!
//! Elements are registered under the exact [`Locator`] a step will query;
//! clicking an element can trigger [`Reaction`]s that change the page. Every
//! controller call is recorded so tests can assert on the interaction
//! sequence.
//!
//! ```ignore
//! let page = FakePage::new();
//! page.add(Locator::id("login-button"), FakeElement::new("login"));
//! page.on_click("login", Reaction::SetUrl("https://portal/dashboard".into()));
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ElementHandle, Locator, PageController, Result, WaitBounds};
use crate::error::PageError;

/// One recorded controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	Navigate(String),
	Find(Locator),
	FindAll(Locator),
	Click(String),
	Type(String, String),
	Read(String),
	Close,
}

/// An element of the fake page, identified in call logs by its `name`.
#[derive(Debug, Clone)]
pub struct FakeElement {
	name: String,
	text: String,
	attributes: HashMap<String, String>,
	displayed: bool,
	enabled: bool,
}

impl FakeElement {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			text: String::new(),
			attributes: HashMap::new(),
			displayed: true,
			enabled: true,
		}
	}

	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = text.into();
		self
	}

	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn hidden(mut self) -> Self {
		self.displayed = false;
		self
	}

	pub fn disabled(mut self) -> Self {
		self.enabled = false;
		self
	}
}

/// Page change triggered by clicking an element.
#[derive(Debug, Clone)]
pub enum Reaction {
	/// Adds an element under the locator.
	Reveal(Locator, FakeElement),
	/// Removes every element registered under the locator.
	Remove(Locator),
	SetUrl(String),
}

#[derive(Default)]
struct FakeState {
	url: String,
	nodes: Vec<FakeElement>,
	index: HashMap<Locator, Vec<usize>>,
	reactions: HashMap<String, Vec<Reaction>>,
	calls: Vec<Call>,
	closed: bool,
	disconnected: bool,
}

impl FakeState {
	fn insert(&mut self, locator: Locator, element: FakeElement) {
		self.nodes.push(element);
		let id = self.nodes.len() - 1;
		self.index.entry(locator).or_default().push(id);
	}

	fn node(&self, element: &ElementHandle) -> Result<&FakeElement> {
		element
			.id()
			.parse::<usize>()
			.ok()
			.and_then(|i| self.nodes.get(i))
			.ok_or(PageError::Stale)
	}

	fn check_connected(&self) -> Result<()> {
		if self.disconnected {
			return Err(PageError::SessionLost("fake page disconnected".into()));
		}
		Ok(())
	}
}

/// In-memory [`PageController`].
pub struct FakePage {
	bounds: WaitBounds,
	state: Mutex<FakeState>,
}

impl FakePage {
	/// A fake whose waits never block.
	pub fn new() -> Self {
		Self::with_bounds(WaitBounds::immediate())
	}

	pub fn with_bounds(bounds: WaitBounds) -> Self {
		Self {
			bounds,
			state: Mutex::new(FakeState::default()),
		}
	}

	pub fn add(&self, locator: Locator, element: FakeElement) {
		self.state.lock().insert(locator, element);
	}

	pub fn on_click(&self, name: &str, reaction: Reaction) {
		self.state.lock().reactions.entry(name.to_string()).or_default().push(reaction);
	}

	/// Makes every further call fail as if the browser had gone away.
	pub fn disconnect(&self) {
		self.state.lock().disconnected = true;
	}

	pub fn url(&self) -> String {
		self.state.lock().url.clone()
	}

	pub fn is_closed(&self) -> bool {
		self.state.lock().closed
	}

	pub fn calls(&self) -> Vec<Call> {
		self.state.lock().calls.clone()
	}

	/// Drains the call log.
	pub fn take_calls(&self) -> Vec<Call> {
		std::mem::take(&mut self.state.lock().calls)
	}

	/// Names of clicked elements, in order.
	pub fn clicks(&self) -> Vec<String> {
		self.state
			.lock()
			.calls
			.iter()
			.filter_map(|call| match call {
				Call::Click(name) => Some(name.clone()),
				_ => None,
			})
			.collect()
	}

	/// `(element, text)` pairs typed so far.
	pub fn typed(&self) -> Vec<(String, String)> {
		self.state
			.lock()
			.calls
			.iter()
			.filter_map(|call| match call {
				Call::Type(name, text) => Some((name.clone(), text.clone())),
				_ => None,
			})
			.collect()
	}

	pub fn name_of(&self, element: &ElementHandle) -> String {
		self.state.lock().node(element).map(|n| n.name.clone()).unwrap_or_default()
	}
}

impl Default for FakePage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PageController for FakePage {
	fn bounds(&self) -> &WaitBounds {
		&self.bounds
	}

	async fn navigate(&self, url: &str) -> Result<()> {
		let mut state = self.state.lock();
		state.calls.push(Call::Navigate(url.to_string()));
		state.check_connected()?;
		state.url = url.to_string();
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		let state = self.state.lock();
		state.check_connected()?;
		Ok(state.url.clone())
	}

	async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
		let mut state = self.state.lock();
		state.calls.push(Call::Find(locator.clone()));
		state.check_connected()?;
		Ok(state
			.index
			.get(locator)
			.and_then(|ids| ids.first())
			.map(|id| ElementHandle::new(id.to_string())))
	}

	async fn find_all_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
		let mut state = self.state.lock();
		state.calls.push(Call::FindAll(locator.clone()));
		state.check_connected()?;
		Ok(state
			.index
			.get(locator)
			.map(|ids| ids.iter().map(|id| ElementHandle::new(id.to_string())).collect())
			.unwrap_or_default())
	}

	async fn click(&self, element: &ElementHandle) -> Result<()> {
		let mut state = self.state.lock();
		state.check_connected()?;
		let name = state.node(element)?.name.clone();
		state.calls.push(Call::Click(name.clone()));

		let reactions = state.reactions.get(&name).cloned().unwrap_or_default();
		for reaction in reactions {
			match reaction {
				Reaction::Reveal(locator, element) => state.insert(locator, element),
				Reaction::Remove(locator) => {
					state.index.remove(&locator);
				}
				Reaction::SetUrl(url) => state.url = url,
			}
		}
		Ok(())
	}

	async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<()> {
		let mut state = self.state.lock();
		state.check_connected()?;
		let name = state.node(element)?.name.clone();
		state.calls.push(Call::Type(name, text.to_string()));
		Ok(())
	}

	async fn read_text(&self, element: &ElementHandle) -> Result<String> {
		let mut state = self.state.lock();
		state.check_connected()?;
		let node = state.node(element)?;
		let (name, text) = (node.name.clone(), node.text.clone());
		state.calls.push(Call::Read(name));
		Ok(text)
	}

	async fn read_attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
		let state = self.state.lock();
		state.check_connected()?;
		Ok(state.node(element)?.attributes.get(name).cloned())
	}

	async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
		let state = self.state.lock();
		state.check_connected()?;
		Ok(state.node(element)?.displayed)
	}

	async fn is_clickable(&self, element: &ElementHandle) -> Result<bool> {
		let state = self.state.lock();
		state.check_connected()?;
		let node = state.node(element)?;
		Ok(node.displayed && node.enabled)
	}

	async fn close(&self) -> Result<()> {
		let mut state = self.state.lock();
		if !state.closed {
			state.calls.push(Call::Close);
			state.closed = true;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn clicks_apply_reactions() {
		let page = FakePage::new();
		let button = Locator::css("button.reserve");
		let alert = Locator::css(".alert-success");
		page.add(button.clone(), FakeElement::new("reserve"));
		page.on_click("reserve", Reaction::Reveal(alert.clone(), FakeElement::new("alert")));

		assert!(page.find_element(&alert).await.unwrap().is_none());
		let el = page.find_element(&button).await.unwrap().unwrap();
		page.click(&el).await.unwrap();
		assert!(page.find_element(&alert).await.unwrap().is_some());
		assert_eq!(page.clicks(), vec!["reserve"]);
	}

	#[tokio::test]
	async fn close_is_recorded_once() {
		let page = FakePage::new();
		page.close().await.unwrap();
		page.close().await.unwrap();
		assert!(page.is_closed());
		assert_eq!(page.calls(), vec![Call::Close]);
	}

	#[tokio::test]
	async fn remove_reaction_clears_locator() {
		let page = FakePage::new();
		let slot = Locator::css(".slot");
		page.add(slot.clone(), FakeElement::new("slot"));
		page.add(Locator::css("button"), FakeElement::new("clear"));
		page.on_click("clear", Reaction::Remove(slot.clone()));

		let button = page.find_element(&Locator::css("button")).await.unwrap().unwrap();
		page.click(&button).await.unwrap();
		assert!(page.find_all_elements(&slot).await.unwrap().is_empty());
	}
}
