use tracing::info;

use super::require;
use crate::error::StepError;
use crate::markup::CategoryMarkup;
use crate::page::{PageController, Readiness};

/// Clicks the card whose text contains `label`.
pub async fn select_resource_category<P>(page: &P, label: &str, markup: &CategoryMarkup) -> Result<(), StepError>
where
	P: PageController + ?Sized,
{
	let explicit = page.bounds().explicit;
	let card = markup.card.render(&[("label", label)]);

	let element = require(page, &card, Readiness::Clickable, explicit, &format!("category {label:?}")).await?;
	page.click(&element).await?;

	info!(target = "slotbook.step", category = label, "category selected");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::{FakeElement, FakePage, Locator};

	#[tokio::test]
	async fn clicks_card_for_label() {
		let page = FakePage::new();
		page.add(
			Locator::xpath("//div[contains(text(), 'UniSex Fitness Centre')]"),
			FakeElement::new("fitness"),
		);

		select_resource_category(&page, "UniSex Fitness Centre", &CategoryMarkup::default()).await.unwrap();
		assert_eq!(page.clicks(), vec!["fitness"]);
	}

	#[tokio::test]
	async fn quotes_labels_with_apostrophes() {
		let page = FakePage::new();
		page.add(Locator::xpath("//div[contains(text(), \"Women's Gym\")]"), FakeElement::new("womens"));

		select_resource_category(&page, "Women's Gym", &CategoryMarkup::default()).await.unwrap();
		assert_eq!(page.clicks(), vec!["womens"]);
	}

	#[tokio::test]
	async fn unknown_category_fails() {
		let page = FakePage::new();
		let err = select_resource_category(&page, "Pool", &CategoryMarkup::default()).await.unwrap_err();
		assert!(matches!(err, StepError::WaitTimedOut { .. }));
	}
}
