//! Selector polling.

use super::found;
use std::time::Duration;
use tokio::time::Instant;
use wadrive_core::{
    error::WadriveError,
    locator::Locator,
    traits::{Device, ElementId},
};

/// First element of the first locator that matches anything. One pass, no waiting.
pub async fn first_present(
    device: &dyn Device,
    locators: &[Locator],
) -> Result<Option<ElementId>, WadriveError> {
    for locator in locators {
        let hits = found(device.find_elements(locator).await)?.unwrap_or_default();
        if let Some(first) = hits.into_iter().next() {
            return Ok(Some(first));
        }
    }
    Ok(None)
}

/// Like [`first_present`], but the element must also be displayed.
pub async fn first_displayed(
    device: &dyn Device,
    locators: &[Locator],
) -> Result<Option<ElementId>, WadriveError> {
    for locator in locators {
        if let Some(hit) = displayed_match(device, locator).await? {
            return Ok(Some(hit));
        }
    }
    Ok(None)
}

async fn displayed_match(
    device: &dyn Device,
    locator: &Locator,
) -> Result<Option<ElementId>, WadriveError> {
    let hits = found(device.find_elements(locator).await)?.unwrap_or_default();
    for element in hits {
        if found(device.is_displayed(&element).await)?.unwrap_or(false) {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

/// Poll every locator each round until one yields a displayed element.
///
/// Returns the index of the matching locator with the element. Always makes
/// at least one pass, so a zero timeout means "check once".
pub async fn wait_for_any(
    device: &dyn Device,
    locators: &[Locator],
    timeout: Duration,
    poll: Duration,
) -> Result<(usize, ElementId), WadriveError> {
    let deadline = Instant::now() + timeout;
    loop {
        for (idx, locator) in locators.iter().enumerate() {
            if let Some(hit) = displayed_match(device, locator).await? {
                return Ok((idx, hit));
            }
        }
        if Instant::now() >= deadline {
            let wanted: Vec<String> = locators.iter().map(ToString::to_string).collect();
            return Err(WadriveError::Timeout(format!(
                "none of [{}] appeared within {timeout:?}",
                wanted.join(", ")
            )));
        }
        tokio::time::sleep(poll).await;
    }
}

/// First child of `parent` matching any of `locators`, in order.
pub async fn first_child(
    device: &dyn Device,
    parent: &ElementId,
    locators: &[Locator],
) -> Result<Option<ElementId>, WadriveError> {
    for locator in locators {
        if let Some(child) = found(device.find_child(parent, locator).await)? {
            return Ok(Some(child));
        }
    }
    Ok(None)
}
