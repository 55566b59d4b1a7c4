//! Open a chat by name through the search box.

use super::{
    found, selectors,
    wait::{first_present, wait_for_any},
    Automator,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use wadrive_core::{
    error::WadriveError,
    text::{normalize_name, strip_name_prefix},
    traits::ElementId,
};

/// What gets typed into the search box for `name`.
pub fn search_query(name: &str, prefix: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix} {name}")
    }
}

/// How well a displayed chat title matches the wanted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Match {
    Contains,
    Exact,
}

fn match_title(title: &str, name: &str, prefix: &str) -> Option<Match> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }
    let bare = strip_name_prefix(title, prefix.trim()).unwrap_or(title);
    if normalize_name(bare) == wanted || normalize_name(title) == wanted {
        Some(Match::Exact)
    } else if normalize_name(title).contains(&wanted) {
        Some(Match::Contains)
    } else {
        None
    }
}

impl Automator<'_> {
    /// Search for `name` and open its chat.
    ///
    /// Returns `false` (after leaving search) when no result matches.
    pub async fn open_chat_by_name(&self, name: &str, prefix: &str) -> Result<bool, WadriveError> {
        self.open_search().await?;

        let (_, input) = wait_for_any(
            self.device,
            &selectors::search_input(self.variant),
            self.pacing.element_timeout,
            self.pacing.poll,
        )
        .await?;
        let query = search_query(name, prefix);
        found(self.device.clear(&input).await)?;
        self.device.send_keys(&input, &query).await?;
        debug!("searching for '{query}'");
        self.pause(self.pacing.settle).await;

        match self.matching_result(name, prefix).await? {
            Some(result) => {
                self.device.click(&result).await?;
                self.pause(self.pacing.step).await;
                info!("opened chat '{name}'");
                Ok(true)
            }
            None => {
                warn!("no search result for '{name}'");
                self.leave_search().await?;
                Ok(false)
            }
        }
    }

    async fn open_search(&self) -> Result<(), WadriveError> {
        match first_present(self.device, &selectors::search_button(self.variant)).await? {
            Some(button) => self.device.click(&button).await?,
            None => {
                let point = self.profile.search_button();
                warn!("search button not found, tapping ({}, {})", point.x, point.y);
                self.device.tap(point).await?;
            }
        }
        self.pause(self.pacing.step).await;
        Ok(())
    }

    /// Poll result titles until one matches: exact beats contains.
    async fn matching_result(
        &self,
        name: &str,
        prefix: &str,
    ) -> Result<Option<ElementId>, WadriveError> {
        let deadline = Instant::now() + self.pacing.element_timeout;
        loop {
            let titles = found(self.device.find_elements(&selectors::result_names()).await)?
                .unwrap_or_default();
            let mut best: Option<(Match, ElementId)> = None;
            for title in titles {
                let Some(text) = found(self.device.text(&title).await)? else {
                    continue;
                };
                let Some(quality) = match_title(&text, name, prefix) else {
                    continue;
                };
                if best.as_ref().map_or(true, |(q, _)| quality > *q) {
                    best = Some((quality, title));
                }
                if quality == Match::Exact {
                    break;
                }
            }
            if let Some((_, element)) = best {
                return Ok(Some(element));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.pacing.poll).await;
        }
    }

    /// Close the keyboard and the search bar.
    async fn leave_search(&self) -> Result<(), WadriveError> {
        self.go_back().await?;
        self.return_to_list(1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query() {
        assert_eq!(search_query("Ram", ""), "Ram");
        assert_eq!(search_query("Ram", " Shop "), "Shop Ram");
    }

    #[test]
    fn test_match_title() {
        assert_eq!(match_title("Shop Ram", "Ram", "Shop"), Some(Match::Exact));
        assert_eq!(match_title("Ram", "ram", ""), Some(Match::Exact));
        assert_eq!(match_title("Shop Ram Traders", "Ram", "Shop"), Some(Match::Contains));
        assert_eq!(match_title("Sita", "Ram", "Shop"), None);
        assert_eq!(match_title("Sita", "  ", ""), None);
    }
}
