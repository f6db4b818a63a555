use tracing::{debug, warn};

use crate::{
    FetchError, LocationSuggestion,
    sequence::{RequestSequence, Ticket},
};

/// A location search the runtime should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub query: String,
}

/// Turns free-text input into a live list of candidate locations.
#[derive(Debug, Default)]
pub struct QueryController {
    pending_text: String,
    suggestions: Vec<LocationSuggestion>,
    searches: RequestSequence,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    pub fn suggestions(&self) -> &[LocationSuggestion] {
        &self.suggestions
    }

    /// Record the new input; returns the search to run, if any.
    pub fn on_input_changed(&mut self, text: &str) -> Option<SearchRequest> {
        self.pending_text = text.to_string();

        let query = text.trim();
        if query.is_empty() {
            self.clear_suggestions();
            return None;
        }

        let ticket = self.searches.issue();
        debug!(%ticket, query, "search issued");
        Some(SearchRequest { ticket, query: query.to_string() })
    }

    /// Apply a search result. Returns `false` when the result was stale.
    pub fn apply_search(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<LocationSuggestion>, FetchError>,
    ) -> bool {
        if !self.searches.is_current(ticket) {
            debug!(%ticket, "discarding superseded search result");
            return false;
        }

        match result {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(err) => {
                warn!(%ticket, error = %err, "location search failed");
                self.suggestions.clear();
            }
        }
        true
    }

    /// Returns the city whose forecast should be loaded.
    pub fn on_suggestion_selected(&mut self, suggestion: &LocationSuggestion) -> String {
        self.pending_text = suggestion.name.clone();
        self.clear_suggestions();
        suggestion.name.clone()
    }

    /// Blank input is a no-op and leaves suggestions alone.
    pub fn on_submit(&mut self, raw: &str) -> Option<String> {
        let city = raw.trim();
        if city.is_empty() {
            return None;
        }

        let city = city.to_string();
        self.pending_text.clear();
        self.clear_suggestions();
        Some(city)
    }

    /// Submit whatever has been typed so far.
    pub fn submit_pending(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.pending_text);
        let city = self.on_submit(&raw);
        if city.is_none() {
            self.pending_text = raw;
        }
        city
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        // A search still in flight must not repopulate the list.
        self.searches.invalidate();
    }
}
