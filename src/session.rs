//! Per-session state and its transitions.
//!
//! One `SessionState` lives for the lifetime of the window and is mutated
//! only on the UI thread, through the `apply_*` methods, after a remote
//! operation has already succeeded. A failed operation never touches it —
//! the previous state stays intact and the user can simply retry.
//!
//! Transitions are strictly linear: not-analyzed → analyzed → any mix of
//! pack / story / enhanced. There is no error state.

/// Everything the session remembers between UI frames. Nothing here
/// survives process exit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// True once a sketch description has been received.
    pub analysis_done: bool,
    /// The cached vision description; later calls are grounded on it.
    pub full_response: String,
    /// Base64 PNG of the snapshot the description was produced from.
    pub base64_image: String,
    /// Hosted URL of the AI-enhanced rendering, when requested.
    pub enhanced_image_url: Option<String>,
    /// The generated creative pack text, when requested.
    pub creative_pack: Option<String>,
    /// The generated children's story, when requested.
    pub story: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A successful analyze: cache the encoded snapshot and its description.
    /// Any pack/story/enhancement derived from an older description is
    /// dropped, since it no longer matches the sketch.
    pub fn apply_analysis(&mut self, base64_image: String, description: String) {
        self.base64_image = base64_image;
        self.full_response = description;
        self.analysis_done = true;
        self.creative_pack = None;
        self.story = None;
        self.enhanced_image_url = None;
    }

    pub fn apply_pack(&mut self, pack: String) {
        self.creative_pack = Some(pack);
    }

    pub fn apply_story(&mut self, story: String) {
        self.story = Some(story);
    }

    pub fn apply_enhanced(&mut self, url: String) {
        self.enhanced_image_url = Some(url);
    }

    /// Back to the pristine not-analyzed state (e.g. after clearing the
    /// canvas).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed_state() -> SessionState {
        let mut state = SessionState::new();
        state.apply_analysis("QUJD".to_string(), "un sol amarillo".to_string());
        state
    }

    #[test]
    fn starts_not_analyzed() {
        let state = SessionState::new();
        assert!(!state.analysis_done);
        assert!(state.full_response.is_empty());
        assert!(state.creative_pack.is_none());
    }

    #[test]
    fn analysis_caches_description_and_image() {
        let state = analyzed_state();
        assert!(state.analysis_done);
        assert_eq!(state.full_response, "un sol amarillo");
        assert_eq!(state.base64_image, "QUJD");
    }

    #[test]
    fn reanalysis_drops_derived_artifacts() {
        let mut state = analyzed_state();
        state.apply_pack("TITULO: Sol".to_string());
        state.apply_story("Había una vez...".to_string());
        state.apply_enhanced("https://example.test/x.png".to_string());

        state.apply_analysis("REJ=".to_string(), "una luna azul".to_string());
        assert_eq!(state.full_response, "una luna azul");
        assert!(state.creative_pack.is_none());
        assert!(state.story.is_none());
        assert!(state.enhanced_image_url.is_none());
    }

    #[test]
    fn pack_story_and_enhancement_are_independent() {
        let mut state = analyzed_state();
        state.apply_story("Había una vez...".to_string());
        assert!(state.creative_pack.is_none());
        assert_eq!(state.story.as_deref(), Some("Había una vez..."));
        // The cached description is untouched
        assert_eq!(state.full_response, "un sol amarillo");
    }

    #[test]
    fn reset_returns_to_default() {
        let mut state = analyzed_state();
        state.reset();
        assert_eq!(state, SessionState::default());
    }
}
