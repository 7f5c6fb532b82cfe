use crate::model::AnalysisRequest;

/// Accumulates incremental speech-to-text segments into submit-ready text.
///
/// Recognizers emit interim hypotheses that are revised until a segment is
/// finalized; only the latest interim segment is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptBuffer {
    committed: Vec<String>,
    interim: Option<String>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending hypothesis
    pub fn push_interim(&mut self, segment: impl Into<String>) {
        let segment = segment.into();
        self.interim = if segment.trim().is_empty() {
            None
        } else {
            Some(segment.trim().to_string())
        };
    }

    /// Commit a finalized segment, discarding the pending hypothesis
    pub fn push_final(&mut self, segment: impl Into<String>) {
        self.interim = None;
        let segment = segment.into();
        let segment = segment.trim();
        if !segment.is_empty() {
            self.committed.push(segment.to_string());
        }
    }

    /// Everything heard so far, including the pending hypothesis
    pub fn text(&self) -> String {
        self.committed
            .iter()
            .map(String::as_str)
            .chain(self.interim.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Finalized text only
    pub fn committed_text(&self) -> String {
        self.committed.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.interim.is_none()
    }

    pub fn clear(&mut self) {
        self.committed.clear();
        self.interim = None;
    }

    /// Build a text request from the finalized segments
    pub fn into_request(self) -> AnalysisRequest {
        AnalysisRequest::from_text(self.committed_text())
    }
}
