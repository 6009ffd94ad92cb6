use crate::error::SessionError;
use crate::prefill::{PrefillSource, PrefillState};
use tracing::debug;

/// State of one "choose a source for this field" interaction.
///
/// `Closed -> Open(field, highlighted?) -> Closed`. Highlighting never touches
/// the store; only [`SelectionSession::commit`] writes to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionSession {
    #[default]
    Closed,
    Open {
        field_id: String,
        highlighted: Option<PrefillSource>,
    },
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts mapping `field_id` with nothing highlighted, whether or not the
    /// field already has a committed source. Replaces any open interaction.
    pub fn open(&mut self, field_id: impl Into<String>) {
        *self = SelectionSession::Open {
            field_id: field_id.into(),
            highlighted: None,
        };
    }

    pub fn highlight(&mut self, source: PrefillSource) -> Result<(), SessionError> {
        match self {
            SelectionSession::Open { highlighted, .. } => {
                *highlighted = Some(source);
                Ok(())
            }
            SelectionSession::Closed => Err(SessionError::NotOpen),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SelectionSession::Open { .. })
    }

    pub fn active_field(&self) -> Option<&str> {
        match self {
            SelectionSession::Open { field_id, .. } => Some(field_id.as_str()),
            SelectionSession::Closed => None,
        }
    }

    pub fn highlighted(&self) -> Option<&PrefillSource> {
        match self {
            SelectionSession::Open { highlighted, .. } => highlighted.as_ref(),
            SelectionSession::Closed => None,
        }
    }

    /// Whether `candidate` is the highlighted source. Compares the full
    /// tagged value, never just the label.
    pub fn is_highlighted(&self, candidate: &PrefillSource) -> bool {
        self.highlighted() == Some(candidate)
    }

    /// Whether [`SelectionSession::commit`] would succeed.
    pub fn can_commit(&self, selected_form_id: Option<&str>) -> bool {
        self.check_commit(selected_form_id).is_ok()
    }

    /// Writes the highlighted source for the active field of `selected_form_id`
    /// into `store`, then closes. On error nothing changes.
    pub fn commit(
        &mut self,
        selected_form_id: Option<&str>,
        store: &mut PrefillState,
    ) -> Result<(), SessionError> {
        let (form_id, field_id, source) = self.check_commit(selected_form_id)?;
        store.set(form_id, field_id, source.clone());
        debug!("Committed mapping for {}.{}", form_id, field_id);
        *self = SelectionSession::Closed;
        Ok(())
    }

    /// Closes without writing anything.
    pub fn cancel(&mut self) {
        *self = SelectionSession::Closed;
    }

    fn check_commit<'a>(
        &'a self,
        selected_form_id: Option<&'a str>,
    ) -> Result<(&'a str, &'a str, &'a PrefillSource), SessionError> {
        let SelectionSession::Open {
            field_id,
            highlighted,
        } = self
        else {
            return Err(SessionError::NotOpen);
        };
        let source = highlighted
            .as_ref()
            .ok_or_else(|| SessionError::NoHighlightedSource {
                field_id: field_id.clone(),
            })?;
        let form_id = selected_form_id.ok_or(SessionError::NoSelectedForm)?;
        Ok((form_id, field_id.as_str(), source))
    }
}
