use serde::Deserialize;

/// Fields posted by the editor modal.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EditorForm {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
}
