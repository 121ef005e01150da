//! Assistant actions in the staged file-selection protocol.

use super::entities::{FileExtract, IgnoredFile, SelectedFile};
use serde::Deserialize;
use thiserror::Error;

/// Select/ignore/extract decisions for staged files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub select: Vec<SelectedFile>,
    pub ignore: Vec<IgnoredFile>,
    pub extract: Vec<FileExtract>,
}

impl Resolution {
    /// Every path this resolution mentions, in select, extract, ignore order.
    pub fn paths(&self) -> Vec<&str> {
        self.select
            .iter()
            .map(|f| f.path.as_str())
            .chain(self.extract.iter().map(|f| f.path.as_str()))
            .chain(self.ignore.iter().map(|f| f.path.as_str()))
            .collect()
    }
}

/// One model turn. Exactly one branch is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantAction {
    /// Request the contents of these files.
    Inspect(Vec<String>),
    /// Decide on previously inspected files.
    Resolve(Resolution),
    /// The selection is final.
    Complete,
}

impl AssistantAction {
    pub fn kind(&self) -> &'static str {
        match self {
            AssistantAction::Inspect(_) => "inspectFiles",
            AssistantAction::Resolve(_) => "selectFiles/ignoreFiles",
            AssistantAction::Complete => "complete",
        }
    }
}

/// Why a wire response could not be read as an [`AssistantAction`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionShapeError {
    #[error("response contains no action")]
    Empty,

    #[error("response mixes several actions: {0}")]
    Ambiguous(String),
}

/// JSON shape the model answers with.
///
/// `keepFiles` is accepted as an alias of `selectFiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAction {
    #[serde(default)]
    pub inspect_files: Option<Vec<String>>,
    #[serde(default, alias = "keepFiles")]
    pub select_files: Option<Vec<SelectedFile>>,
    #[serde(default)]
    pub ignore_files: Option<Vec<IgnoredFile>>,
    #[serde(default)]
    pub extract_files: Option<Vec<FileExtract>>,
    #[serde(default)]
    pub complete: Option<bool>,
}

impl TryFrom<WireAction> for AssistantAction {
    type Error = ActionShapeError;

    /// A branch counts as populated when its list is non-empty (or
    /// `complete` is `true`). Empty lists are treated as absent.
    fn try_from(wire: WireAction) -> Result<Self, Self::Error> {
        let inspect = wire.inspect_files.unwrap_or_default();
        let select = wire.select_files.unwrap_or_default();
        let ignore = wire.ignore_files.unwrap_or_default();
        let extract = wire.extract_files.unwrap_or_default();
        let complete = wire.complete.unwrap_or(false);

        let resolves = !(select.is_empty() && ignore.is_empty() && extract.is_empty());

        let mut populated = Vec::new();
        if !inspect.is_empty() {
            populated.push("inspectFiles");
        }
        if resolves {
            populated.push("selectFiles/ignoreFiles");
        }
        if complete {
            populated.push("complete");
        }

        match populated.len() {
            0 => Err(ActionShapeError::Empty),
            1 if !inspect.is_empty() => Ok(AssistantAction::Inspect(inspect)),
            1 if resolves => Ok(AssistantAction::Resolve(Resolution {
                select,
                ignore,
                extract,
            })),
            1 => Ok(AssistantAction::Complete),
            _ => Err(ActionShapeError::Ambiguous(populated.join(" + "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<AssistantAction, ActionShapeError> {
        let wire: WireAction = serde_json::from_str(json).unwrap();
        AssistantAction::try_from(wire)
    }

    #[test]
    fn test_inspect() {
        assert_eq!(
            parse(r#"{"inspectFiles": ["a.rs", "b.rs"]}"#).unwrap(),
            AssistantAction::Inspect(vec!["a.rs".into(), "b.rs".into()])
        );
    }

    #[test]
    fn test_resolve_with_keep_alias() {
        let action = parse(
            r#"{"keepFiles": [{"path": "a.rs", "reason": "core"}], "ignoreFiles": ["b.rs"], "inspectFiles": []}"#,
        )
        .unwrap();
        let AssistantAction::Resolve(resolution) = action else {
            panic!("expected resolve");
        };
        assert_eq!(resolution.select[0].path, "a.rs");
        assert_eq!(resolution.ignore[0].path, "b.rs");
        assert_eq!(resolution.paths(), vec!["a.rs", "b.rs"]);
    }

    #[test]
    fn test_complete() {
        assert_eq!(
            parse(r#"{"complete": true}"#).unwrap(),
            AssistantAction::Complete
        );
    }

    #[test]
    fn test_complete_false_is_empty() {
        assert_eq!(parse(r#"{"complete": false}"#), Err(ActionShapeError::Empty));
        assert_eq!(parse("{}"), Err(ActionShapeError::Empty));
    }

    #[test]
    fn test_mixed_branches_are_ambiguous() {
        let err = parse(r#"{"inspectFiles": ["a.rs"], "complete": true}"#).unwrap_err();
        assert!(matches!(err, ActionShapeError::Ambiguous(_)));
    }
}
