//! Code origin of a scanned BOM and links back into the source tree.

use super::Detection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the scanned code came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOrigin {
    pub git_url: Option<String>,
    pub git_branch: Option<String>,
    pub git_subfolder: Option<String>,
    pub commit: Option<String>,
    pub purls: Vec<String>,
    /// Set when the BOM was uploaded as a file
    pub uploaded_file_name: Option<String>,
}

impl CodeOrigin {
    /// Read the origin from `metadata.properties` name/value pairs.
    ///
    /// Recognized names: `git-url`, `git-branch`, `git-subfolder`, `purl`
    /// (repeatable) and `commit`. Other properties are ignored.
    #[must_use]
    pub fn from_bom(bom: &Value) -> Self {
        let mut origin = Self::default();
        let Some(properties) = bom
            .get("metadata")
            .and_then(|m| m.get("properties"))
            .and_then(Value::as_array)
        else {
            return origin;
        };

        for prop in properties {
            let (Some(name), Some(value)) = (
                prop.get("name").and_then(Value::as_str),
                prop.get("value").and_then(Value::as_str),
            ) else {
                continue;
            };
            match name {
                "git-url" => origin.git_url = Some(value.to_string()),
                "git-branch" => origin.git_branch = Some(value.to_string()),
                "git-subfolder" => origin.git_subfolder = Some(value.to_string()),
                "purl" => origin.purls.push(value.to_string()),
                "commit" => origin.commit = Some(value.to_string()),
                _ => {}
            }
        }
        origin
    }

    /// Fill fields that are unset here from `other`.
    pub fn fill_from(&mut self, other: &Self) {
        if self.git_url.is_none() {
            self.git_url.clone_from(&other.git_url);
        }
        if self.git_branch.is_none() {
            self.git_branch.clone_from(&other.git_branch);
        }
        if self.git_subfolder.is_none() {
            self.git_subfolder.clone_from(&other.git_subfolder);
        }
        if self.commit.is_none() {
            self.commit.clone_from(&other.commit);
        }
        if self.purls.is_empty() {
            self.purls.clone_from(&other.purls);
        }
        if self.uploaded_file_name.is_none() {
            self.uploaded_file_name.clone_from(&other.uploaded_file_name);
        }
    }

    /// Whether source links can be built at all.
    #[must_use]
    pub const fn can_link(&self) -> bool {
        self.git_url.is_some() && self.git_branch.is_some()
    }
}

/// Build a browsable URL for the single occurrence of `detection`.
///
/// Supported hosts are GitHub, GitLab and Bitbucket.
#[must_use]
pub fn source_link(origin: &CodeOrigin, detection: &Detection) -> Option<String> {
    let (Some(git_url), Some(branch)) = (origin.git_url.as_deref(), origin.git_branch.as_deref())
    else {
        return None;
    };
    let occurrence = detection.occurrence()?;
    let location = occurrence.location?;
    let line = occurrence.line.unwrap_or(1);
    let base = git_url.trim_end_matches('/');

    if git_url.contains("github.com") || git_url.contains("gitlab.com") {
        Some(format!("{base}/blob/{branch}/{location}#L{line}"))
    } else if git_url.contains("bitbucket.org") {
        Some(format!("{base}/blob/{branch}/{location}#lines-{line}"))
    } else {
        None
    }
}
