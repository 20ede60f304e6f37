//! Owning-project inference for events created outside SiteCal.
//!
//! Lookup order:
//! 1. a `project:<id>` tag in the event description (`#project:<id>` and
//!    `[project:<id>]` are accepted too)
//! 2. the configured calendar id -> project id map
//! 3. the default project

use std::collections::HashMap;

use sitecal_domain::constants::PROJECT_TAG_PREFIX;
use sitecal_domain::RemoteEvent;

#[derive(Debug, Clone, Default)]
pub struct ProjectInference {
    calendar_projects: HashMap<String, String>,
    default_project_id: String,
}

impl ProjectInference {
    pub fn new(
        calendar_projects: HashMap<String, String>,
        default_project_id: impl Into<String>,
    ) -> Self {
        Self { calendar_projects, default_project_id: default_project_id.into() }
    }

    pub fn infer(&self, event: &RemoteEvent) -> String {
        if let Some(tagged) = event.description.as_deref().and_then(project_tag) {
            return tagged;
        }
        self.calendar_projects
            .get(&event.calendar_id)
            .cloned()
            .unwrap_or_else(|| self.default_project_id.clone())
    }
}

/// First `project:<id>` tag in `text`, if any.
pub fn project_tag(text: &str) -> Option<String> {
    text.split_whitespace().find_map(|token| {
        let token = token.trim_start_matches(['#', '[', '(']);
        let head = token.get(..PROJECT_TAG_PREFIX.len())?;
        if !head.eq_ignore_ascii_case(PROJECT_TAG_PREFIX) {
            return None;
        }
        let id = token[PROJECT_TAG_PREFIX.len()..].trim_end_matches([']', ')', ',', '.', ';']);
        (!id.is_empty()).then(|| id.to_string())
    })
}
