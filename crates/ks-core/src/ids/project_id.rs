use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Identifier of a project, owned by the alignment store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl_id!(ProjectId);
