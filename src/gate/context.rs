use std::collections::HashMap;

use crate::services::auth::Claims;

/// Per-request authentication data, stored in the request extensions.
///
/// Maps a field name (the gate's configured claims field) to the decoded
/// claims. A request that passed the gate has exactly one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthData {
    fields: HashMap<String, Claims>,
}

impl AuthData {
    pub fn get(&self, field: &str) -> Option<&Claims> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn insert(&mut self, field: &str, claims: Claims) {
        self.fields.insert(field.to_owned(), claims);
    }
}
