//! Request context carrying the authenticated subject.

use chrono::{DateTime, Utc};
use serde::Serialize;

use orghub_auth::Subject;
use orghub_core::types::SubjectId;

/// Context for the current authenticated request.
///
/// Built by the API layer from a resolved session and passed into service
/// methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated subject's id.
    pub user_id: SubjectId,
    /// Primary email reported by the identity provider.
    pub email: Option<String>,
    /// Display name reported by the identity provider.
    pub display_name: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a resolved subject.
    pub fn new(subject: Subject) -> Self {
        Self {
            user_id: subject.id,
            email: subject.email,
            display_name: subject.display_name,
            request_time: Utc::now(),
        }
    }

    /// Context for a bare subject id; used where only the id is known.
    pub fn for_user(user_id: SubjectId) -> Self {
        Self {
            user_id,
            email: None,
            display_name: None,
            request_time: Utc::now(),
        }
    }
}
