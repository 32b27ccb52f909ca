use std::sync::Arc;

use tracing::{debug, warn};

use uploader_config::ConfigStore;

use crate::transport::{Transport, UserId};

/// Reduce a configured group reference (`@name`, `https://t.me/name/`) to its
/// bare public username. Returns an empty string if nothing usable is left.
pub fn normalize_group(raw: &str) -> String {
    let group = raw.trim();
    let group = group.strip_prefix('@').unwrap_or(group);
    let group = group.strip_prefix("https://t.me/").unwrap_or(group);
    let group = group.strip_prefix("http://t.me/").unwrap_or(group);
    let group = group.strip_suffix('/').unwrap_or(group);
    group.trim().to_string()
}

/// Checks that a user belongs to every configured gating group.
pub struct MembershipGate {
    transport: Arc<dyn Transport>,
    config: Arc<ConfigStore>,
}

impl MembershipGate {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<ConfigStore>) -> Self {
        Self { transport, config }
    }

    /// Groups are checked in order; the first failure or error ends the check.
    /// An empty group list lets everyone through.
    pub async fn is_member(&self, user_id: UserId) -> bool {
        let groups = self.config.read().sponsored_channels;
        for raw in &groups {
            let group = normalize_group(raw);
            if group.is_empty() {
                warn!(group = %raw, "gating group has no usable username");
                return false;
            }
            match self.transport.member_status(&group, user_id).await {
                Ok(status) if status.is_passing() => {},
                Ok(status) => {
                    debug!(user_id, %group, ?status, "user is not a member");
                    return false;
                },
                Err(e) => {
                    warn!(user_id, %group, error = %e, "membership check failed");
                    return false;
                },
            }
        }
        true
    }
}
