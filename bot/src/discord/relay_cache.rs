use crate::errors::{Error, Result};

use log::debug;
use serenity::model::webhook::Webhook;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Webhooks seen while resolving relays, keyed by webhook id. Executing a
/// webhook needs its token, which only the full object carries.
#[derive(Debug, Default)]
pub struct RelayCache {
    webhooks: RwLock<BTreeMap<u64, Webhook>>,
}

impl RelayCache {
    pub fn get(&self, id: u64) -> Result<Option<Webhook>> {
        match self.webhooks.read() {
            Ok(cache) => Ok(cache.get(&id).cloned()),
            Err(_why) => Err(Error::ConstStr("Failed to acquire read on relay cache")),
        }
    }

    pub fn insert(&self, webhook: &Webhook) -> Result<()> {
        match self.webhooks.write() {
            Ok(mut writable_cache) => {
                if writable_cache
                    .insert(webhook.id.get(), webhook.clone())
                    .is_none()
                {
                    debug!("cached webhook {}", webhook.id);
                }
                Ok(())
            }
            Err(_why) => Err(Error::ConstStr("Failed to acquire write lock on relay cache")),
        }
    }
}
