//! Seed Defaults Use Case
//!
//! Create every known setting that does not exist yet. Existing entries,
//! active or not, are left untouched so admin changes survive restarts.

use kernel::id::UserId;

use crate::domain::entity::ConfigEntry;
use crate::domain::repository::ConfigEntryRepository;
use crate::domain::settings::known_defaults;
use crate::domain::value_objects::ConfigKey;
use crate::error::ConfigResult;

/// Insert missing defaults on behalf of `system_actor`. Returns how many were created.
pub async fn seed_defaults<R>(repo: &R, system_actor: UserId) -> ConfigResult<usize>
where
    R: ConfigEntryRepository,
{
    let mut created = 0;

    for default in known_defaults() {
        let entry = ConfigEntry::new(ConfigKey::new(default.key)?, default.value, system_actor)
            .with_description(default.description)
            .with_category(default.category);

        if repo.insert_if_absent(&entry).await? {
            tracing::debug!(key = default.key, "Seeded config default");
            created += 1;
        }
    }

    tracing::info!(created, system_actor = %system_actor, "Config defaults seeded");

    Ok(created)
}
