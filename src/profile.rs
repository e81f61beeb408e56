//! Operative profile: the persisted local identity and push counter
//!
//! The manager is the only writer of the record. Every mutation rewrites the
//! whole record through the injected [`ProfileStore`]. A failed write is
//! returned to the caller but the in-memory profile keeps the change; it
//! stays the source of truth for the session.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{ProfileStore, StorageError};
use crate::progression::Progression;
use crate::random::RandomSource;

/// Characters used in tactical IDs
pub const ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Shortest identifier accepted for recovery
pub const MIN_RECOVERY_ID_LEN: usize = 8;
/// Recovered profiles get a simulated count in `0..RECOVERED_PUSHES_MAX`
pub const RECOVERED_PUSHES_MAX: u32 = 500;
/// Recovered profiles are backdated by this much (ms)
pub const RECOVERED_BACKDATE_MS: i64 = 10_000_000;

/// Persisted identity record
///
/// Serialized as `{ id, codename, totalPushes, joinedAt }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperativeProfile {
    /// Tactical ID, `TMU-XXXX-XXXX`
    pub id: String,
    /// Display name
    pub codename: String,
    #[serde(rename = "totalPushes")]
    pub total_actions: u64,
    /// Unix timestamp (ms)
    #[serde(rename = "joinedAt")]
    pub created_at: i64,
}

impl OperativeProfile {
    /// Fresh profile with a random ID and codename
    pub fn generate(rng: &mut impl RandomSource, now_ms: i64) -> Self {
        Self {
            id: generate_tactical_id(rng),
            codename: generate_codename(rng),
            total_actions: 0,
            created_at: now_ms,
        }
    }

    pub fn progression(&self) -> Progression {
        Progression::for_count(self.total_actions)
    }
}

/// `TMU-` + 4 chars + `-` + 4 chars, drawn from `0-9A-Z`
pub fn generate_tactical_id(rng: &mut impl RandomSource) -> String {
    let chars: Vec<char> = (0..8)
        .map(|_| ID_CHARSET[rng.below(ID_CHARSET.len() as u32) as usize] as char)
        .collect();
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[4..].iter().collect();
    format!("TMU-{head}-{tail}")
}

/// Check the `TMU-XXXX-XXXX` shape
pub fn is_tactical_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 13
        && id.starts_with("TMU-")
        && bytes[8] == b'-'
        && bytes[4..8]
            .iter()
            .chain(&bytes[9..])
            .all(|b| ID_CHARSET.contains(b))
}

/// Default codename, `Agent_0000` to `Agent_9998`
pub fn generate_codename(rng: &mut impl RandomSource) -> String {
    format!("Agent_{:04}", rng.below(9999))
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("identifier {0:?} is too short to recover (need at least 8 characters)")]
    InvalidIdentifier(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the current profile and its store
pub struct ProfileManager<S, R> {
    store: S,
    rng: R,
    clock: fn() -> i64,
    profile: OperativeProfile,
    /// The stored record could not be read; routine writes would clobber it
    detached: bool,
}

impl<S: ProfileStore, R: RandomSource> ProfileManager<S, R> {
    /// Load the stored profile, or create and persist a fresh one
    ///
    /// Always yields a usable manager. The second value reports a storage
    /// problem hit while opening:
    /// - the first save of a new profile failed, or
    /// - the store could not be read at all. The manager then runs on an
    ///   in-memory profile and leaves the stored record alone until the
    ///   identity is explicitly replaced.
    ///
    /// Only a record that reads but fails to parse is overwritten.
    pub fn open(store: S, rng: R) -> (Self, Option<StorageError>) {
        Self::open_with_clock(store, rng, crate::platform::now_ms)
    }

    pub fn open_with_clock(
        store: S,
        mut rng: R,
        clock: fn() -> i64,
    ) -> (Self, Option<StorageError>) {
        let loaded = store.load();
        let mut manager = Self {
            profile: match &loaded {
                Ok(Some(profile)) => profile.clone(),
                _ => OperativeProfile::generate(&mut rng, clock()),
            },
            store,
            rng,
            clock,
            detached: false,
        };

        let problem = match loaded {
            Ok(Some(profile)) => {
                info!(
                    "Loaded profile {} ({} pushes)",
                    profile.id, profile.total_actions
                );
                None
            }
            Ok(None) => {
                info!("Created profile {}", manager.profile.id);
                manager.persist().err()
            }
            Err(e @ StorageError::InvalidProfileData { .. }) => {
                warn!("Discarding stored profile: {e}");
                info!("Created profile {}", manager.profile.id);
                manager.persist().err()
            }
            Err(e) => {
                warn!(
                    "Stored profile unreadable ({e}); running on {} without saving",
                    manager.profile.id
                );
                manager.detached = true;
                Some(e)
            }
        };
        (manager, problem)
    }

    /// Running on an in-memory profile because the store could not be read
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn profile(&self) -> &OperativeProfile {
        &self.profile
    }

    pub fn progression(&self) -> Progression {
        self.profile.progression()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Replace the current profile with a freshly generated one
    pub fn create_profile(&mut self) -> Result<&OperativeProfile, StorageError> {
        self.profile = OperativeProfile::generate(&mut self.rng, (self.clock)());
        self.detached = false;
        info!("Created profile {}", self.profile.id);
        self.persist()?;
        Ok(&self.profile)
    }

    /// Count one push. Proximity must already be confirmed by the caller.
    pub fn record_action(&mut self) -> Result<u64, StorageError> {
        self.profile.total_actions += 1;
        let total = self.profile.total_actions;
        info!("Push recorded for {} (total {total})", self.profile.id);
        self.persist()?;
        Ok(total)
    }

    /// Set a new codename. Returns `Ok(false)` when the trimmed name is empty
    /// and nothing changed.
    pub fn rename(&mut self, codename: &str) -> Result<bool, StorageError> {
        let codename = codename.trim();
        if codename.is_empty() {
            return Ok(false);
        }
        self.profile.codename = codename.to_string();
        self.persist()?;
        Ok(true)
    }

    /// Overwrite the local identity with one keyed by a user-supplied ID
    ///
    /// This is a local reset, not a merge: there is no remote store to
    /// recover from, so the count is simulated. The input is taken as typed:
    /// the length check and the codename suffix use it verbatim, only the
    /// stored id is upper-cased.
    pub fn replace_identity(&mut self, new_id: &str) -> Result<&OperativeProfile, ProfileError> {
        if new_id.chars().count() < MIN_RECOVERY_ID_LEN {
            return Err(ProfileError::InvalidIdentifier(new_id.to_string()));
        }

        let suffix: String = {
            let tail: Vec<char> = new_id.chars().rev().take(4).collect();
            tail.into_iter().rev().collect()
        };

        let previous = std::mem::replace(
            &mut self.profile,
            OperativeProfile {
                id: new_id.to_uppercase(),
                codename: format!("Recovered_{suffix}"),
                total_actions: self.rng.below(RECOVERED_PUSHES_MAX) as u64,
                created_at: (self.clock)() - RECOVERED_BACKDATE_MS,
            },
        );
        self.detached = false;
        info!("Replaced profile {} with {}", previous.id, self.profile.id);

        self.persist()?;
        Ok(&self.profile)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        if self.detached {
            return Err(StorageError::Unavailable(format!(
                "stored profile unreadable, {} kept in memory only",
                self.profile.id
            )));
        }
        self.store.save(&self.profile).inspect_err(|e| {
            warn!("Failed to save profile {}: {e}", self.profile.id);
        })
    }
}
