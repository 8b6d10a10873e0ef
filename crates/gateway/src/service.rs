//! The owned-state service a platform adapter drives.

use std::sync::Arc;

use {anyhow::Result, tracing::debug};

use {
    spawnlock_config::SpawnlockConfig,
    spawnlock_locks::{
        Actor, AuditSink, ChannelGate, FileLockStore, LockError, LockKind, LockRegistry,
        LockService, LockTuning, Notice, TryLockOutcome,
    },
    spawnlock_pagination::{PageSpec, RenderedPage, SessionManager, parse_action},
    spawnlock_watchlist::{ListKind, Watchlist, matcher},
};

use crate::settings::SettingsStore;

/// Custom-id prefix of the unlock affordance on lock notices.
pub const UNLOCK_BUTTON_PREFIX: &str = "unlock_";

/// An inbound message from a (possibly) spawn channel.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub channel_id: String,
    /// The channel's display name; spawn channels are bare numbers.
    pub channel_name: String,
    pub author_id: String,
    pub content: String,
}

/// What happened to an inbound spawn message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// Not a qualifying message (wrong author or channel).
    Ignored,
    /// Qualifying message without a watched name.
    NoTrigger,
    /// The channel transitioned to Locked.
    Locked { trigger: String, kind: LockKind },
    /// A trigger was detected but the machine declined to act.
    Skipped(TryLockOutcome),
}

/// A button press forwarded by the platform adapter.
#[derive(Debug, Clone)]
pub struct ButtonPress {
    pub message_id: String,
    pub custom_id: String,
    pub actor: Actor,
}

/// What the adapter should do in response to a button press.
#[derive(Debug)]
pub enum ButtonResponse {
    /// Re-render the pressed message with this page.
    Page(RenderedPage),
    /// Delete the pressed message (fall back to stripping controls).
    DeleteMessage,
    /// Strip the message's controls and show this text.
    StripControls { text: String },
    /// Short-lived notice to the pressing user only.
    Notice { text: String },
    /// The channel was unlocked; post this confirmation.
    Unlocked { text: String },
    /// Unrecognized custom id; do nothing.
    None,
}

/// The coordinating service object. One per process; all handlers borrow it.
pub struct SpawnGuard {
    config: SpawnlockConfig,
    watchlist: Watchlist,
    locks: LockService,
    sessions: SessionManager,
    settings: SettingsStore,
}

impl SpawnGuard {
    /// Load all durable state and wire the state machine to its collaborators.
    pub async fn load(
        config: SpawnlockConfig,
        gate: Arc<dyn ChannelGate>,
        notice: Arc<dyn Notice>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        let data_dir = config.storage.resolve_data_dir();
        let watchlist = Watchlist::load(&data_dir).await?;
        let registry =
            LockRegistry::load(Arc::new(FileLockStore::in_dir(&data_dir))).await?;
        let settings = SettingsStore::load(&data_dir).await?;

        let tuning = LockTuning {
            cooldown: std::time::Duration::from_secs(config.locks.cooldown_secs),
            batch_size: config.locks.unlock_batch_size,
            batch_pause: std::time::Duration::from_millis(config.locks.unlock_batch_pause_ms),
            spawn_role_id: config.detector.spawn_role_id.clone(),
        };
        let locks = LockService::new(registry, gate, notice, audit, tuning);
        let sessions = SessionManager::new(std::time::Duration::from_secs(
            config.pagination.session_ttl_secs,
        ));

        Ok(Self {
            config,
            watchlist,
            locks,
            sessions,
            settings,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SpawnlockConfig {
        &self.config
    }

    #[must_use]
    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    #[must_use]
    pub fn locks(&self) -> &LockService {
        &self.locks
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Register the pagination session for a just-sent paged reply.
    pub fn open_session(
        &self,
        message_id: &str,
        owner_user_id: &str,
        spec: PageSpec,
    ) -> RenderedPage {
        self.sessions.open(message_id, owner_user_id, spec)
    }

    /// Run one inbound message through qualification, detection, and the
    /// lock state machine.
    pub async fn handle_spawn_message(
        &self,
        msg: &InboundMessage,
    ) -> Result<SpawnOutcome, LockError> {
        let detector = &self.config.detector;
        if !detector.namer_id.is_empty() && msg.author_id != detector.namer_id {
            return Ok(SpawnOutcome::Ignored);
        }
        if !matcher::is_spawn_channel(&msg.channel_name, detector.spawn_channel_max) {
            return Ok(SpawnOutcome::Ignored);
        }

        let private = self.watchlist.snapshot(ListKind::Private).await;
        let public = self.watchlist.snapshot(ListKind::Public).await;
        let Some(detection) = matcher::detect(&msg.content, &private, &public) else {
            return Ok(SpawnOutcome::NoTrigger);
        };

        let kind = match detection.kind {
            ListKind::Private => LockKind::Private,
            ListKind::Public => LockKind::Public,
        };
        match self.locks.try_lock(&msg.channel_id, kind, &detection.name).await? {
            TryLockOutcome::Locked => Ok(SpawnOutcome::Locked {
                trigger: detection.name,
                kind,
            }),
            outcome => {
                debug!(channel = %msg.channel_id, ?outcome, "lock attempt skipped");
                Ok(SpawnOutcome::Skipped(outcome))
            },
        }
    }

    /// Route a button press to the lock machine or the pagination manager.
    pub async fn handle_button(&self, press: &ButtonPress) -> ButtonResponse {
        if let Some(channel_id) = press.custom_id.strip_prefix(UNLOCK_BUTTON_PREFIX) {
            return self.handle_unlock_button(channel_id, &press.actor).await;
        }

        if let Some((_, action)) = parse_action(&press.custom_id) {
            return match self.sessions.handle(&press.message_id, action, &press.actor.user_id) {
                Ok(spawnlock_pagination::PageUpdate::Page(page)) => ButtonResponse::Page(page),
                Ok(spawnlock_pagination::PageUpdate::Closed) => ButtonResponse::DeleteMessage,
                Err(e @ spawnlock_pagination::PageError::Expired) => ButtonResponse::StripControls {
                    text: e.to_string(),
                },
                Err(e @ spawnlock_pagination::PageError::NotOwner) => ButtonResponse::Notice {
                    text: e.to_string(),
                },
            };
        }

        ButtonResponse::None
    }

    async fn handle_unlock_button(&self, channel_id: &str, actor: &Actor) -> ButtonResponse {
        match self.locks.unlock(channel_id, actor).await {
            Ok(record) => ButtonResponse::Unlocked {
                text: format!(
                    "Channel unlocked by {} (was \"{}\").",
                    actor.user_id, record.trigger
                ),
            },
            Err(LockError::NotLocked { .. }) => ButtonResponse::Notice {
                text: "This channel is not locked.".into(),
            },
            Err(LockError::Unauthorized) => ButtonResponse::Notice {
                text: "You are not allowed to release this lock.".into(),
            },
            Err(e) => ButtonResponse::Notice {
                text: format!("Could not unlock the channel: {e}"),
            },
        }
    }
}
