//! Prefix-command parsing and routing.

use {
    spawnlock_commands::{
        CommandReply, help, listing, lock_admin, locks_listing, status, watchlist_admin,
    },
    spawnlock_locks::Actor,
    spawnlock_watchlist::matcher,
    tracing::warn,
};

use crate::service::SpawnGuard;

/// Text commands start with this prefix.
pub const COMMAND_PREFIX: &str = "!";

/// Where a command was issued and by whom.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub channel_id: String,
    pub channel_name: String,
    pub guild_id: Option<String>,
    pub actor: Actor,
}

impl SpawnGuard {
    /// Route one prefixed message to its command handler.
    ///
    /// Returns `None` for non-commands and unknown commands, which are
    /// silently ignored like any other chat message.
    pub async fn dispatch_command(
        &self,
        ctx: &CommandContext,
        content: &str,
    ) -> Option<CommandReply> {
        let rest = content.strip_prefix(COMMAND_PREFIX)?;
        let mut parts = rest.trim().split_whitespace();
        let command = parts.next()?.to_lowercase();
        let args: Vec<&str> = parts.collect();
        let pagination = &self.config().pagination;

        let reply = match command.as_str() {
            "add" => {
                let kind = args.first().copied().unwrap_or("");
                watchlist_admin::add(self.watchlist(), &ctx.actor, kind, &args[1.min(args.len())..].join(" "))
                    .await
            },
            "remove" => {
                let kind = args.first().copied().unwrap_or("");
                watchlist_admin::remove(
                    self.watchlist(),
                    &ctx.actor,
                    kind,
                    &args[1.min(args.len())..].join(" "),
                )
                .await
            },
            "list" => {
                listing::list(self.watchlist(), args.first().copied(), pagination.list_page_size)
                    .await
            },
            "search" => {
                listing::search(self.watchlist(), &args.join(" "), pagination.list_page_size).await
            },
            "locked" => {
                locks_listing::locked(self.locks().registry(), pagination.lock_page_size)
            },
            "find" => locks_listing::locked_by_name(
                self.locks().registry(),
                &args.join(" "),
                pagination.lock_page_size,
            ),
            "ranking" => {
                locks_listing::ranking(self.locks().registry(), pagination.ranking_page_size)
            },
            "lock" => {
                if !self.in_spawn_channel(ctx) {
                    return Some(self.spawn_channel_only());
                }
                let label = args.join(" ");
                let label = (!label.is_empty()).then_some(label.as_str());
                lock_admin::lock(self.locks(), &ctx.actor, &ctx.channel_id, label).await
            },
            "unlock" => {
                if args.first().copied() == Some("all") {
                    lock_admin::unlock_all(self.locks(), &ctx.actor, &args[1..].join(" ")).await
                } else {
                    if !self.in_spawn_channel(ctx) {
                        return Some(self.spawn_channel_only());
                    }
                    lock_admin::unlock(self.locks(), &ctx.actor, &ctx.channel_id).await
                }
            },
            "role" => self.set_mention_role(ctx, &args).await,
            "log" => self.set_log_channel(ctx, &args).await,
            "status" => {
                let settings = self.settings().snapshot().await;
                status::status(
                    self.watchlist(),
                    self.locks().registry(),
                    self.config().detector.spawn_channel_max,
                    status::SettingsSummary {
                        log_channel_set: settings.log_channel.is_some(),
                        mention_role_count: settings.mention_roles.len(),
                    },
                )
                .await
            },
            "help" => help::help(),
            _ => return None,
        };
        Some(reply)
    }

    fn in_spawn_channel(&self, ctx: &CommandContext) -> bool {
        matcher::is_spawn_channel(&ctx.channel_name, self.config().detector.spawn_channel_max)
    }

    fn spawn_channel_only(&self) -> CommandReply {
        CommandReply::text(format!(
            "This command only works in spawn channels (1..{}).",
            self.config().detector.spawn_channel_max
        ))
    }

    async fn set_mention_role(&self, ctx: &CommandContext, args: &[&str]) -> CommandReply {
        if !ctx.actor.manage_channels {
            return CommandReply::text("Changing settings requires channel-management authority.");
        }
        let Some(guild_id) = &ctx.guild_id else {
            return CommandReply::text("This command only works inside a guild.");
        };
        let result = match args.first().copied() {
            None | Some("clear") => {
                let res = self.settings().clear_mention_role(guild_id).await;
                res.map(|()| "Mention role cleared for this guild.".to_string())
            },
            Some(role_id) => {
                let res = self.settings().set_mention_role(guild_id, role_id).await;
                res.map(|()| format!("Mention role set to {role_id} for this guild."))
            },
        };
        match result {
            Ok(text) => CommandReply::text(text),
            Err(e) => {
                warn!(error = %e, "failed to update mention role");
                CommandReply::text("Could not save the settings; see the logs.")
            },
        }
    }

    async fn set_log_channel(&self, ctx: &CommandContext, args: &[&str]) -> CommandReply {
        if !ctx.actor.manage_channels {
            return CommandReply::text("Changing settings requires channel-management authority.");
        }
        let result = match args.first().copied() {
            None | Some("clear") => {
                let res = self.settings().set_log_channel(None).await;
                res.map(|()| "Log channel cleared.".to_string())
            },
            Some(channel_id) => {
                let res = self
                    .settings()
                    .set_log_channel(Some(channel_id.to_string()))
                    .await;
                res.map(|()| format!("Log channel set to {channel_id}."))
            },
        };
        match result {
            Ok(text) => CommandReply::text(text),
            Err(e) => {
                warn!(error = %e, "failed to update log channel");
                CommandReply::text("Could not save the settings; see the logs.")
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use {
        spawnlock_config::SpawnlockConfig,
        spawnlock_locks::{
            TracingAudit,
            gate::{NoopGate, NoopNotice},
        },
        tempfile::TempDir,
    };

    use super::*;

    async fn guard(tmp: &TempDir) -> SpawnGuard {
        let mut config = SpawnlockConfig::default();
        config.storage.data_dir = Some(tmp.path().to_path_buf());
        config.locks.unlock_batch_pause_ms = 0;
        SpawnGuard::load(
            config,
            Arc::new(NoopGate),
            Arc::new(NoopNotice),
            Arc::new(TracingAudit),
        )
        .await
        .unwrap()
    }

    fn ctx(channel_name: &str, actor: Actor) -> CommandContext {
        CommandContext {
            channel_id: format!("chan-{channel_name}"),
            channel_name: channel_name.to_string(),
            guild_id: Some("guild-1".into()),
            actor,
        }
    }

    #[tokio::test]
    async fn non_commands_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let ctx = ctx("7", Actor::staff("s"));

        assert!(guard.dispatch_command(&ctx, "hello there").await.is_none());
        assert!(guard.dispatch_command(&ctx, "!nosuchcommand").await.is_none());
    }

    #[tokio::test]
    async fn add_then_list_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let ctx = ctx("7", Actor::staff("s"));

        let reply = guard
            .dispatch_command(&ctx, "!add public pikachu, eevee")
            .await
            .unwrap();
        assert!(reply.text.contains("Added to the public list"));

        let reply = guard.dispatch_command(&ctx, "!list").await.unwrap();
        assert!(reply.text.contains("pikachu (public)"));
        assert!(reply.page.is_some());
    }

    #[tokio::test]
    async fn lock_command_requires_spawn_channel() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let ctx = ctx("general", Actor::staff("s"));

        let reply = guard.dispatch_command(&ctx, "!lock").await.unwrap();
        assert!(reply.text.contains("only works in spawn channels"));
        assert!(guard.locks().registry().is_empty());
    }

    #[tokio::test]
    async fn manual_lock_and_unlock_via_commands() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let ctx = ctx("7", Actor::staff("s"));

        let reply = guard.dispatch_command(&ctx, "!lock cleanup").await.unwrap();
        assert!(reply.text.contains("locked for \"cleanup\""));
        assert!(guard.locks().registry().contains("chan-7"));

        let reply = guard.dispatch_command(&ctx, "!unlock").await.unwrap();
        assert!(reply.text.contains("unlocked"));
        assert!(guard.locks().registry().is_empty());
    }

    #[tokio::test]
    async fn unlock_all_via_command() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let staff = Actor::staff("s");

        for ch in ["7", "8", "9"] {
            guard
                .dispatch_command(&ctx(ch, staff.clone()), "!lock mew")
                .await
                .unwrap();
        }

        let reply = guard
            .dispatch_command(&ctx("7", staff), "!unlock all mew")
            .await
            .unwrap();
        assert!(reply.text.contains("Unlocked 3 channel(s)"));
        assert!(guard.locks().registry().is_empty());
    }

    #[tokio::test]
    async fn role_and_log_settings_show_in_status() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let ctx = ctx("7", Actor::staff("s"));

        guard.dispatch_command(&ctx, "!role role-9").await.unwrap();
        guard.dispatch_command(&ctx, "!log chan-log").await.unwrap();

        let reply = guard.dispatch_command(&ctx, "!status").await.unwrap();
        assert!(reply.text.contains("Log channel: configured"));
        assert!(reply.text.contains("Mention roles: 1 configured"));
    }

    #[tokio::test]
    async fn settings_require_authority() {
        let tmp = TempDir::new().unwrap();
        let guard = guard(&tmp).await;
        let ctx = ctx("7", Actor::member("u", true));

        let reply = guard.dispatch_command(&ctx, "!role role-9").await.unwrap();
        assert!(reply.text.contains("requires channel-management authority"));
    }
}
