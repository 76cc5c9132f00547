// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: a whole week against a SQLite file.
//!
//! Each test gets its own temp database, the mock channel and the real
//! engine and dialog. Tests are independent and order-insensitive.

use std::sync::Arc;

use pairup_config::model::{PairupConfig, StorageConfig};
use pairup_core::{
    ChannelAdapter, DeliveryErrorKind, MeetingRepository, ParticipantId, ParticipantRepository,
    Status, StorageAdapter,
};
use pairup_dialog::Dialog;
use pairup_engine::{CycleHooks, HookKind, HookReport};
use pairup_storage::SqliteStorage;
use pairup_test_utils::{MockChannel, SentKind};
use tempfile::TempDir;

const ADMIN: i64 = 1;

struct Bot {
    _dir: TempDir,
    path: String,
    storage: Arc<SqliteStorage>,
    channel: MockChannel,
    hooks: Arc<CycleHooks>,
    dialog: Dialog,
}

impl Bot {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairup.db").to_string_lossy().into_owned();
        let (storage, channel, hooks, dialog) = Self::wire(&path).await;
        Self {
            _dir: dir,
            path,
            storage,
            channel,
            hooks,
            dialog,
        }
    }

    async fn wire(path: &str) -> (Arc<SqliteStorage>, MockChannel, Arc<CycleHooks>, Dialog) {
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }));
        storage.initialize().await.unwrap();
        let channel = MockChannel::new();
        let hooks = Arc::new(CycleHooks::new(
            storage.clone(),
            Arc::new(channel.clone()),
            &PairupConfig::default(),
        ));
        let dialog = Dialog::new(
            storage.clone(),
            Arc::new(channel.clone()),
            hooks.clone(),
            Some(ADMIN),
        );
        (storage, channel, hooks, dialog)
    }

    /// Closes the database and opens it again with a fresh engine.
    async fn restart(&mut self) {
        self.storage.close().await.unwrap();
        let (storage, channel, hooks, dialog) = Self::wire(&self.path).await;
        self.storage = storage;
        self.channel = channel;
        self.hooks = hooks;
        self.dialog = dialog;
    }

    async fn say(&self, sender: i64, text: &str) {
        self.channel.inject_text(sender, text).await;
        let update = self.channel.receive().await.unwrap();
        self.dialog.handle(update).await.unwrap();
    }

    async fn register(&self, id: i64, level: &str) {
        for text in ["/start", &format!("User {id}"), level, "Kazan", "Hello"] {
            self.say(id, text).await;
        }
    }

    async fn status(&self, id: i64) -> Status {
        self.storage
            .get_participant(ParticipantId(id))
            .await
            .unwrap()
            .unwrap()
            .status
    }
}

#[tokio::test]
async fn a_full_week_for_two_participants() {
    let bot = Bot::start().await;
    bot.register(10, "B1").await;
    bot.register(11, "b1").await;
    assert_eq!(bot.status(10).await, Status::Ready);
    assert_eq!(bot.status(11).await, Status::Ready);

    // Monday: match.
    let HookReport::Match(report) = bot.hooks.run(HookKind::Match).await.unwrap() else {
        panic!("wrong report");
    };
    assert_eq!(report.meetings, 1);
    assert!(
        bot.storage
            .exists_meeting(ParticipantId(10), ParticipantId(11))
            .await
            .unwrap()
    );
    let meeting = bot
        .storage
        .latest_meeting_for(ParticipantId(11))
        .await
        .unwrap()
        .unwrap();
    assert!(meeting.topic_id.is_some(), "seeded topics are attached");
    for (id, partner) in [(10, 11), (11, 10)] {
        let invitations: Vec<_> = bot
            .channel
            .sent_to(id)
            .await
            .into_iter()
            .filter(|s| matches!(s.kind, SentKind::Invitation { .. }))
            .collect();
        assert_eq!(invitations.len(), 1);
        assert!(matches!(
            invitations[0].kind,
            SentKind::Invitation { partner: p, .. } if p == ParticipantId(partner)
        ));
    }

    // Wednesday: rematch offer, one keeps the partner, one asks for another.
    bot.hooks.run(HookKind::Rematch).await.unwrap();
    assert_eq!(bot.status(10).await, Status::SuggestRematch);
    bot.say(10, "/skip_rematch").await;
    bot.say(11, "/request_rematch").await;
    assert_eq!(bot.status(10).await, Status::Matched);
    assert_eq!(bot.status(11).await, Status::Ready);

    // Saturday: invitations. Only the MATCHED participant is asked.
    let report = bot.hooks.run(HookKind::Invite).await.unwrap();
    assert_eq!(
        report.to_string(),
        "invite: eligible=1 delivered=1 deactivated=0 transient_failures=0"
    );
    assert_eq!(bot.status(10).await, Status::Asked);
    bot.say(10, "/ready").await;
    assert_eq!(bot.status(10).await, Status::Ready);

    // Next Monday: the only possible pair has met before, so it is forced.
    let HookReport::Match(report) = bot.hooks.run(HookKind::Match).await.unwrap() else {
        panic!("wrong report");
    };
    assert_eq!(report.meetings, 1);
    assert_eq!(report.forced_repeats, 1);
}

#[tokio::test]
async fn blocked_participant_stays_deactivated_across_restart() {
    let mut bot = Bot::start().await;
    bot.register(20, "A2").await;
    bot.register(21, "A2").await;
    bot.channel.fail_address(21, DeliveryErrorKind::Forbidden).await;

    let HookReport::Match(report) = bot.hooks.run(HookKind::Match).await.unwrap() else {
        panic!("wrong report");
    };
    assert_eq!(report.meetings, 0);
    assert_eq!(report.deactivated, 1);
    assert_eq!(report.unpaired, 1);
    assert_eq!(bot.status(20).await, Status::Unpaired);

    bot.restart().await;

    let p = bot
        .storage
        .get_participant(ParticipantId(21))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(p.status, Status::Deactivated);
    assert!(!p.active);
    assert!(
        !bot.storage
            .exists_meeting(ParticipantId(20), ParticipantId(21))
            .await
            .unwrap()
    );

    // Reinvited after restart; the deactivated participant is never asked.
    bot.hooks.run(HookKind::Invite).await.unwrap();
    assert_eq!(bot.status(20).await, Status::Asked);
    assert!(bot.channel.attempts().await.iter().all(|a| a.0 != 21));
}

#[tokio::test]
async fn admin_trigger_runs_a_cycle_through_the_dialog() {
    let bot = Bot::start().await;
    bot.register(30, "C1").await;
    bot.register(31, "C2").await;
    bot.register(32, "C1").await;

    bot.say(ADMIN, "/match").await;

    let counts = bot.storage.count_by_status().await.unwrap();
    assert_eq!(counts.get(&Status::Matched), Some(&2));
    assert_eq!(counts.get(&Status::Unpaired), Some(&1));
    let reply = bot.channel.sent_to(ADMIN).await.pop().unwrap();
    assert!(reply.text().unwrap().starts_with("match: eligible=3 meetings=1"));
}

#[tokio::test]
async fn stalled_registration_gets_one_reminder() {
    let bot = Bot::start().await;
    bot.say(40, "/start").await;

    let mut p = bot
        .storage
        .get_participant(ParticipantId(40))
        .await
        .unwrap()
        .unwrap();
    p.reg_date -= chrono::Duration::hours(2);
    bot.storage.save_participant(&p).await.unwrap();

    let first = bot.hooks.run(HookKind::Remind).await.unwrap();
    let second = bot.hooks.run(HookKind::Remind).await.unwrap();

    assert!(first.to_string().contains("delivered=1"));
    assert!(second.to_string().contains("eligible=0"));
    let last = bot.channel.sent_to(40).await.pop().unwrap();
    assert_eq!(last.commands(), vec!["/edit_profile"]);
}
