//! End-to-end session flows through the session runner.

mod common;

use common::{bot, bot_without_assistant};
use incident_intake::domain::models::intent::{CONFIRM_CANCEL, CONFIRM_SEND, MODE_ASSISTED, MODE_GUIDED};
use incident_intake::domain::models::{SessionState, UserId};
use incident_intake::services::intake_machine::{CANCELLED, IDLE_HINT};
use incident_intake::services::interview_assistant::UNAVAILABLE_REPLY;

const REPORTER: i64 = 100;

#[tokio::test]
async fn test_guided_report_reaches_every_admin() {
    let bot = bot(&[1, 2]);

    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_GUIDED).await;
    for answer in ["Lenin street 5", "2 vehicles", "Broken bumper", "No injuries", "+79001234567"] {
        bot.say(REPORTER, answer).await;
    }

    let session = bot.session(REPORTER).await.unwrap();
    assert_eq!(session.state, SessionState::Confirm);
    assert_eq!(session.report.damage.as_deref(), Some("Broken bumper"));
    assert!(bot.last_text(REPORTER).await.contains("Lenin street 5"));

    bot.say(REPORTER, CONFIRM_SEND).await;

    assert!(bot.session(REPORTER).await.is_none());
    assert!(bot.last_text(REPORTER).await.contains("has been sent"));
    for admin in [1, 2] {
        let received = bot.sender.texts_for(UserId(admin)).await;
        assert_eq!(received.len(), 1);
        assert!(received[0].contains("NEW INCIDENT REPORT"));
        assert!(received[0].contains("Lenin street 5"));
        assert!(received[0].contains("@user100"));
        assert!(received[0].contains("User ID: 100"));
    }
}

#[tokio::test]
async fn test_assisted_interview_extracts_and_validates_finish() {
    let bot = bot(&[1]);

    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_ASSISTED).await;
    bot.say(REPORTER, "авария на улице Ленина, никто не пострадал").await;

    let session = bot.session(REPORTER).await.unwrap();
    assert_eq!(session.state, SessionState::AiChat);
    assert_eq!(session.report.injuries.as_deref(), Some("No injuries"));
    assert_eq!(session.history.len(), 2);
    let reply = bot.last_text(REPORTER).await;
    assert!(reply.starts_with("✅ Saved: location, injuries"));

    bot.say(REPORTER, "/finish").await;
    assert!(bot.last_text(REPORTER).await.ends_with("Please provide: phone"));
    assert_eq!(
        bot.session(REPORTER).await.unwrap().state,
        SessionState::AiChat
    );

    bot.say(REPORTER, "мой телефон +79001234567").await;
    bot.say(REPORTER, "готово").await;
    assert_eq!(
        bot.session(REPORTER).await.unwrap().state,
        SessionState::Confirm
    );

    bot.say(REPORTER, CONFIRM_SEND).await;
    assert_eq!(bot.sender.texts_for(UserId(1)).await.len(), 1);
}

#[tokio::test]
async fn test_history_window_sent_to_backend() {
    let bot = bot(&[]);
    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_ASSISTED).await;
    for i in 0..8 {
        bot.say(REPORTER, &format!("message {i}")).await;
    }

    let requests = bot.generator.as_ref().unwrap().requests().await;
    assert_eq!(requests.len(), 8);
    let last = requests.last().unwrap();
    assert_eq!(last.history.len(), 10);
    assert_eq!(last.message, "message 7");
    assert!(last.system.contains("- location: not specified"));
}

#[tokio::test]
async fn test_missing_assistant_degrades_to_static_reply() {
    let bot = bot_without_assistant(&[]);
    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_ASSISTED).await;
    bot.say(REPORTER, "hello").await;

    assert!(bot.last_text(REPORTER).await.contains(UNAVAILABLE_REPLY));
    assert_eq!(
        bot.session(REPORTER).await.unwrap().state,
        SessionState::AiChat
    );
}

#[tokio::test]
async fn test_cancel_and_idle_hint() {
    let bot = bot(&[1]);

    bot.say(REPORTER, "hello?").await;
    assert_eq!(bot.last_text(REPORTER).await, IDLE_HINT);

    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_GUIDED).await;
    bot.say(REPORTER, "Lenin street").await;
    bot.say(REPORTER, "/cancel").await;

    assert_eq!(bot.last_text(REPORTER).await, CANCELLED);
    assert!(bot.session(REPORTER).await.is_none());
    assert!(bot.sender.texts_for(UserId(1)).await.is_empty());
}

#[tokio::test]
async fn test_start_discards_report_in_progress() {
    let bot = bot(&[]);
    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_GUIDED).await;
    bot.say(REPORTER, "Lenin street").await;

    bot.say(REPORTER, "/start").await;

    let session = bot.session(REPORTER).await.unwrap();
    assert_eq!(session.state, SessionState::ChoosingMode);
    assert!(session.report.location.is_none());
}

#[tokio::test]
async fn test_review_cancel_sends_nothing() {
    let bot = bot(&[1]);
    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_GUIDED).await;
    for answer in ["Lenin street", "3 vehicles", "none", "No injuries", "89001234567"] {
        bot.say(REPORTER, answer).await;
    }
    bot.say(REPORTER, CONFIRM_CANCEL).await;

    assert!(bot.session(REPORTER).await.is_none());
    assert!(bot.sender.texts_for(UserId(1)).await.is_empty());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let bot = bot(&[]);
    bot.say(200, "/start").await;
    bot.say(300, "/start").await;
    bot.say(200, MODE_GUIDED).await;
    bot.say(300, MODE_ASSISTED).await;

    assert_eq!(bot.session(200).await.unwrap().state, SessionState::Location);
    assert_eq!(bot.session(300).await.unwrap().state, SessionState::AiChat);
}

#[tokio::test]
async fn test_unreachable_admin_does_not_block_others() {
    let bot = bot(&[1, 2, 3]);
    bot.sender.make_unreachable(UserId(2)).await;

    bot.say(REPORTER, "/start").await;
    bot.say(REPORTER, MODE_GUIDED).await;
    for answer in ["Lenin street", "2 vehicles", "bumper", "No injuries", "+79001234567"] {
        bot.say(REPORTER, answer).await;
    }
    bot.say(REPORTER, CONFIRM_SEND).await;

    assert_eq!(bot.sender.texts_for(UserId(1)).await.len(), 1);
    assert_eq!(bot.sender.texts_for(UserId(3)).await.len(), 1);
    assert!(bot.last_text(REPORTER).await.contains("has been sent"));
}
