//! Administrator management through the chat sub-flow.

mod common;

use common::bot;
use incident_intake::domain::models::intent::{ADMIN_ADD, ADMIN_LIST, ADMIN_REMOVE, MODE_ADMIN};
use incident_intake::domain::models::{AdminRoster, SessionState, UserId};
use incident_intake::domain::ports::RosterRepository;
use incident_intake::services::admin_flow::ACCESS_DENIED;

const ADMIN: i64 = 42;

async fn open_admin_menu(bot: &common::TestBot, id: i64) {
    bot.say(id, "/start").await;
    bot.say(id, MODE_ADMIN).await;
}

#[tokio::test]
async fn test_admin_adds_operator() {
    let bot = bot(&[ADMIN]);
    open_admin_menu(&bot, ADMIN).await;
    assert_eq!(bot.session(ADMIN).await.unwrap().state, SessionState::AdminMenu);
    assert!(bot.last_text(ADMIN).await.contains("Current administrators (1)"));

    bot.say(ADMIN, ADMIN_ADD).await;
    bot.say(ADMIN, "not-a-number").await;
    assert_eq!(bot.session(ADMIN).await.unwrap().state, SessionState::AdminAdd);
    assert!(bot.last_text(ADMIN).await.contains("Invalid ID format"));

    bot.say(ADMIN, "7").await;
    assert_eq!(bot.session(ADMIN).await.unwrap().state, SessionState::AdminMenu);
    assert_eq!(bot.roster.snapshot().await.ids(), &[UserId(ADMIN), UserId(7)]);
    assert!(bot.last_text(ADMIN).await.contains("Current administrators (2)"));
}

#[tokio::test]
async fn test_non_admin_cannot_enter_admin_path() {
    let bot = bot(&[ADMIN]);
    open_admin_menu(&bot, 5).await;

    let texts = bot.sender.texts_for(UserId(5)).await;
    assert!(texts.iter().any(|t| t == ACCESS_DENIED));
    assert_eq!(bot.session(5).await.unwrap().state, SessionState::ChoosingMode);
}

#[tokio::test]
async fn test_sole_admin_cannot_remove_self() {
    let bot = bot(&[ADMIN]);
    open_admin_menu(&bot, ADMIN).await;
    bot.say(ADMIN, ADMIN_REMOVE).await;
    bot.say(ADMIN, "42").await;

    let texts = bot.sender.texts_for(UserId(ADMIN)).await;
    assert!(texts.iter().any(|t| t.contains("last administrator")));
    assert_eq!(bot.roster.snapshot().await.ids(), &[UserId(ADMIN)]);
}

#[tokio::test]
async fn test_admin_removes_self_when_others_remain() {
    let bot = bot(&[ADMIN, 7]);
    open_admin_menu(&bot, ADMIN).await;
    bot.say(ADMIN, ADMIN_REMOVE).await;
    bot.say(ADMIN, "42").await;

    assert_eq!(bot.roster.snapshot().await.ids(), &[UserId(7)]);
    assert_eq!(bot.session(ADMIN).await.unwrap().state, SessionState::ChoosingMode);
    assert_eq!(bot.last_text(ADMIN).await, "Choose how you want to proceed:");
}

#[tokio::test]
async fn test_revocation_applies_on_next_action() {
    let bot = bot(&[ADMIN, 7]);
    open_admin_menu(&bot, ADMIN).await;

    // Another administrator removes 42 from a different session.
    bot.roster
        .save(&AdminRoster::from_ids([UserId(7)]))
        .await
        .unwrap();

    bot.say(ADMIN, ADMIN_LIST).await;
    let texts = bot.sender.texts_for(UserId(ADMIN)).await;
    assert!(texts.iter().any(|t| t == ACCESS_DENIED));
    assert_eq!(bot.session(ADMIN).await.unwrap().state, SessionState::ChoosingMode);
}

#[tokio::test]
async fn test_failed_save_is_reported_and_not_committed() {
    let bot = bot(&[ADMIN]);
    open_admin_menu(&bot, ADMIN).await;
    bot.say(ADMIN, ADMIN_ADD).await;
    bot.roster.set_fail_saves(true);
    bot.say(ADMIN, "7").await;

    let texts = bot.sender.texts_for(UserId(ADMIN)).await;
    assert!(texts.iter().any(|t| t.contains("Failed to save")));
    assert_eq!(bot.roster.snapshot().await.ids(), &[UserId(ADMIN)]);
}

#[tokio::test]
async fn test_new_admin_receives_next_report() {
    use incident_intake::domain::models::intent::{CONFIRM_SEND, MODE_GUIDED};

    let bot = bot(&[ADMIN]);
    open_admin_menu(&bot, ADMIN).await;
    bot.say(ADMIN, ADMIN_ADD).await;
    bot.say(ADMIN, "7").await;

    bot.say(100, "/start").await;
    bot.say(100, MODE_GUIDED).await;
    for answer in ["Lenin street", "2 vehicles", "bumper", "No injuries", "+79001234567"] {
        bot.say(100, answer).await;
    }
    bot.say(100, CONFIRM_SEND).await;

    assert_eq!(bot.sender.texts_for(UserId(7)).await.len(), 1);
}
