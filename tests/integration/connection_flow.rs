// =====
// TESTS: 5
// =====
//
// Connection driver and loopback service end to end: events flow from the
// driver task into the App the same way the TUI loop feeds them.

use crossterm::event::KeyCode;
use pretty_assertions::assert_eq;
use slick::Cli;
use slick::app::{App, create_app, handle_client_event, start_connections};
use slick::config::{Config, ConnectionConfig, ConnectionKind};
use slick::connection::ConnectionStatus;
use slick::error::AppError;
use slick::persist::SavedState;
use std::time::Duration;

use crate::helpers::{press, type_str};

fn config(echo: bool) -> Config {
    Config {
        connections: vec![
            ConnectionConfig {
                name: "work".into(),
                kind: ConnectionKind::Loopback,
                user: "sam".into(),
                channels: vec!["general".into(), "random".into()],
                echo,
            },
            ConnectionConfig {
                name: "home".into(),
                kind: ConnectionKind::Loopback,
                user: "sam".into(),
                channels: vec!["family".into()],
                echo: false,
            },
        ],
        time_format: "%H:%M".into(),
    }
}

/// Feed the next driver event to the app.
async fn pump(app: &mut App) {
    let event = tokio::time::timeout(Duration::from_secs(5), app.event_rx.recv())
        .await
        .expect("timed out waiting for a client event")
        .expect("event channel closed");
    handle_client_event(app, event);
}

async fn pump_until(app: &mut App, mut done: impl FnMut(&App) -> bool) {
    for _ in 0..20 {
        if done(app) {
            return;
        }
        pump(app).await;
    }
    panic!("condition not reached");
}

fn run_local<F: std::future::Future<Output = ()>>(future: F) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap();
    let local = tokio::task::LocalSet::new();
    rt.block_on(local.run_until(future));
}

#[test]
fn connections_come_up_with_first_channel_selected() {
    run_local(async {
        let config = config(false);
        let mut app = create_app(&config, SavedState::default());
        start_connections(&mut app, &config, &Cli::default()).unwrap();
        pump_until(&mut app, |app| {
            app.connections.iter().all(|c| c.status == ConnectionStatus::Connected)
                && app.visible_history_len() == 1
        })
        .await;

        let work = app.active_connection().unwrap();
        assert_eq!(work.name, "work");
        assert_eq!(work.selected_channel().map(|c| c.name.as_str()), Some("general"));
        let welcome = &work.message_history()[0];
        assert!(welcome.printable.plain_text().starts_with("Welcome @sam"));
        assert_eq!(app.connections[1].selected_channel().map(|c| c.name.as_str()), Some("family"));
        assert_eq!(app.active, Some(0));
    });
}

#[test]
fn cli_connection_flag_picks_active() {
    run_local(async {
        let config = config(false);
        let mut app = create_app(&config, SavedState::default());
        let cli = Cli { connection: Some("home".into()), ..Cli::default() };
        start_connections(&mut app, &config, &cli).unwrap();
        assert_eq!(app.active, Some(1));
    });
}

#[test]
fn unknown_cli_connection_is_an_app_error() {
    run_local(async {
        let config = config(false);
        let mut app = create_app(&config, SavedState::default());
        let cli = Cli { connection: Some("nope".into()), ..Cli::default() };
        let err = start_connections(&mut app, &config, &cli).unwrap_err();
        assert_eq!(err, AppError::UnknownConnection("nope".into()));
    });
}

#[test]
fn saved_state_restores_channel_and_connection() {
    run_local(async {
        let config = config(false);
        let mut saved = SavedState { active_connection: Some("work".into()), ..Default::default() };
        saved.selected_channels.insert("work".into(), "random".into());
        let mut app = create_app(&config, saved);
        start_connections(&mut app, &config, &Cli::default()).unwrap();
        pump_until(&mut app, |app| {
            app.active_connection().is_ok_and(|c| c.selected_channel().is_some())
        })
        .await;
        assert_eq!(
            app.active_connection().unwrap().selected_channel().map(|c| c.name.as_str()),
            Some("random")
        );
    });
}

#[test]
fn sent_message_comes_back_and_bot_replies() {
    run_local(async {
        let config = config(true);
        let mut app = create_app(&config, SavedState::default());
        start_connections(&mut app, &config, &Cli::default()).unwrap();
        pump_until(&mut app, |app| app.visible_history_len() == 1).await;

        press(&mut app, KeyCode::Char('w'));
        type_str(&mut app, "ping *now*");
        press(&mut app, KeyCode::Enter);

        pump_until(&mut app, |app| app.visible_history_len() == 3).await;
        let history = app.active_connection().unwrap().message_history();
        assert_eq!(history[1].sender.as_ref().map(|u| u.name.as_str()), Some("sam"));
        assert_eq!(history[1].printable.plain_text(), "ping now");
        assert_eq!(history[2].sender.as_ref().map(|u| u.name.as_str()), Some("echo"));
        assert_eq!(history[2].printable.plain_text(), "@sam said: ping now");
    });
}
