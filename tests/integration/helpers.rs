use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use slick::app::{App, handle_client_event, keys};
use slick::connection::{
    Channel, ClientEvent, ConnectionCommand, ConnectionHandle, RawMessage, Session, User,
};
use tokio::sync::mpsc;

/// Build a minimal `App` for integration testing.
/// No connection drivers, no TUI -- just state.
pub fn test_app() -> App {
    App::test_default()
}

/// An app with one connection "work" that has reported `Connected` with
/// #general and #random. Returns the receiving end of its command queue.
pub fn connected_app() -> (App, mpsc::UnboundedReceiver<ConnectionCommand>) {
    let mut app = test_app();
    let rx = add_connection(&mut app, "work", &["general", "random"]);
    (app, rx)
}

pub fn add_connection(
    app: &mut App,
    name: &str,
    channels: &[&str],
) -> mpsc::UnboundedReceiver<ConnectionCommand> {
    let index = app.connections.len();
    let (tx, rx) = mpsc::unbounded_channel();
    app.add_connection(ConnectionHandle::new(index, name, tx));
    let session = Session {
        self_user: User { id: "U0".into(), name: "me".into() },
        channels: channels
            .iter()
            .enumerate()
            .map(|(i, c)| Channel { id: format!("C{i}"), name: (*c).to_owned() })
            .collect(),
        users: vec![User { id: "U1".into(), name: "ryan".into() }],
    };
    send_client_event(app, ClientEvent::Connected { connection: index, session });
    rx
}

/// Helper: send a connection event into the app's event handling pipeline.
pub fn send_client_event(app: &mut App, event: ClientEvent) {
    handle_client_event(app, event);
}

pub fn press(app: &mut App, code: KeyCode) {
    keys::dispatch_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

pub fn ctrl(app: &mut App, c: char) {
    keys::dispatch_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

pub fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

pub fn raw(channel: &str, user: &str, text: &str) -> RawMessage {
    RawMessage {
        id: format!("{channel}-{text}"),
        channel_id: channel.into(),
        user_id: Some(user.into()),
        text: text.into(),
        sent_at: chrono::Local::now(),
    }
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<ConnectionCommand>) -> Vec<ConnectionCommand> {
    let mut out = Vec::new();
    while let Ok(command) = rx.try_recv() {
        out.push(command);
    }
    out
}
