//! Command handlers.

use arbitre_live::api::ApiClient;
use arbitre_live::channel::{ChannelEvent, ChannelTarget};
use arbitre_live::config::ClientConfig;
use arbitre_live::notification::{NotificationBus, NotificationKind};
use arbitre_live::prelude::*;
use arbitre_live::session::ResultSession;
use arbitre_live::state::AppState;
use arbitre_live::view::ResultView;
use tracing::{info, warn};

pub struct WatchOptions {
    pub exercise: i64,
    pub user: Option<i64>,
    pub grade: Option<f64>,
    pub until_done: bool,
    pub reveal: bool,
}

pub fn handle_login(state: &mut AppState, token: String, username: Option<String>) -> Result<()> {
    state.auth.access_token = Some(token);
    state.auth.username = username;
    state.save_auth()?;
    state
        .notifications
        .push("Access token saved", NotificationKind::Success);
    Ok(())
}

pub fn handle_logout(state: &mut AppState) -> Result<()> {
    state.sign_out()?;
    state
        .notifications
        .push("Logged out", NotificationKind::Info);
    Ok(())
}

pub fn handle_visited(state: &AppState) -> Result<()> {
    match state.last_visited.exercise_id {
        Some(exercise_id) => println!("Last visited exercise: {exercise_id}"),
        None => println!("No exercise visited yet"),
    }
    Ok(())
}

pub async fn handle_preview(
    config: &ClientConfig,
    state: &AppState,
    token: Option<String>,
    file: &str,
) -> Result<()> {
    let token = token.as_deref().or(state.access_token());
    let client = ApiClient::new(&config.api_base_url(), token)?;
    let content = client.fetch_file(file).await?;

    let width = content.lines().count().max(1).to_string().len();
    for (number, line) in content.lines().enumerate() {
        println!("{:>width$} | {line}", number + 1);
    }
    Ok(())
}

pub async fn handle_watch(
    config: &ClientConfig,
    state: &mut AppState,
    token: Option<String>,
    options: WatchOptions,
) -> Result<()> {
    let credential = token.or_else(|| state.access_token().map(String::from));
    state.visit_exercise(options.exercise)?;

    let grade = match (options.grade, credential.as_deref()) {
        (Some(grade), _) => Some(grade),
        (None, Some(token)) => fetch_exercise_grade(config, token, options.exercise).await,
        (None, None) => None,
    };

    let target = match options.user {
        Some(user_id) => ChannelTarget::of_user(options.exercise, user_id),
        None => ChannelTarget::own(options.exercise),
    };

    let mut session = ResultSession::new(config.channel_endpoint(), grade);
    session.open(target, credential.as_deref()).await?;

    loop {
        let view = session.view();
        if let ResultView::Error(panel) = &view {
            print_view(view.clone(), options.reveal);
            state.notifications.push(
                format!("Results unavailable ({})", panel.cause),
                NotificationKind::Error,
            );
            break;
        }
        if options.until_done && session.aggregator().is_settled() {
            info!("Grading finished");
            break;
        }

        let event = tokio::select! {
            event = session.next_event() => event,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        match event {
            Some(ChannelEvent::Frame(_)) => print_view(session.view(), options.reveal),
            Some(ChannelEvent::Opened) | Some(ChannelEvent::Failed(_)) => {}
            Some(ChannelEvent::Closed) | None => break,
        }
    }

    if let ResultView::Populated(view) = session.view() {
        if let Some(file) = view.header.preview.target() {
            println!("Open the submitted file with: arbitre-live preview --file {file}");
        }
    }
    session.close().await;
    Ok(())
}

async fn fetch_exercise_grade(config: &ClientConfig, token: &str, exercise_id: i64) -> Option<f64> {
    let client = match ApiClient::new(&config.api_base_url(), Some(token)) {
        Ok(client) => client,
        Err(err) => {
            warn!("Failed to create API client - {err}");
            return None;
        }
    };
    match client.fetch_exercise(exercise_id).await {
        Ok(exercise) => exercise.grade,
        Err(err) => {
            warn!("Failed to fetch exercise {exercise_id} - {err}");
            None
        }
    }
}

fn print_view(mut view: ResultView, reveal: bool) {
    if view.is_empty() {
        return;
    }
    if reveal {
        view.reveal_all();
    }
    println!("{view}");
}

pub fn flush_notifications(notifications: &mut NotificationBus) {
    for notification in notifications.drain() {
        eprintln!("[{}] {}", notification.kind, notification.message);
    }
}
