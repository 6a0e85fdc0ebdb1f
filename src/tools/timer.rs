use std::sync::Arc;

use serde_json::{Value, json};

use crate::{
    Res,
    error::Error,
    management::SleepTimerManager,
    spotify::client::SpotifyClient,
};

/// Arms a sleep timer that pauses playback after `duration_minutes`.
pub async fn set_sleep_timer(
    timers: &SleepTimerManager,
    client: &Arc<SpotifyClient>,
    duration_minutes: f64,
) -> Res<Value> {
    let fire_client = Arc::clone(client);
    let timer_id = timers
        .create(duration_minutes, async move { fire_client.pause(None).await })
        .await?;

    let timer = timers
        .get(&timer_id)
        .await
        .ok_or_else(|| Error::not_found("timer", &timer_id))?;

    Ok(json!({
        "success": true,
        "message": format!("Sleep timer set for {} minute(s)", duration_minutes),
        "timerId": timer_id,
        "durationMinutes": duration_minutes,
        "scheduledAt": timer.scheduled_at_rfc3339(),
    }))
}

/// Cancels one timer by id, or every active timer when no id is given.
/// An unknown explicit id is an error carrying the id; cancelling with no
/// timers active reports a count of zero.
pub async fn cancel_sleep_timer(timers: &SleepTimerManager, timer_id: Option<&str>) -> Res<Value> {
    match timer_id {
        Some(id) => {
            if !timers.cancel(id).await {
                return Err(Error::not_found("timer", id));
            }
            Ok(json!({
                "success": true,
                "message": format!("Timer {} cancelled", id),
            }))
        }
        None => {
            let count = timers.cancel_all().await;
            Ok(json!({
                "success": true,
                "message": format!("Cancelled {} timer(s)", count),
                "cancelledCount": count,
            }))
        }
    }
}

/// Lists active timers with their remaining time.
pub async fn get_active_timers(timers: &SleepTimerManager) -> Res<Value> {
    let mut out = Vec::new();
    for timer in timers.list().await {
        let remaining = timers.remaining_seconds(&timer.id).await;
        out.push(json!({
            "id": timer.id,
            "durationMinutes": timer.duration_minutes,
            "scheduledAt": timer.scheduled_at_rfc3339(),
            "remainingSeconds": remaining,
        }));
    }

    Ok(json!({ "success": true, "timers": out }))
}
