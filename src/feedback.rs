//! Host-side delivery of player feedback.
//!
//! The simulation only queues [`Feedback`] in the `FeedbackOutbox` resource.
//! A [`FeedbackDispatcher`] drains it on the host: system lines go out
//! immediately, speech notifications after their delay on a tokio timer.
//! Timers are fire-and-forget; cancelling or dropping the dispatcher aborts
//! the ones still waiting.

use std::sync::Arc;
use std::time::Duration;

use bevy_ecs::world::World;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::ecs::resources::{Feedback, FeedbackOutbox};

/// Where feedback ends up: chat window, audio mixer, test recorder.
pub trait NotificationSink: Send + Sync + 'static {
    fn system_line(&self, prefix: &str, text: &str);

    fn play_notification(&self, notification: &str, faction: &str);
}

pub struct FeedbackDispatcher {
    runtime: Handle,
    sink: Arc<dyn NotificationSink>,
    pending: Vec<JoinHandle<()>>,
}

impl FeedbackDispatcher {
    pub fn new(runtime: Handle, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            runtime,
            sink,
            pending: Vec::new(),
        }
    }

    /// Drain the world's outbox and dispatch everything in it.
    pub fn drain_world(&mut self, world: &mut World) {
        let Some(mut outbox) = world.get_resource_mut::<FeedbackOutbox>() else {
            return;
        };
        let feedback = outbox.drain();
        self.dispatch(feedback);
    }

    pub fn dispatch(&mut self, feedback: impl IntoIterator<Item = Feedback>) {
        self.pending.retain(|task| !task.is_finished());

        for item in feedback {
            match item {
                Feedback::SystemLine { prefix, text } => self.sink.system_line(&prefix, &text),
                Feedback::DelayedNotification {
                    delay_ms,
                    notification,
                    faction,
                } => {
                    let sink = Arc::clone(&self.sink);
                    let task = self.runtime.spawn(async move {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        sink.play_notification(&notification, &faction);
                    });
                    self.pending.push(task);
                }
            }
        }
    }

    /// Notifications still waiting on their timer.
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Abort every notification that has not played yet.
    pub fn cancel_all(&mut self) {
        for task in self.pending.drain(..) {
            task.abort();
        }
    }
}

impl Drop for FeedbackDispatcher {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
