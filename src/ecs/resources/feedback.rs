use bevy_ecs::resource::Resource;

/// Player-facing feedback produced by the simulation. The host drains it
/// every frame; nothing inside the simulation reads it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// A chat-style system message shown to everyone.
    SystemLine { prefix: String, text: String },
    /// A speech notification for the local player, played after `delay_ms`.
    DelayedNotification {
        delay_ms: u64,
        notification: String,
        faction: String,
    },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct FeedbackOutbox {
    pending: Vec<Feedback>,
}

impl FeedbackOutbox {
    pub fn push(&mut self, feedback: Feedback) {
        self.pending.push(feedback);
    }

    pub fn pending(&self) -> &[Feedback] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.pending)
    }
}
