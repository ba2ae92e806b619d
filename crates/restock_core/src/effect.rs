/// Side effects requested by the state machine. The orchestrator executes
/// them and feeds delivery results back through the recording methods on
/// [`crate::TargetState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A confirmed status change, e.g. `"widget: OUT -> IN"`. At most one
    /// per applied outcome.
    Changed(String),
    /// Send a restock alert on every configured channel.
    SendRestockAlert {
        name: String,
        url: String,
        confirmations: u32,
    },
    /// Send an error alert on every configured channel.
    SendErrorAlert {
        name: String,
        reason: String,
        streak: u32,
    },
}
